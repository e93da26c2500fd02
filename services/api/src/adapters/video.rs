//! services/api/src/adapters/video.rs
//!
//! This module contains the adapter for finding a companion video. It implements
//! the `VideoLookup` port by fetching the YouTube results page for a query and
//! pulling the video ids out of the embedded page data.

use async_trait::async_trait;
use quiz_tutor_core::domain::VideoResult;
use quiz_tutor_core::ports::{PortError, PortResult, VideoLookup};
use regex::Regex;
use tracing::debug;

const VIDEO_ID_PATTERN: &str = r#""videoId":"([A-Za-z0-9_-]{11})""#;
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko)";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `VideoLookup` by scraping a YouTube search page.
#[derive(Clone)]
pub struct YoutubeSearchAdapter {
    http: reqwest::Client,
    search_url: String,
    video_id: Regex,
}

impl YoutubeSearchAdapter {
    /// Creates a new `YoutubeSearchAdapter` querying `search_url`.
    pub fn new(search_url: String) -> PortResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        let video_id =
            Regex::new(VIDEO_ID_PATTERN).map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(Self {
            http,
            search_url,
            video_id,
        })
    }

    /// Collects up to `limit` distinct video ids in page order.
    fn parse_video_ids(&self, page: &str, limit: usize) -> Vec<VideoResult> {
        let mut results: Vec<VideoResult> = Vec::new();
        for captures in self.video_id.captures_iter(page) {
            if results.len() >= limit {
                break;
            }
            let id = &captures[1];
            if results.iter().all(|known| known.id != id) {
                results.push(VideoResult { id: id.to_string() });
            }
        }
        results
    }
}

//=========================================================================================
// `VideoLookup` Trait Implementation
//=========================================================================================

#[async_trait]
impl VideoLookup for YoutubeSearchAdapter {
    async fn search(&self, query: &str, limit: usize) -> PortResult<Vec<VideoResult>> {
        let page = self
            .http
            .get(&self.search_url)
            .query(&[("search_query", query)])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| PortError::LookupUnavailable(e.to_string()))?
            .text()
            .await
            .map_err(|e| PortError::LookupUnavailable(e.to_string()))?;

        let results = self.parse_video_ids(&page, limit);
        debug!("Video search for '{}' found {} result(s).", query, results.len());
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, routing::get, Router};
    use std::collections::HashMap;

    const PAGE: &str = r#"<script>var ytInitialData = {"contents":[
        {"videoRenderer":{"videoId":"AAAAAAAAAA1","title":"first"}},
        {"videoRenderer":{"videoId":"AAAAAAAAAA1","title":"first again"}},
        {"videoRenderer":{"videoId":"BBBBBBBBB-2","title":"second"}}
    ]};</script>"#;

    fn adapter(url: &str) -> YoutubeSearchAdapter {
        YoutubeSearchAdapter::new(url.to_string()).unwrap()
    }

    #[test]
    fn parses_distinct_ids_in_order() {
        let ids = adapter("http://unused").parse_video_ids(PAGE, 5);
        assert_eq!(
            ids,
            vec![
                VideoResult { id: "AAAAAAAAAA1".to_string() },
                VideoResult { id: "BBBBBBBBB-2".to_string() },
            ]
        );
    }

    #[test]
    fn respects_the_limit() {
        let adapter = adapter("http://unused");
        assert_eq!(adapter.parse_video_ids(PAGE, 1).len(), 1);
        assert!(adapter.parse_video_ids(PAGE, 0).is_empty());
        assert!(adapter.parse_video_ids("<html>no results</html>", 1).is_empty());
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/results", addr)
    }

    #[tokio::test]
    async fn search_sends_the_query_and_parses_the_page() {
        let app = Router::new().route(
            "/results",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                if params.get("search_query").map(String::as_str) == Some("units conversion") {
                    PAGE.to_string()
                } else {
                    String::new()
                }
            }),
        );
        let url = serve(app).await;

        let results = adapter(&url).search("units conversion", 1).await.unwrap();
        assert_eq!(results, vec![VideoResult { id: "AAAAAAAAAA1".to_string() }]);
    }

    #[tokio::test]
    async fn error_status_is_lookup_unavailable() {
        let app = Router::new().route("/results", get(|| async { StatusCode::TOO_MANY_REQUESTS }));
        let url = serve(app).await;

        let err = adapter(&url).search("anything", 1).await.unwrap_err();
        assert!(matches!(err, PortError::LookupUnavailable(_)));
    }
}
