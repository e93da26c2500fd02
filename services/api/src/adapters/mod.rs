pub mod db;
pub mod model_llm;
pub mod video;

pub use db::DbAdapter;
pub use model_llm::OpenAiModelAdapter;
pub use video::YoutubeSearchAdapter;
