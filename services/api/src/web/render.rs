//! services/api/src/web/render.rs
//!
//! Turns stored attempts into the teacher's HTML table and the CSV report.

use quiz_tutor_core::domain::Attempt;

pub const CSV_HEADER: [&str; 5] = ["Student Name", "Phone", "Topic Studied", "Status", "AI Feedback"];
pub const CSV_FILE_NAME: &str = "student_report.csv";

/// Escapes text for use inside HTML element content.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn columns(attempt: &Attempt) -> [&str; 5] {
    [
        attempt.learner.name.as_str(),
        attempt.learner.phone.as_str(),
        attempt.topic.as_str(),
        attempt.status.as_str(),
        attempt.feedback.as_str(),
    ]
}

/// One `<tr>` per attempt, in the order given.
pub fn attempt_rows(attempts: &[Attempt]) -> String {
    attempts
        .iter()
        .map(|attempt| {
            let cells: String = columns(attempt)
                .iter()
                .map(|value| format!("<td>{}</td>", escape_html(value)))
                .collect();
            format!("<tr>{}</tr>", cells)
        })
        .collect()
}

/// Inserts the attempt rows right after the template's first `<tbody>`.
pub fn teacher_page(template: &str, attempts: &[Attempt]) -> String {
    let rows = attempt_rows(attempts);
    template.replacen("<tbody>", &format!("<tbody>{}", rows), 1)
}

/// The CSV report, oldest attempt first. `attempts` arrives most recent first.
pub fn attempts_csv(attempts: &[Attempt]) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for attempt in attempts.iter().rev() {
        writer.write_record(columns(attempt))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}
