pub mod domain;
pub mod evaluation;
pub mod extract;
pub mod normalize;
pub mod ports;
pub mod question;

pub use domain::{
    Attempt, AttemptStatus, Evaluation, EvaluationRequest, Learner, NewAttempt, Verdict,
    VideoResult, PLACEHOLDER_VIDEO_ID,
};
pub use evaluation::EvaluationService;
pub use ports::{AttemptStore, ModelClient, PortError, PortResult, VideoLookup};
pub use question::QuestionService;
