pub mod generation_flow;
pub mod submission_ctx;

pub use generation_flow::{GenerationFlow, GenerationSettings, StageTracker};
pub use submission_ctx::SubmissionCtx;
