//! Download orchestration: engine, per-course processing, result state.

pub mod course;
pub mod engine;
pub mod state;

pub use course::process_course;
pub use engine::download;
pub use state::{CourseSummary, DownloadOutcome, RunStats};
