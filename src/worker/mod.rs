//! Pipeline orchestration and the Lambda handler around it

pub mod handler;
pub mod pipeline;

pub use handler::{WorkerState, function_handler, process_event};
pub use pipeline::{FallbackReason, Outcome, Pipeline, Route, Stage};
