/// notify-to-app - Turns a model's summary of a news item into a chat notification.
///
/// The summarization prompt asks the model for a `<thinking>` block of bullet points
/// and a `<summary>` block, but nothing guarantees the answer follows that shape. This
/// crate recovers what it can and always produces a message:
/// 1. `extract` pulls the tagged regions out of the raw answer
/// 2. `sanitize` strips prompt scaffolding that leaked into the answer
/// 3. `bullets` turns the detail block into ordered bullet items
/// 4. `slack` renders Block Kit (or a plain single section when structure is missing)
///
/// `worker` ties the stages together and exposes them as a Lambda handler; `teams`
/// renders the same fields as an Adaptive Card.
///
/// # Example
///
/// ```
/// use notify_to_app::core::config::PipelineConfig;
/// use notify_to_app::core::models::NotificationInput;
/// use notify_to_app::worker::Pipeline;
///
/// let pipeline = Pipeline::new(&PipelineConfig::default()).unwrap();
/// let input = NotificationInput::new(
///     "New region launch",
///     "2024-01-01T00:00:00Z",
///     "https://example.com/news/1",
///     "<thinking>- point A\n- point B</thinking><summary>Short summary.</summary>",
/// );
///
/// let outcome = pipeline.run(&input);
/// let payload = outcome.message().to_json().unwrap();
/// assert_eq!(payload["blocks"][0]["type"], "header");
/// ```
// Module declarations
pub mod bullets;
pub mod core;
pub mod errors;
pub mod extract;
pub mod sanitize;
pub mod slack;
pub mod teams;
pub mod utils;
pub mod worker;

pub use errors::{NotifyError, RenderError};
pub use worker::{Outcome, Pipeline};

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration, filtered by `RUST_LOG` (default `info`). Calling
/// it again after a subscriber is installed does nothing.
///
/// # Example
///
/// ```
/// notify_to_app::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
