// This is the Lambda bootstrap entry point for the notify worker

use std::sync::Arc;

use lambda_runtime::{Error, run, service_fn};
use notify_to_app::worker::{WorkerState, function_handler};
use tracing::error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    notify_to_app::setup_logging();

    // Configuration is read once; every invocation shares it read-only.
    let state = Arc::new(WorkerState::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { function_handler(&state, event).await }
    }))
    .await
}
