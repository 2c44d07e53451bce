//! Lambda-facing batch entry point.
//!
//! Accepts `{"items": [NotifyRequest, ...]}` (or one bare request) and returns one
//! rendered payload per item. Items are independent: a malformed one is reported
//! and the rest still render. Delivering the payloads is the caller's job.

use lambda_runtime::{Error, LambdaEvent};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};

use crate::core::config::AppConfig;
use crate::core::models::{Destination, NotificationInput};
use crate::errors::NotifyError;
use crate::worker::pipeline::Pipeline;

/// A notification input plus the notifier it is routed through.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyRequest {
    #[serde(default)]
    pub notifier_name: Option<String>,
    #[serde(flatten)]
    pub input: NotificationInput,
}

/// Configuration and pipeline, loaded once per process and shared by every invocation.
#[derive(Debug, Clone)]
pub struct WorkerState {
    pub config: AppConfig,
    pub pipeline: Pipeline,
}

impl WorkerState {
    /// # Errors
    ///
    /// Returns `ConfigError` if the pipeline cannot be built from `config`.
    pub fn new(config: AppConfig) -> Result<Self, NotifyError> {
        let pipeline = Pipeline::new(&config.pipeline)?;
        Ok(Self { config, pipeline })
    }

    /// # Errors
    ///
    /// Returns `ConfigError` for invalid environment configuration.
    pub fn from_env() -> Result<Self, NotifyError> {
        Self::new(AppConfig::from_env()?)
    }
}

/// Render every item of an event payload.
///
/// # Errors
///
/// Returns `ParseError` when the payload holds neither `items` nor a single request.
pub fn process_event(state: &WorkerState, payload: &Value) -> Result<Value, NotifyError> {
    let items: Vec<&Value> = match payload.get("items") {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(_) => {
            return Err(NotifyError::ParseError(
                "`items` must be an array".to_string(),
            ));
        }
        None if payload.get("title").is_some() => vec![payload],
        None => {
            return Err(NotifyError::ParseError(
                "event has neither `items` nor a notification".to_string(),
            ));
        }
    };

    info!("Rendering {} notification(s)", items.len());
    let messages: Vec<Value> = items.into_iter().map(|item| process_item(state, item)).collect();
    Ok(json!({ "messages": messages }))
}

fn process_item(state: &WorkerState, item: &Value) -> Value {
    let request: NotifyRequest = match serde_json::from_value(item.clone()) {
        Ok(request) => request,
        Err(e) => {
            error!("Rejected malformed notification item: {}", e);
            return json!({ "outcome": "rejected", "error": e.to_string() });
        }
    };

    let destination = state
        .config
        .destination_for(request.notifier_name.as_deref());

    match destination {
        Destination::Slack => {
            let outcome = state.pipeline.run(&request.input);
            match outcome.message().to_json() {
                Ok(payload) => json!({
                    "destination": destination,
                    "outcome": outcome.stage().as_str(),
                    "payload": payload
                }),
                Err(e) => {
                    error!("Failed to serialize rendered message: {}", e);
                    json!({ "outcome": "rejected", "error": e.to_string() })
                }
            }
        }
        Destination::Teams => {
            let (payload, stage) = state.pipeline.run_teams(&request.input);
            json!({
                "destination": destination,
                "outcome": stage.as_str(),
                "payload": payload
            })
        }
    }
}

/// # Errors
///
/// Returns an error when the event payload cannot be interpreted at all.
pub async fn function_handler(state: &WorkerState, event: LambdaEvent<Value>) -> Result<Value, Error> {
    info!("Notify worker invoked (request_id={})", event.context.request_id);
    process_event(state, &event.payload).map_err(|e| {
        error!("Notify worker failed: {}", e);
        Error::from(e)
    })
}
