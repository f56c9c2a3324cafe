// Lambda entry point for the EventBridge-scheduled Starbase function

use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde_json::Value;
use starbase::clients::{S3TemplateStore, SqsFanoutQueue};
use starbase::core::config::{StarbaseConfig, WorkerShipRegistry};
use starbase::core::models::TimedEvent;
use starbase::starbase::process_timed_event;
use tracing::{error, info};

async fn handler(event: LambdaEvent<Value>) -> Result<Value, Error> {
    let config = StarbaseConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;
    info!("Starbase received timed event: {:?}", event.payload);

    let timed_event: TimedEvent = serde_json::from_value(event.payload)
        .map_err(|e| Error::from(format!("Failed to parse timed event: {}", e)))?;

    let registry = WorkerShipRegistry::load(&config.worker_ships_config)?;
    let store = S3TemplateStore::for_region(&config.template_bucket_region).await;
    let queue = SqsFanoutQueue::from_env().await;

    let queued = process_timed_event(&timed_event, &config, &registry, &store, &queue)
        .await
        .map_err(|e| {
            error!("Failed to process timed event: {}", e);
            Error::from(e)
        })?;

    Ok(serde_json::json!({ "queued": queued }))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    starbase::setup_logging();
    run(service_fn(handler)).await
}
