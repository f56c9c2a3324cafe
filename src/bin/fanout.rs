// Lambda entry point for the fan-out queue consumer

use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde_json::Value;
use starbase::clients::{S3TemplateStore, SqsFanoutQueue};
use starbase::core::config::{StarbaseConfig, WorkerShipRegistry};
use starbase::starbase::process_fanout_records;
use tracing::{error, info};

async fn handler(event: LambdaEvent<Value>) -> Result<(), Error> {
    let config = StarbaseConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;
    info!("Fan-out Lambda received SQS event payload: {:?}", event.payload);

    let registry = WorkerShipRegistry::load(&config.worker_ships_config)?;
    let store = S3TemplateStore::for_region(&config.template_bucket_region).await;
    let queue = SqsFanoutQueue::from_env().await;

    let forwarded = process_fanout_records(&event.payload, &config, &registry, &store, &queue)
        .await
        .map_err(|e| {
            error!("Failed to fan out templates: {}", e);
            Error::from(e)
        })?;

    info!("Forwarded {} template(s)", forwarded);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    starbase::setup_logging();
    run(service_fn(handler)).await
}
