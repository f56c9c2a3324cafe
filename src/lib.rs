/// Starbase - fans worker ship templates out to the fleet over SQS.
///
/// This crate implements a two-Lambda architecture:
/// 1. A Starbase Lambda, triggered on an EventBridge schedule, that lists each
///    scheduled worker ship's templates in S3 and queues them on the fan-out queue
/// 2. A Fan-out Lambda that fetches each queued template, checks it, and sends
///    it to the worker ship's own invocation queue
///
/// # Architecture
///
/// The system uses:
/// - AWS Lambda for serverless execution
/// - S3 for template storage
/// - SQS for fan-out between Lambdas and worker ships
/// - serde_yaml for template parsing
/// - Tokio for async runtime
///
/// # Example
///
/// ```no_run
/// use starbase::clients::{S3TemplateStore, SqsFanoutQueue};
/// use starbase::starbase::utils::{fan_out_templates, list_templates_with};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     starbase::setup_logging();
///
///     let store = S3TemplateStore::for_region("us-east-2").await;
///     let queue = SqsFanoutQueue::from_env().await;
///
///     let templates =
///         list_templates_with(&store, "template-bucket", "MyWorkerShip/", "MyWorkerShip").await?;
///     fan_out_templates(&templates, "https://sqs.us-east-2.amazonaws.com/123/fanout", &queue, "MyWorkerShip")
///         .await?;
///
///     Ok(())
/// }
/// ```
pub mod clients;
pub mod core;
pub mod errors;
pub mod starbase;

pub use errors::StarbaseError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration. It should be called once at the start of
/// each Lambda binary. Calling it again is a no-op.
///
/// # Example
///
/// ```
/// starbase::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
