use serde_json::Value;
use tracing::{error, info};

use super::utils::{fan_out_templates, fetch_template, list_templates_with, validate_base_template};
use crate::clients::queue::FanoutQueue;
use crate::clients::storage::TemplateStore;
use crate::core::config::{StarbaseConfig, WorkerShipRegistry};
use crate::core::models::{FanoutMessage, TimedEvent};
use crate::errors::StarbaseError;

/// Handle an EventBridge timed event: queue every template of every worker
/// ship scheduled at the event's frequency onto the fan-out queue.
pub async fn process_timed_event(
    event: &TimedEvent,
    config: &StarbaseConfig,
    registry: &WorkerShipRegistry,
    store: &dyn TemplateStore,
    queue: &dyn FanoutQueue,
) -> Result<usize, StarbaseError> {
    info!("[⏰] Processing timed event for frequency: {:?}", event.frequency);

    let mut total = 0;
    for ship in registry.scheduled_for(event.frequency) {
        info!("[🚀] Tasking worker ship: {}", ship.name);
        let templates = list_templates_with(
            store,
            &config.template_bucket,
            &ship.template_prefix,
            &ship.name,
        )
        .await?;

        total += fan_out_templates(&templates, &config.fanout_queue_url, queue, &ship.name).await?;
    }

    info!("[✅] Queued {} template(s) in total", total);
    Ok(total)
}

/// Pull every `Records[*].body` out of an SQS Lambda event.
pub fn parse_fanout_records(payload: &Value) -> Result<Vec<FanoutMessage>, StarbaseError> {
    let records = payload
        .get("Records")
        .and_then(|records| records.as_array())
        .ok_or_else(|| StarbaseError::EventParseError("missing Records array".to_string()))?;

    records
        .iter()
        .map(|record| {
            let body = record
                .get("body")
                .and_then(|body| body.as_str())
                .ok_or_else(|| {
                    StarbaseError::EventParseError("record is missing a body".to_string())
                })?;
            serde_json::from_str(body).map_err(|e| {
                StarbaseError::EventParseError(format!(
                    "Failed to parse SQS message body into FanoutMessage: {}",
                    e
                ))
            })
        })
        .collect()
}

/// Handle a batch of fan-out queue records: fetch each template, check it and
/// forward it to the worker ship's invocation queue.
pub async fn process_fanout_records(
    payload: &Value,
    config: &StarbaseConfig,
    registry: &WorkerShipRegistry,
    store: &dyn TemplateStore,
    queue: &dyn FanoutQueue,
) -> Result<usize, StarbaseError> {
    let messages = parse_fanout_records(payload)?;

    let mut forwarded = 0;
    for message in &messages {
        let ship = registry
            .get(&message.worker_ship)
            .ok_or_else(|| StarbaseError::UnknownWorkerShip(message.worker_ship.clone()))?;

        let template =
            fetch_template(store, &config.template_bucket, &message.template_prefix).await?;

        if let Err(e) = validate_base_template(&template) {
            error!(
                "[❌] Template: {} for worker ship: {} is invalid: {}",
                message.template_prefix, ship.name, e
            );
            return Err(e);
        }

        let body = serde_json::to_string(&template)?;
        queue.send_message(&ship.invocation_queue_url, body).await?;
        info!(
            "[📬] Sent template: {} to worker ship: {}",
            message.template_prefix, ship.name
        );
        forwarded += 1;
    }

    Ok(forwarded)
}
