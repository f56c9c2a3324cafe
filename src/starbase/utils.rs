//! Template batching, fan-out, listing and fetching.
//!
//! These are the building blocks the Starbase Lambdas are assembled from. The
//! storage and queue clients are always passed in, never created here, except
//! for `list_worker_ship_templates` which builds an S3 client on demand.

use tracing::{error, info};

use crate::clients::storage::{S3TemplateStore, TemplateStore};
use crate::clients::queue::FanoutQueue;
use crate::core::models::{BatchEntry, FanoutMessage, TemplateDocument};
use crate::errors::StarbaseError;

/// SQS accepts at most this many entries per `SendMessageBatch` call.
pub const MAX_BATCH_SIZE: usize = 10;

/// Only objects with this suffix are treated as templates.
pub const TEMPLATE_EXTENSION: &str = ".yaml";

/// Fields every template must carry regardless of the worker ship.
pub const BASE_TEMPLATE_FIELDS: [&str; 2] = ["TemplateName", "TemplateDescription"];

/// Split `templates` into SQS batches of at most `batch_size` entries.
///
/// Entry ids are the 1-based position of the template in the whole input, so
/// they stay unique across batches. A `batch_size` of 0 is treated as 1.
pub fn template_batches<'a, S: AsRef<str>>(
    templates: &'a [S],
    worker_ship: &'a str,
    batch_size: usize,
) -> impl Iterator<Item = Result<Vec<BatchEntry>, StarbaseError>> + 'a {
    let batch_size = batch_size.max(1);

    templates
        .chunks(batch_size)
        .enumerate()
        .map(move |(batch_index, chunk)| {
            chunk
                .iter()
                .enumerate()
                .map(|(offset, template)| -> Result<BatchEntry, StarbaseError> {
                    let message = FanoutMessage {
                        worker_ship: worker_ship.to_string(),
                        template_prefix: template.as_ref().to_string(),
                    };
                    Ok(BatchEntry {
                        id: (batch_index * batch_size + offset + 1).to_string(),
                        message_body: message.to_message_body()?,
                    })
                })
                .collect()
        })
}

/// Send one `SendMessageBatch` per batch of templates. Returns the number of
/// templates queued.
pub async fn fan_out_templates<S: AsRef<str>>(
    templates: &[S],
    queue_url: &str,
    queue: &dyn FanoutQueue,
    worker_ship: &str,
) -> Result<usize, StarbaseError> {
    let mut sent = 0;
    for batch in template_batches(templates, worker_ship, MAX_BATCH_SIZE) {
        let batch = batch?;
        let batch_len = batch.len();
        queue.send_batch(queue_url, batch).await?;
        sent += batch_len;
    }

    info!(
        "[📦] Queued {} template(s) for worker ship: {}",
        sent, worker_ship
    );
    Ok(sent)
}

#[must_use]
pub fn is_template_key(key: &str) -> bool {
    key.ends_with(TEMPLATE_EXTENSION)
}

/// List the templates for a worker ship.
///
/// A `key_or_prefix` that already names a single template is returned as-is
/// and no S3 client is created.
pub async fn list_worker_ship_templates(
    bucket: &str,
    region: &str,
    key_or_prefix: &str,
    worker_ship: &str,
) -> Result<Vec<String>, StarbaseError> {
    if is_template_key(key_or_prefix) {
        return Ok(vec![key_or_prefix.to_string()]);
    }

    let store = S3TemplateStore::for_region(region).await;
    list_templates_with(&store, bucket, key_or_prefix, worker_ship).await
}

/// List the templates for a worker ship through a caller-supplied store.
///
/// This is the store-agnostic entry point, so it applies the same literal-key
/// short-circuit as `list_worker_ship_templates`: a single template key is
/// returned without calling `list_keys`.
pub async fn list_templates_with(
    store: &dyn TemplateStore,
    bucket: &str,
    key_or_prefix: &str,
    worker_ship: &str,
) -> Result<Vec<String>, StarbaseError> {
    if is_template_key(key_or_prefix) {
        return Ok(vec![key_or_prefix.to_string()]);
    }

    info!(
        "[🔎] Listing templates for worker ship: {} in s3://{}/{}",
        worker_ship, bucket, key_or_prefix
    );
    let templates: Vec<String> = store
        .list_keys(bucket, key_or_prefix)
        .await?
        .into_iter()
        .filter(|key| is_template_key(key))
        .collect();

    info!(
        "[📄] Found {} template(s) for worker ship: {}",
        templates.len(),
        worker_ship
    );
    Ok(templates)
}

/// Fetch a template from S3 and parse it as YAML.
///
/// S3 failures are logged before being returned. Parse failures are returned
/// without logging.
pub async fn fetch_template(
    store: &dyn TemplateStore,
    bucket: &str,
    key: &str,
) -> Result<TemplateDocument, StarbaseError> {
    let raw = match store.get_object(bucket, key).await {
        Ok(raw) => raw,
        Err(e @ StarbaseError::TemplateNotFound(_)) => {
            error!(
                "[❌] Can't find the template: {} in S3. Please investigate why it's missing.",
                key
            );
            return Err(e);
        }
        Err(e) => {
            error!(
                "[❌] Some problem occurred reaching out to S3 ({}) while fetching: {}. Here are the details: {}",
                e.storage_code().unwrap_or("Unknown"),
                key,
                e
            );
            return Err(e);
        }
    };

    Ok(serde_yaml::from_slice(&raw)?)
}

/// Check the fields every worker ship template shares.
pub fn validate_base_template(template: &TemplateDocument) -> Result<(), StarbaseError> {
    for field in BASE_TEMPLATE_FIELDS {
        match template.get(field) {
            Some(serde_yaml::Value::String(value)) if !value.trim().is_empty() => {}
            Some(_) => {
                return Err(StarbaseError::InvalidTemplate(format!(
                    "{field} must be a non-empty string"
                )));
            }
            None => {
                return Err(StarbaseError::InvalidTemplate(format!(
                    "missing required field: {field}"
                )));
            }
        }
    }
    Ok(())
}
