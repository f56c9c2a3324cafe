use async_trait::async_trait;
use aws_sdk_sqs::Client as SqsClient;
use aws_sdk_sqs::error::DisplayErrorContext;
use aws_sdk_sqs::types::SendMessageBatchRequestEntry;
use tracing::error;

use crate::core::models::BatchEntry;
use crate::errors::StarbaseError;

#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait FanoutQueue: Send + Sync {
    /// Send up to ten entries in a single call.
    async fn send_batch(&self, queue_url: &str, entries: Vec<BatchEntry>) -> Result<(), StarbaseError>;

    async fn send_message(&self, queue_url: &str, body: String) -> Result<(), StarbaseError>;
}

#[derive(Clone, Debug)]
pub struct SqsFanoutQueue {
    client: SqsClient,
}

impl SqsFanoutQueue {
    #[must_use]
    pub fn new(client: SqsClient) -> Self {
        Self { client }
    }

    pub async fn from_env() -> Self {
        let shared_config = aws_config::from_env().load().await;
        Self::new(SqsClient::new(&shared_config))
    }
}

#[async_trait]
impl FanoutQueue for SqsFanoutQueue {
    async fn send_batch(&self, queue_url: &str, entries: Vec<BatchEntry>) -> Result<(), StarbaseError> {
        let entries = entries
            .into_iter()
            .map(|entry| {
                SendMessageBatchRequestEntry::builder()
                    .id(entry.id)
                    .message_body(entry.message_body)
                    .build()
                    .map_err(|e| StarbaseError::QueueError(format!("Invalid batch entry: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let output = self
            .client
            .send_message_batch()
            .queue_url(queue_url)
            .set_entries(Some(entries))
            .send()
            .await
            .map_err(|e| {
                StarbaseError::QueueError(format!(
                    "Failed to send message batch to SQS: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        for failed in output.failed() {
            error!(
                "[❌] SQS rejected message {} ({}): {}",
                failed.id(),
                failed.code(),
                failed.message().unwrap_or("no details")
            );
        }

        Ok(())
    }

    async fn send_message(&self, queue_url: &str, body: String) -> Result<(), StarbaseError> {
        self.client
            .send_message()
            .queue_url(queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|e| {
                StarbaseError::QueueError(format!(
                    "Failed to send message to SQS: {}",
                    DisplayErrorContext(&e)
                ))
            })?;
        Ok(())
    }
}
