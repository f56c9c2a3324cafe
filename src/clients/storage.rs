//! Template storage client
//!
//! `TemplateStore` is the seam between the Starbase utilities and S3. The AWS
//! implementation translates SDK failures into `StarbaseError` so callers can
//! tell a missing template apart from any other S3 problem.

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::primitives::ByteStream;
use tracing::debug;

use crate::errors::StarbaseError;

#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Fetch the raw bytes of an object.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StarbaseError>;

    /// List every key under `prefix`, following continuation tokens until exhausted.
    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StarbaseError>;

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>)
    -> Result<(), StarbaseError>;
}

#[derive(Clone, Debug)]
pub struct S3TemplateStore {
    client: S3Client,
}

impl S3TemplateStore {
    #[must_use]
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }

    /// Build a client for the given region using the default credential chain.
    pub async fn for_region(region: &str) -> Self {
        let shared_config = aws_config::from_env()
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;
        Self::new(S3Client::new(&shared_config))
    }
}

fn storage_error<E>(error: &E) -> StarbaseError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    StarbaseError::StorageError {
        code: error.code().unwrap_or("Unknown").to_string(),
        message: DisplayErrorContext(error).to_string(),
    }
}

#[async_trait]
impl TemplateStore for S3TemplateStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StarbaseError> {
        let output = match self.client.get_object().bucket(bucket).key(key).send().await {
            Ok(output) => output,
            Err(e) => {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    return Err(StarbaseError::TemplateNotFound(key.to_string()));
                }
                return Err(storage_error(&e));
            }
        };

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StarbaseError::StorageError {
                code: "ObjectStreamError".to_string(),
                message: e.to_string(),
            })?;

        Ok(data.into_bytes().to_vec())
    }

    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StarbaseError> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(prefix)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| storage_error(&e))?;

            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key().map(ToString::to_string)),
            );

            match page.next_continuation_token() {
                Some(token) if page.is_truncated().unwrap_or(false) => {
                    debug!("Fetching next page of objects under {}", prefix);
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        Ok(keys)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
    ) -> Result<(), StarbaseError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| storage_error(&e))?;
        Ok(())
    }
}
