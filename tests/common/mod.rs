#![allow(dead_code)]

use async_trait::async_trait;
use starbase::clients::{FanoutQueue, TemplateStore};
use starbase::core::config::StarbaseConfig;
use starbase::core::models::BatchEntry;
use starbase::errors::StarbaseError;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const TEMPLATE_BUCKET: &str = "templatebucket";
pub const FANOUT_QUEUE: &str = "https://sqs.us-east-2.amazonaws.com/123456789012/starbase-fanout-queue";
pub const WORKER_QUEUE: &str = "https://sqs.us-east-2.amazonaws.com/123456789012/testing-worker-queue";

pub const TEST_TEMPLATE: &str = "TemplateName: TestWorkerTemplate\n\
TemplateDescription: This is a template used for testing the Starbase\n";

/// S3 stand-in keyed by bucket then object key.
#[derive(Default)]
pub struct InMemoryStore {
    buckets: Mutex<HashMap<String, BTreeMap<String, Vec<u8>>>>,
    list_calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn with_bucket(bucket: &str) -> Self {
        let store = Self::default();
        store
            .buckets
            .lock()
            .unwrap()
            .insert(bucket.to_string(), BTreeMap::new());
        store
    }

    /// A bucket holding two valid templates for `TestingStarfleetWorkerPlugin`.
    pub fn with_payload_templates() -> Self {
        let store = Self::with_bucket(TEMPLATE_BUCKET);
        store.insert(
            TEMPLATE_BUCKET,
            "TestingStarfleetWorkerPlugin/template1.yaml",
            TEST_TEMPLATE.as_bytes(),
        );
        store.insert(
            TEMPLATE_BUCKET,
            "TestingStarfleetWorkerPlugin/template2.yaml",
            TEST_TEMPLATE.as_bytes(),
        );
        store
    }

    pub fn insert(&self, bucket: &str, key: &str, body: &[u8]) {
        self.buckets
            .lock()
            .unwrap()
            .get_mut(bucket)
            .expect("bucket must exist")
            .insert(key.to_string(), body.to_vec());
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn no_such_bucket(bucket: &str) -> StarbaseError {
        StarbaseError::StorageError {
            code: "NoSuchBucket".to_string(),
            message: format!("The specified bucket does not exist: {bucket}"),
        }
    }
}

#[async_trait]
impl TemplateStore for InMemoryStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StarbaseError> {
        let buckets = self.buckets.lock().unwrap();
        let objects = buckets.get(bucket).ok_or_else(|| Self::no_such_bucket(bucket))?;
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| StarbaseError::TemplateNotFound(key.to_string()))
    }

    async fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, StarbaseError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let buckets = self.buckets.lock().unwrap();
        let objects = buckets.get(bucket).ok_or_else(|| Self::no_such_bucket(bucket))?;
        Ok(objects
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), StarbaseError> {
        let mut buckets = self.buckets.lock().unwrap();
        let objects = buckets.get_mut(bucket).ok_or_else(|| Self::no_such_bucket(bucket))?;
        objects.insert(key.to_string(), body);
        Ok(())
    }
}

/// SQS stand-in that records everything it is asked to send.
#[derive(Default)]
pub struct RecordingQueue {
    batches: Mutex<Vec<(String, Vec<BatchEntry>)>>,
    messages: Mutex<Vec<(String, String)>>,
}

impl RecordingQueue {
    pub fn batches(&self) -> Vec<(String, Vec<BatchEntry>)> {
        self.batches.lock().unwrap().clone()
    }

    /// Every message body visible on `queue_url`, batch or single.
    pub fn received(&self, queue_url: &str) -> Vec<String> {
        let mut bodies: Vec<String> = self
            .batches
            .lock()
            .unwrap()
            .iter()
            .filter(|(url, _)| url == queue_url)
            .flat_map(|(_, entries)| entries.iter().map(|e| e.message_body.clone()))
            .collect();
        bodies.extend(
            self.messages
                .lock()
                .unwrap()
                .iter()
                .filter(|(url, _)| url == queue_url)
                .map(|(_, body)| body.clone()),
        );
        bodies
    }
}

#[async_trait]
impl FanoutQueue for RecordingQueue {
    async fn send_batch(&self, queue_url: &str, entries: Vec<BatchEntry>) -> Result<(), StarbaseError> {
        self.batches
            .lock()
            .unwrap()
            .push((queue_url.to_string(), entries));
        Ok(())
    }

    async fn send_message(&self, queue_url: &str, body: String) -> Result<(), StarbaseError> {
        self.messages
            .lock()
            .unwrap()
            .push((queue_url.to_string(), body));
        Ok(())
    }
}

pub fn test_config() -> StarbaseConfig {
    StarbaseConfig {
        template_bucket: TEMPLATE_BUCKET.to_string(),
        template_bucket_region: "us-east-2".to_string(),
        fanout_queue_url: FANOUT_QUEUE.to_string(),
        worker_ships_config: "worker_ships.yaml".to_string(),
    }
}

pub fn expected_body(worker_ship: &str, template: &str) -> String {
    format!(r#"{{"worker_ship": "{worker_ship}", "template_prefix": "{template}"}}"#)
}
