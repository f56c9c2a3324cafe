pub mod queue;
pub mod storage;

pub use queue::{FanoutQueue, SqsFanoutQueue};
pub use storage::{S3TemplateStore, TemplateStore};
