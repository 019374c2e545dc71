use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A pre-rendered HTML email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Outbound email collaborator.
///
/// Callers treat delivery as best effort: a failed send is logged and never
/// undoes the operation that triggered it.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: Email) -> eyre::Result<()>;
}
