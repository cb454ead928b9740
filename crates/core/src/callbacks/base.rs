//! Base ItemCallback trait and supporting types.

use async_trait::async_trait;
use bs_protocol::item_models::Item;
use thiserror::Error;

/// A failure signaled by a per-item callback.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct CallbackError(pub String);

impl CallbackError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[async_trait]
pub trait ItemCallback: Send + Sync {
    async fn call(&self, item: &Item) -> Result<(), CallbackError>;
}

/// Adapts a synchronous closure into an [`ItemCallback`].
pub struct FnCallback<F>(F);

impl<F> FnCallback<F>
where
    F: Fn(&Item) -> Result<(), CallbackError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> ItemCallback for FnCallback<F>
where
    F: Fn(&Item) -> Result<(), CallbackError> + Send + Sync,
{
    async fn call(&self, item: &Item) -> Result<(), CallbackError> {
        (self.0)(item)
    }
}
