//! Shared utility functions.

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;

use crate::{Error, Result};

/// Await `fut`, bounded by `limit` when one is given.
pub async fn with_optional_timeout<F, T>(limit: Option<Duration>, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match limit {
        Some(duration) => match timeout(duration, fut).await {
            Ok(inner) => inner,
            Err(_) => Err(Error::Timeout(duration)),
        },
        None => fut.await,
    }
}
