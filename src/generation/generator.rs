//! The seam between the generation manager and whatever produces content.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

use super::{GenerationContext, GenerationId, GenerationResult, GenerationType};

/// Produces content for one generation request.
///
/// Implementations report progress through `progress` as work advances and
/// return the payload matching `kind`. Cancellation is handled by the
/// manager dropping the returned future.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(
        &self,
        kind: GenerationType,
        context: &GenerationContext,
        progress: &ProgressReporter,
    ) -> Result<GenerationResult>;
}

type ProgressSink = Arc<dyn Fn(u8) -> bool + Send + Sync>;

/// Progress handle given to a generator for a single request.
#[derive(Clone)]
pub struct ProgressReporter {
    id: GenerationId,
    sink: ProgressSink,
}

impl ProgressReporter {
    /// `sink` receives each report and returns whether it was accepted.
    pub fn new<F>(id: GenerationId, sink: F) -> Self
    where
        F: Fn(u8) -> bool + Send + Sync + 'static,
    {
        Self {
            id,
            sink: Arc::new(sink),
        }
    }

    pub fn id(&self) -> GenerationId {
        self.id
    }

    /// Report progress (clamped to 100). Returns false when the value was
    /// dropped, either because it does not advance progress or because the
    /// generation is no longer active.
    pub fn report(&self, progress: u8) -> bool {
        (self.sink)(progress.min(100))
    }
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter").field("id", &self.id).finish()
    }
}
