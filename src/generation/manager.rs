//! Lifecycle tracking for content generations.
//!
//! The `GenerationManager` keeps every in-flight generation in an active
//! table and moves it to an append-only history exactly once, when it
//! completes, fails or is cancelled. An id is never in both places.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::util::with_optional_timeout;
use crate::{clog_debug, clog_warn};

use super::{
    Clock, ContentGenerator, GenerationContext, GenerationEvent, GenerationId, GenerationOptions,
    GenerationRecord, GenerationResult, GenerationStatus, GenerationType, MockGenerator,
    ProgressReporter, TokioClock,
};

struct ActiveGeneration {
    record: GenerationRecord,
    cancel: CancellationToken,
}

/// How a generation ended.
#[derive(Debug, Clone)]
enum Settlement {
    Completed(GenerationResult),
    Failed(String),
    Cancelled,
}

#[derive(Default)]
struct Registry {
    active: HashMap<GenerationId, ActiveGeneration>,
    history: Vec<GenerationRecord>,
}

impl Registry {
    /// Move `id` from active to history with its terminal state.
    ///
    /// Returns `None` if the id is not active, so each record settles once.
    fn settle(
        &mut self,
        id: GenerationId,
        settlement: Settlement,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Option<GenerationRecord> {
        let ActiveGeneration { mut record, cancel } = self.active.remove(&id)?;
        record.ended_at = Some(now);
        match settlement {
            Settlement::Completed(result) => {
                record.status = GenerationStatus::Completed;
                record.progress = 100;
                record.result = Some(result);
            }
            Settlement::Failed(error) => {
                record.status = GenerationStatus::Failed;
                record.error = Some(error);
            }
            Settlement::Cancelled => {
                record.status = GenerationStatus::Cancelled;
                cancel.cancel();
            }
        }
        self.history.push(record.clone());
        Some(record)
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    // No invariant spans a panic point while the lock is held.
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Settles the record as cancelled if `generate_content` is dropped mid-flight.
struct ActiveGuard<'a> {
    manager: &'a GenerationManager,
    id: GenerationId,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.manager.settle(self.id, Settlement::Cancelled);
    }
}

/// Tracks generation requests and runs them through a `ContentGenerator`.
///
/// Cloning yields another handle to the same registry, so a clone can cancel
/// generations started through the original.
#[derive(Clone)]
pub struct GenerationManager {
    registry: Arc<Mutex<Registry>>,
    generator: Arc<dyn ContentGenerator>,
    /// Step delay range of the bundled mock, `None` once a generator is injected.
    mock_step_delay: Option<(Duration, Duration)>,
    clock: Arc<dyn Clock>,
    timeout: Option<Duration>,
    events: Option<mpsc::UnboundedSender<GenerationEvent>>,
}

impl GenerationManager {
    /// Manager backed by the mock generator with default delays.
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    pub fn from_config(config: &Config) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(TokioClock::new());
        let (min, max) = config.generation.step_delay();
        let generator = MockGenerator::new(Arc::clone(&clock)).with_step_delay(min, max);
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            generator: Arc::new(generator),
            mock_step_delay: Some((min, max)),
            clock,
            timeout: config.generation.timeout(),
            events: None,
        }
    }

    pub fn with_generator<G>(mut self, generator: G) -> Self
    where
        G: ContentGenerator + 'static,
    {
        self.generator = Arc::new(generator);
        self.mock_step_delay = None;
        self
    }

    /// Clock used for record timestamps and, while the bundled mock is in
    /// use, for its pauses between milestones.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        if let Some((min, max)) = self.mock_step_delay {
            let generator = MockGenerator::new(Arc::clone(&clock)).with_step_delay(min, max);
            self.generator = Arc::new(generator);
        }
        self.clock = clock;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_events(mut self, events: mpsc::UnboundedSender<GenerationEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Run a generation to completion, tracking it while it is in flight.
    ///
    /// Resolves with the generated payload. A generator error is recorded on
    /// the failed record and returned unchanged. If the generation is
    /// cancelled while running, returns `Error::GenerationCancelled`.
    pub async fn generate_content(
        &self,
        kind: GenerationType,
        context: GenerationContext,
        options: GenerationOptions,
    ) -> Result<GenerationResult> {
        let GenerationOptions {
            on_progress,
            params,
        } = options;
        let id = GenerationId::new();
        let cancel = CancellationToken::new();
        let record = GenerationRecord::pending(id, kind, context.clone(), params, self.clock.now());

        lock(&self.registry).active.insert(
            id,
            ActiveGeneration {
                record,
                cancel: cancel.clone(),
            },
        );
        let _guard = ActiveGuard { manager: self, id };
        clog_debug!("Generation {} ({}) started", id.short(), kind);
        self.emit(GenerationEvent::Started { id, kind });

        let reporter = self.reporter(id, on_progress);
        let work = with_optional_timeout(
            self.timeout,
            self.generator.generate(kind, &context, &reporter),
        );

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::GenerationCancelled { id }),
            outcome = work => outcome,
        };

        match outcome {
            Ok(result) => {
                if self.settle(id, Settlement::Completed(result.clone())).is_none() {
                    return Err(Error::GenerationCancelled { id });
                }
                Ok(result)
            }
            Err(err) => {
                clog_warn!("Generation {} ({}) failed: {}", id.short(), kind, err);
                if self.settle(id, Settlement::Failed(err.to_string())).is_none() {
                    return Err(Error::GenerationCancelled { id });
                }
                Err(err)
            }
        }
    }

    /// Snapshot of in-flight generations, in no particular order.
    pub fn get_active_generations(&self) -> Vec<GenerationRecord> {
        lock(&self.registry)
            .active
            .values()
            .map(|entry| entry.record.clone())
            .collect()
    }

    /// Settled generations in the order they settled.
    pub fn get_generation_history(&self) -> Vec<GenerationRecord> {
        lock(&self.registry).history.clone()
    }

    pub fn get_generation(&self, id: GenerationId) -> Option<GenerationRecord> {
        let registry = lock(&self.registry);
        registry
            .active
            .get(&id)
            .map(|entry| entry.record.clone())
            .or_else(|| registry.history.iter().find(|r| r.id == id).cloned())
    }

    /// Cancel an active generation and stop its work.
    ///
    /// Returns `false` for unknown or already settled ids.
    pub fn cancel_generation(&self, id: GenerationId) -> bool {
        self.settle(id, Settlement::Cancelled).is_some()
    }

    /// Cancel every active generation, returning how many were cancelled.
    pub fn cancel_all(&self) -> usize {
        let ids: Vec<GenerationId> = lock(&self.registry).active.keys().copied().collect();
        ids.into_iter()
            .filter(|id| self.cancel_generation(*id))
            .count()
    }

    fn settle(&self, id: GenerationId, settlement: Settlement) -> Option<GenerationRecord> {
        let record = lock(&self.registry).settle(id, settlement, self.clock.now())?;
        let event = match record.status {
            GenerationStatus::Completed => GenerationEvent::Completed { id },
            GenerationStatus::Failed => GenerationEvent::Failed {
                id,
                error: record.error.clone().unwrap_or_default(),
            },
            _ => GenerationEvent::Cancelled { id },
        };
        clog_debug!("Generation {} settled: {}", id.short(), record.status);
        self.emit(event);
        Some(record)
    }

    fn reporter(
        &self,
        id: GenerationId,
        on_progress: Option<super::ProgressCallback>,
    ) -> ProgressReporter {
        let registry = Arc::clone(&self.registry);
        let events = self.events.clone();
        ProgressReporter::new(id, move |progress| {
            let accepted = match lock(&registry).active.get_mut(&id) {
                Some(entry) if progress > entry.record.progress => {
                    entry.record.progress = progress;
                    true
                }
                _ => false,
            };
            if accepted {
                if let Some(callback) = &on_progress {
                    callback(progress);
                }
                if let Some(tx) = &events {
                    let _ = tx.send(GenerationEvent::Progress { id, progress });
                }
            }
            accepted
        })
    }

    fn emit(&self, event: GenerationEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}

impl Default for GenerationManager {
    fn default() -> Self {
        Self::new()
    }
}
