//! Test fixtures for integration tests.
//!
//! Provides helpers for:
//! - Canned valid payloads for every wizard phase
//! - Generation managers on virtual time
//! - Generator doubles with controllable outcomes

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;

use coursecraft::generation::{
    render, ContentGenerator, GenerationContext, GenerationManager, GenerationResult,
    GenerationType, ProgressReporter, TokioClock,
};
use coursecraft::workflow::{Phase, PhaseData};
use coursecraft::{Error, Result};

pub fn object(value: Value) -> PhaseData {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// A payload that satisfies every rule of `phase`.
pub fn valid_payload(phase: Phase) -> PhaseData {
    object(match phase {
        Phase::BasicInfo => json!({
            "title": "A valid title",
            "description": "A".repeat(60),
            "category": "c",
            "level": "beginner",
            "duration": 10
        }),
        Phase::LearningObjectives => json!({
            "objectives": [
                "Explain ownership",
                "Use borrowing correctly",
                "Write safe concurrent code"
            ]
        }),
        Phase::OutlineGeneration => json!({
            "modules": [{"title": "Module 1", "lessons": ["Intro"]}]
        }),
        Phase::ContentCreation => json!({
            "lessons": [{"title": "Intro", "content": "# Intro"}]
        }),
        Phase::ReviewFinalize => json!({
            "visibility": "public",
            "price": 0
        }),
    })
}

pub fn intro_context() -> GenerationContext {
    GenerationContext::new("Intro")
        .with_level("beginner")
        .with_duration(40)
}

/// Manager backed by the mock generator; run inside a paused runtime.
pub fn mock_manager() -> GenerationManager {
    GenerationManager::new().with_clock(Arc::new(TokioClock::new()))
}

/// Reports `progress` then waits for `release` before rendering.
pub struct GatedGenerator {
    pub progress: u8,
    pub release: Arc<Notify>,
}

#[async_trait]
impl ContentGenerator for GatedGenerator {
    async fn generate(
        &self,
        kind: GenerationType,
        context: &GenerationContext,
        progress: &ProgressReporter,
    ) -> Result<GenerationResult> {
        progress.report(self.progress);
        self.release.notified().await;
        Ok(render(kind, context))
    }
}

/// Fails every request of one type, renders the others.
pub struct FlakyGenerator {
    pub failing: GenerationType,
}

#[async_trait]
impl ContentGenerator for FlakyGenerator {
    async fn generate(
        &self,
        kind: GenerationType,
        context: &GenerationContext,
        progress: &ProgressReporter,
    ) -> Result<GenerationResult> {
        if kind == self.failing {
            return Err(Error::GenerationFailed(format!("{} backend returned 503", kind)));
        }
        progress.report(100);
        Ok(render(kind, context))
    }
}
