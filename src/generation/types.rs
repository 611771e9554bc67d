//! Generation request and record types.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

use super::GenerationResult;

/// Unique identifier for a generation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenerationId(pub Uuid);

impl GenerationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Return first 8 characters of the UUID for display.
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for GenerationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GenerationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for GenerationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Kind of content a generation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationType {
    CourseOutline,
    LearningObjectives,
    LessonContent,
    Assessment,
    EnhancementSuggestions,
}

impl GenerationType {
    pub fn all() -> &'static [GenerationType] {
        &[
            GenerationType::CourseOutline,
            GenerationType::LearningObjectives,
            GenerationType::LessonContent,
            GenerationType::Assessment,
            GenerationType::EnhancementSuggestions,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GenerationType::CourseOutline => "course-outline",
            GenerationType::LearningObjectives => "learning-objectives",
            GenerationType::LessonContent => "lesson-content",
            GenerationType::Assessment => "assessment",
            GenerationType::EnhancementSuggestions => "enhancement-suggestions",
        }
    }
}

impl std::fmt::Display for GenerationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GenerationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownGenerationType(s.to_string()))
    }
}

/// Lifecycle status of a generation. Every status but `Pending` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl GenerationStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GenerationStatus::Pending)
    }
}

impl std::fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationStatus::Pending => write!(f, "pending"),
            GenerationStatus::Completed => write!(f, "completed"),
            GenerationStatus::Failed => write!(f, "failed"),
            GenerationStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Course information a generation works from. Which fields matter depends
/// on the generation type; all but `title` are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationContext {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Course length in hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objectives: Vec<String>,
    /// Lesson or module the content is for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_count: Option<usize>,
}

impl GenerationContext {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn with_duration(mut self, hours: u32) -> Self {
        self.duration = Some(hours);
        self
    }
}

/// Called with each accepted progress value (1-100).
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// Per-call options. `params` is stored on the record verbatim.
#[derive(Clone, Default)]
pub struct GenerationOptions {
    pub on_progress: Option<ProgressCallback>,
    pub params: serde_json::Value,
}

impl GenerationOptions {
    pub fn with_progress<F>(mut self, f: F) -> Self
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(f));
        self
    }

    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }
}

impl std::fmt::Debug for GenerationOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationOptions")
            .field("on_progress", &self.on_progress.is_some())
            .field("params", &self.params)
            .finish()
    }
}

/// Bookkeeping for one generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub id: GenerationId,
    #[serde(rename = "type")]
    pub kind: GenerationType,
    pub context: GenerationContext,
    #[serde(default)]
    pub params: serde_json::Value,
    pub status: GenerationStatus,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    /// 0-100, never decreases while pending.
    pub progress: u8,
    pub result: Option<GenerationResult>,
    pub error: Option<String>,
}

impl GenerationRecord {
    pub fn pending(
        id: GenerationId,
        kind: GenerationType,
        context: GenerationContext,
        params: serde_json::Value,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            context,
            params,
            status: GenerationStatus::Pending,
            started_at,
            ended_at: None,
            progress: 0,
            result: None,
            error: None,
        }
    }
}

/// Lifecycle notifications emitted by the generation manager.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    Started {
        id: GenerationId,
        kind: GenerationType,
    },
    Progress {
        id: GenerationId,
        progress: u8,
    },
    Completed {
        id: GenerationId,
    },
    Failed {
        id: GenerationId,
        error: String,
    },
    Cancelled {
        id: GenerationId,
    },
}

impl GenerationEvent {
    pub fn id(&self) -> GenerationId {
        match self {
            GenerationEvent::Started { id, .. }
            | GenerationEvent::Progress { id, .. }
            | GenerationEvent::Completed { id }
            | GenerationEvent::Failed { id, .. }
            | GenerationEvent::Cancelled { id } => *id,
        }
    }
}
