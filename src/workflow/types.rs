//! Core workflow type definitions.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Payload submitted for a phase: a plain key/value map of form fields.
pub type PhaseData = serde_json::Map<String, serde_json::Value>;

/// Phases of the course-creation wizard, in progression order.
///
/// From the current phase the wizard may move to any earlier phase or to
/// the one directly after it. Completed phases stay reachable from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Title, description, category, level and duration
    BasicInfo,
    /// What learners will be able to do after the course
    LearningObjectives,
    /// Module and lesson structure
    OutlineGeneration,
    /// Lesson bodies
    ContentCreation,
    /// Final review and publishing settings
    ReviewFinalize,
}

const ORDER: [Phase; 5] = [
    Phase::BasicInfo,
    Phase::LearningObjectives,
    Phase::OutlineGeneration,
    Phase::ContentCreation,
    Phase::ReviewFinalize,
];

impl Phase {
    /// All phases in progression order.
    pub fn all() -> &'static [Phase] {
        &ORDER
    }

    /// Zero-based position in the progression order.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Phase> {
        ORDER.get(index).copied()
    }

    pub fn first() -> Phase {
        ORDER[0]
    }

    pub fn last() -> Phase {
        ORDER[ORDER.len() - 1]
    }

    pub fn next(self) -> Option<Phase> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Phase> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::BasicInfo => "basic-info",
            Phase::LearningObjectives => "learning-objectives",
            Phase::OutlineGeneration => "outline-generation",
            Phase::ContentCreation => "content-creation",
            Phase::ReviewFinalize => "review-finalize",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ORDER
            .iter()
            .copied()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| Error::UnknownPhase(s.to_string()))
    }
}
