//! Static per-phase configuration: display metadata, required fields and
//! field validation rules. Built at compile time, never mutated.

use serde::Serialize;

use super::Phase;

/// Constraints applied to a single field.
///
/// Length bounds apply to strings (in characters), `min`/`max` to numbers and
/// count bounds to arrays. A bound on a value of another kind is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ValidationRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_count: Option<usize>,
}

const NO_RULE: ValidationRule = ValidationRule {
    min_length: None,
    max_length: None,
    min: None,
    max: None,
    min_count: None,
    max_count: None,
};

#[derive(Debug, Clone, Serialize)]
pub struct PhaseConfig {
    pub phase: Phase,
    pub title: &'static str,
    pub description: &'static str,
    pub estimated_time: &'static str,
    pub required_fields: &'static [&'static str],
    pub validations: &'static [(&'static str, ValidationRule)],
}

static PHASE_CONFIGS: [PhaseConfig; 5] = [
    PhaseConfig {
        phase: Phase::BasicInfo,
        title: "Basic Information",
        description: "Set up the foundation of your course",
        estimated_time: "5-10 minutes",
        required_fields: &["title", "description", "category", "level", "duration"],
        validations: &[
            ("title", ValidationRule { max_length: Some(100), ..NO_RULE }),
            (
                "description",
                ValidationRule { min_length: Some(50), max_length: Some(2000), ..NO_RULE },
            ),
            ("duration", ValidationRule { min: Some(1.0), max: Some(200.0), ..NO_RULE }),
        ],
    },
    PhaseConfig {
        phase: Phase::LearningObjectives,
        title: "Learning Objectives",
        description: "Define what students will be able to do after the course",
        estimated_time: "10-15 minutes",
        required_fields: &["objectives"],
        validations: &[
            ("objectives", ValidationRule { min_count: Some(3), max_count: Some(10), ..NO_RULE }),
            ("targetAudience", ValidationRule { max_length: Some(500), ..NO_RULE }),
        ],
    },
    PhaseConfig {
        phase: Phase::OutlineGeneration,
        title: "Course Outline",
        description: "Structure the course into modules and lessons",
        estimated_time: "15-20 minutes",
        required_fields: &["modules"],
        validations: &[(
            "modules",
            ValidationRule { min_count: Some(1), max_count: Some(20), ..NO_RULE },
        )],
    },
    PhaseConfig {
        phase: Phase::ContentCreation,
        title: "Content Creation",
        description: "Write the lesson content for each module",
        estimated_time: "30-60 minutes",
        required_fields: &["lessons"],
        validations: &[("lessons", ValidationRule { min_count: Some(1), ..NO_RULE })],
    },
    PhaseConfig {
        phase: Phase::ReviewFinalize,
        title: "Review & Finalize",
        description: "Review everything and choose how the course is published",
        estimated_time: "5-10 minutes",
        required_fields: &["visibility"],
        validations: &[("price", ValidationRule { min: Some(0.0), max: Some(999.0), ..NO_RULE })],
    },
];

impl PhaseConfig {
    pub fn for_phase(phase: Phase) -> &'static PhaseConfig {
        &PHASE_CONFIGS[phase.index()]
    }

    /// The whole table, in phase order.
    pub fn all() -> &'static [PhaseConfig] {
        &PHASE_CONFIGS
    }

    pub fn is_required(&self, field: &str) -> bool {
        self.required_fields.contains(&field)
    }

    pub fn rule_for(&self, field: &str) -> Option<&ValidationRule> {
        self.validations
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, rule)| rule)
    }
}
