//! Course-creation wizard: phases, their configuration and validation, and
//! the `WorkflowManager` that gates progression through them.

mod phases;
mod state;
mod types;
mod validation;

pub use phases::{PhaseConfig, ValidationRule};
pub use state::{PhaseCompletion, PhaseHistoryEntry, WorkflowManager, WorkflowSnapshot};
pub use types::{Phase, PhaseData};
pub use validation::{validate_phase_data, FieldErrors, ValidationResult};
