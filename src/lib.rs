pub mod config;
pub mod error;
pub mod log;
pub mod util;

// Course-creation wizard and content generation
pub mod generation;
pub mod workflow;

pub use error::{Error, Result};
pub use generation::{GenerationManager, GenerationRecord, GenerationResult, GenerationType};
pub use workflow::{Phase, PhaseConfig, WorkflowManager};
