//! Content generation tracking.
//!
//! `GenerationManager` records each request from start to a single terminal
//! state and hands the actual work to a `ContentGenerator`. The bundled
//! `MockGenerator` fills canned templates after a simulated delay; a real
//! backend plugs in through the same trait.

mod clock;
mod generator;
mod manager;
mod mock;
mod result;
mod types;

pub use clock::{Clock, TokioClock};
pub use generator::{ContentGenerator, ProgressReporter};
pub use manager::GenerationManager;
pub use mock::{render, MockGenerator, PROGRESS_MILESTONES};
pub use result::{
    Assessment, AssessmentQuestion, CourseOutline, GenerationResult, LessonContent, LessonKind,
    ObjectiveList, OutlineLesson, OutlineModule, Priority, QuestionKind, Suggestion,
    SuggestionList,
};
pub use types::{
    GenerationContext, GenerationEvent, GenerationId, GenerationOptions, GenerationRecord,
    GenerationStatus, GenerationType, ProgressCallback,
};
