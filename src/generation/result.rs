//! Typed payloads produced by each generation type.

use serde::{Deserialize, Serialize};

use super::GenerationType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GenerationResult {
    CourseOutline(CourseOutline),
    LearningObjectives(ObjectiveList),
    LessonContent(LessonContent),
    Assessment(Assessment),
    EnhancementSuggestions(SuggestionList),
}

impl GenerationResult {
    pub fn kind(&self) -> GenerationType {
        match self {
            GenerationResult::CourseOutline(_) => GenerationType::CourseOutline,
            GenerationResult::LearningObjectives(_) => GenerationType::LearningObjectives,
            GenerationResult::LessonContent(_) => GenerationType::LessonContent,
            GenerationResult::Assessment(_) => GenerationType::Assessment,
            GenerationResult::EnhancementSuggestions(_) => GenerationType::EnhancementSuggestions,
        }
    }

    pub fn as_outline(&self) -> Option<&CourseOutline> {
        match self {
            GenerationResult::CourseOutline(outline) => Some(outline),
            _ => None,
        }
    }

    pub fn as_objectives(&self) -> Option<&[String]> {
        match self {
            GenerationResult::LearningObjectives(list) => Some(&list.objectives),
            _ => None,
        }
    }

    pub fn as_lesson(&self) -> Option<&LessonContent> {
        match self {
            GenerationResult::LessonContent(lesson) => Some(lesson),
            _ => None,
        }
    }

    pub fn as_assessment(&self) -> Option<&Assessment> {
        match self {
            GenerationResult::Assessment(assessment) => Some(assessment),
            _ => None,
        }
    }

    pub fn as_suggestions(&self) -> Option<&[Suggestion]> {
        match self {
            GenerationResult::EnhancementSuggestions(list) => Some(&list.suggestions),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseOutline {
    pub title: String,
    pub description: String,
    pub modules: Vec<OutlineModule>,
}

impl CourseOutline {
    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineModule {
    pub title: String,
    pub description: String,
    pub lessons: Vec<OutlineLesson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineLesson {
    pub title: String,
    pub kind: LessonKind,
    pub duration_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonKind {
    Video,
    Reading,
    Exercise,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveList {
    pub objectives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonContent {
    pub title: String,
    /// Lesson body as Markdown.
    pub markdown: String,
    pub estimated_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub title: String,
    pub questions: Vec<AssessmentQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentQuestion {
    pub question: String,
    pub kind: QuestionKind,
    pub options: Vec<String>,
    /// Index into `options`.
    pub correct_answer: usize,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionList {
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub area: String,
    pub suggestion: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}
