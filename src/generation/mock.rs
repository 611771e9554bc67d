//! Template-backed stand-in for a real content backend.
//!
//! `MockGenerator` walks through fixed progress milestones with a randomized
//! pause before each one, then fills a canned template for the requested
//! type from the course context.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::clog_trace;
use crate::error::Result;

use super::result::{
    Assessment, AssessmentQuestion, CourseOutline, LessonContent, LessonKind, ObjectiveList,
    OutlineLesson, OutlineModule, Priority, QuestionKind, Suggestion, SuggestionList,
};
use super::{
    Clock, ContentGenerator, GenerationContext, GenerationResult, GenerationType, ProgressReporter,
};

/// Progress values reported, in order, during one generation.
pub const PROGRESS_MILESTONES: [u8; 5] = [20, 40, 60, 80, 100];

/// Course hours covered by one outline module.
const HOURS_PER_MODULE: u32 = 20;
const DEFAULT_DURATION_HOURS: u32 = 20;
/// Longest course the wizard accepts.
const MAX_DURATION_HOURS: u32 = 200;
const DEFAULT_QUESTION_COUNT: usize = 5;
const MAX_QUESTION_COUNT: usize = 50;
/// Shortest description the wizard accepts, in characters.
const MIN_DESCRIPTION_CHARS: usize = 50;

const MODULE_THEMES: [&str; 6] = [
    "Foundations",
    "Core Concepts",
    "Practical Applications",
    "Advanced Techniques",
    "Real-World Projects",
    "Mastery and Next Steps",
];

const LESSON_PLAN: [(LessonKind, &str, u32); 3] = [
    (LessonKind::Video, "Introduction to", 15),
    (LessonKind::Reading, "Working with", 20),
    (LessonKind::Exercise, "Hands-on practice:", 30),
];

pub struct MockGenerator {
    clock: Arc<dyn Clock>,
    min_step_delay: Duration,
    max_step_delay: Duration,
}

impl MockGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            min_step_delay: Duration::from_millis(500),
            max_step_delay: Duration::from_millis(1500),
        }
    }

    pub fn with_step_delay(mut self, min: Duration, max: Duration) -> Self {
        self.min_step_delay = min.min(max);
        self.max_step_delay = min.max(max);
        self
    }

    fn step_delay(&self) -> Duration {
        let lo = self.min_step_delay.as_millis() as u64;
        let hi = self.max_step_delay.as_millis() as u64;
        Duration::from_millis(fastrand::u64(lo..=hi))
    }
}

#[async_trait]
impl ContentGenerator for MockGenerator {
    async fn generate(
        &self,
        kind: GenerationType,
        context: &GenerationContext,
        progress: &ProgressReporter,
    ) -> Result<GenerationResult> {
        for milestone in PROGRESS_MILESTONES {
            self.clock.sleep(self.step_delay()).await;
            clog_trace!("MockGenerator {} {}: {}%", kind, progress.id().short(), milestone);
            progress.report(milestone);
        }
        Ok(render(kind, context))
    }
}

/// Fill the template for `kind`.
pub fn render(kind: GenerationType, context: &GenerationContext) -> GenerationResult {
    match kind {
        GenerationType::CourseOutline => GenerationResult::CourseOutline(outline(context)),
        GenerationType::LearningObjectives => {
            GenerationResult::LearningObjectives(objectives(context))
        }
        GenerationType::LessonContent => GenerationResult::LessonContent(lesson(context)),
        GenerationType::Assessment => GenerationResult::Assessment(assessment(context)),
        GenerationType::EnhancementSuggestions => {
            GenerationResult::EnhancementSuggestions(suggestions(context))
        }
    }
}

fn level(context: &GenerationContext) -> &str {
    context.level.as_deref().unwrap_or("beginner")
}

fn topic(context: &GenerationContext) -> &str {
    context.topic.as_deref().unwrap_or(&context.title)
}

fn outline(context: &GenerationContext) -> CourseOutline {
    let hours = context
        .duration
        .unwrap_or(DEFAULT_DURATION_HOURS)
        .clamp(1, MAX_DURATION_HOURS);
    let module_count = hours.div_ceil(HOURS_PER_MODULE) as usize;

    let modules = (0..module_count)
        .map(|i| {
            let theme = MODULE_THEMES[i % MODULE_THEMES.len()];
            OutlineModule {
                title: format!("Module {}: {}", i + 1, theme),
                description: format!(
                    "{} of {} for {} learners.",
                    theme,
                    context.title,
                    level(context)
                ),
                lessons: LESSON_PLAN
                    .iter()
                    .map(|(kind, prefix, minutes)| OutlineLesson {
                        title: format!("{} {}", prefix, theme.to_lowercase()),
                        kind: *kind,
                        duration_minutes: *minutes,
                    })
                    .collect(),
            }
        })
        .collect();

    CourseOutline {
        title: context.title.clone(),
        description: context.description.clone().unwrap_or_else(|| match &context.category {
            Some(category) => format!(
                "A {}-hour {} {} course on {}.",
                hours,
                level(context),
                category,
                context.title
            ),
            None => format!(
                "A {}-hour {} course on {}.",
                hours,
                level(context),
                context.title
            ),
        }),
        modules,
    }
}

fn objectives(context: &GenerationContext) -> ObjectiveList {
    let title = &context.title;
    let mut objectives = vec![
        format!("Explain the core principles of {}", title),
        format!("Apply {} techniques to practical problems", title),
        format!("Analyze common patterns and pitfalls in {}", title),
        format!("Build a complete project using {}", title),
    ];
    if level(context) != "beginner" {
        objectives.push(format!("Evaluate trade-offs between approaches in {}", title));
    }
    ObjectiveList { objectives }
}

fn lesson(context: &GenerationContext) -> LessonContent {
    let topic = topic(context);
    let mut markdown = format!("# {}\n\n## Overview\n\n", topic);
    markdown.push_str(&format!(
        "This lesson introduces {} as part of {}.\n\n",
        topic, context.title
    ));
    markdown.push_str("## Key Concepts\n\n");
    for concept in ["Terminology", "How it works", "When to use it"] {
        markdown.push_str(&format!("- **{}**: {} in the context of {}.\n", concept, concept, topic));
    }
    if !context.objectives.is_empty() {
        markdown.push_str("\n## You Will Learn To\n\n");
        for objective in &context.objectives {
            markdown.push_str(&format!("- {}\n", objective));
        }
    }
    markdown.push_str("\n## Example\n\nWork through a short example applying each concept.\n");
    markdown.push_str(&format!(
        "\n## Summary\n\nYou now know the fundamentals of {}.\n",
        topic
    ));

    LessonContent {
        title: topic.to_string(),
        markdown,
        estimated_minutes: 20,
    }
}

fn assessment(context: &GenerationContext) -> Assessment {
    let topic = topic(context);
    let count = context
        .question_count
        .unwrap_or(DEFAULT_QUESTION_COUNT)
        .clamp(1, MAX_QUESTION_COUNT);

    let questions = (0..count)
        .map(|i| {
            if i % 2 == 0 {
                AssessmentQuestion {
                    question: format!("Question {}: Which statement about {} is correct?", i + 1, topic),
                    kind: QuestionKind::MultipleChoice,
                    options: vec![
                        format!("{} has no practical uses", topic),
                        format!("{} builds on a small set of core principles", topic),
                        format!("{} only applies to experts", topic),
                        "None of the above".to_string(),
                    ],
                    correct_answer: 1,
                    explanation: format!(
                        "{} is grounded in core principles covered in this course.",
                        topic
                    ),
                }
            } else {
                AssessmentQuestion {
                    question: format!(
                        "Question {}: True or false: practice is essential to mastering {}.",
                        i + 1,
                        topic
                    ),
                    kind: QuestionKind::TrueFalse,
                    options: vec!["True".to_string(), "False".to_string()],
                    correct_answer: 0,
                    explanation: "Hands-on practice reinforces every concept.".to_string(),
                }
            }
        })
        .collect();

    Assessment {
        title: format!("{} Assessment", topic),
        questions,
    }
}

fn suggestions(context: &GenerationContext) -> SuggestionList {
    let mut suggestions = Vec::new();
    let short_description = context
        .description
        .as_deref()
        .map_or(true, |d| d.trim().chars().count() < MIN_DESCRIPTION_CHARS);
    if short_description {
        suggestions.push(Suggestion {
            area: "description".to_string(),
            suggestion: "Expand the course description to explain who it is for and what they will build.".to_string(),
            priority: Priority::High,
        });
    }
    if context.objectives.len() < 3 {
        suggestions.push(Suggestion {
            area: "objectives".to_string(),
            suggestion: "Add at least three measurable learning objectives.".to_string(),
            priority: Priority::High,
        });
    }
    suggestions.push(Suggestion {
        area: "engagement".to_string(),
        suggestion: format!("Add a short quiz after each module of {}.", context.title),
        priority: Priority::Medium,
    });
    suggestions.push(Suggestion {
        area: "accessibility".to_string(),
        suggestion: "Provide transcripts for every video lesson.".to_string(),
        priority: Priority::Low,
    });
    SuggestionList { suggestions }
}
