//! Generation tracking: history, cancellation, failure and concurrency.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{mpsc, Notify};

use coursecraft::config::{Config, GenerationConfig};
use coursecraft::generation::{
    GenerationEvent, GenerationManager, GenerationOptions, GenerationStatus, GenerationType,
    QuestionKind,
};
use coursecraft::Error;

use crate::fixtures::{intro_context, mock_manager, FlakyGenerator, GatedGenerator};

/// Test: outline generation
/// Given an intro course of 40 hours
/// When a course outline is generated
/// Then it has two modules, each with lessons, and the record is in history
#[tokio::test(start_paused = true)]
async fn test_course_outline_scenario() {
    let manager = mock_manager();

    let result = manager
        .generate_content(
            GenerationType::CourseOutline,
            intro_context(),
            GenerationOptions::default(),
        )
        .await
        .unwrap();

    let outline = result.as_outline().expect("outline payload");
    assert_eq!(outline.modules.len(), 2);
    assert!(outline.modules.iter().all(|m| !m.lessons.is_empty()));

    let history = manager.get_generation_history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, GenerationStatus::Completed);
    assert_eq!(history[0].progress, 100);
    assert!(manager.get_active_generations().is_empty());
}

/// Test: every type resolves to its own payload shape
#[tokio::test(start_paused = true)]
async fn test_each_type_has_its_own_shape() {
    let manager = mock_manager();

    for kind in GenerationType::all() {
        let result = manager
            .generate_content(*kind, intro_context(), GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(result.kind(), *kind);
        match kind {
            GenerationType::CourseOutline => assert!(result.as_outline().is_some()),
            GenerationType::LearningObjectives => {
                assert!(!result.as_objectives().unwrap().is_empty())
            }
            GenerationType::LessonContent => {
                assert!(result.as_lesson().unwrap().markdown.starts_with("# "))
            }
            GenerationType::Assessment => assert_eq!(
                result.as_assessment().unwrap().questions[0].kind,
                QuestionKind::MultipleChoice
            ),
            GenerationType::EnhancementSuggestions => {
                assert!(!result.as_suggestions().unwrap().is_empty())
            }
        }
    }

    let kinds: Vec<_> = manager
        .get_generation_history()
        .iter()
        .map(|r| r.kind)
        .collect();
    assert_eq!(kinds, GenerationType::all().to_vec());
}

/// Test: concurrent generations keep independent, ordered progress
#[tokio::test(start_paused = true)]
async fn test_concurrent_generations() {
    let manager = mock_manager();
    let progress: Arc<Mutex<Vec<(GenerationType, u8)>>> = Arc::default();

    let runs = GenerationType::all().iter().map(|kind| {
        let kind = *kind;
        let sink = Arc::clone(&progress);
        let options =
            GenerationOptions::default().with_progress(move |p| sink.lock().unwrap().push((kind, p)));
        manager.generate_content(kind, intro_context(), options)
    });
    let results = join_all(runs).await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert!(manager.get_active_generations().is_empty());

    let history = manager.get_generation_history();
    assert_eq!(history.len(), 5);
    let ids: HashSet<_> = history.iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), 5);

    let progress = progress.lock().unwrap();
    for kind in GenerationType::all() {
        let seen: Vec<u8> = progress
            .iter()
            .filter(|(k, _)| k == kind)
            .map(|(_, p)| *p)
            .collect();
        assert_eq!(seen, vec![20, 40, 60, 80, 100], "progress for {}", kind);
    }
}

/// Test: active records are visible while in flight
#[tokio::test]
async fn test_active_while_in_flight() {
    let release = Arc::new(Notify::new());
    let manager = GenerationManager::new().with_generator(GatedGenerator {
        progress: 30,
        release: Arc::clone(&release),
    });

    let worker = manager.clone();
    let handle = tokio::spawn(async move {
        worker
            .generate_content(
                GenerationType::LearningObjectives,
                intro_context(),
                GenerationOptions::default(),
            )
            .await
    });

    let record = loop {
        if let Some(record) = manager.get_active_generations().pop() {
            if record.progress == 30 {
                break record;
            }
        }
        tokio::task::yield_now().await;
    };
    assert_eq!(record.status, GenerationStatus::Pending);
    assert!(record.ended_at.is_none());
    assert!(manager.get_generation_history().is_empty());

    release.notify_one();
    handle.await.unwrap().unwrap();

    assert!(manager.get_active_generations().is_empty());
    assert_eq!(
        manager.get_generation(record.id).unwrap().status,
        GenerationStatus::Completed
    );
}

/// Test: cancel succeeds exactly once
#[tokio::test]
async fn test_cancel_exactly_once() {
    let release = Arc::new(Notify::new());
    let (tx, mut rx) = mpsc::unbounded_channel();
    let manager = GenerationManager::new()
        .with_generator(GatedGenerator {
            progress: 10,
            release: Arc::clone(&release),
        })
        .with_events(tx);

    let worker = manager.clone();
    let handle = tokio::spawn(async move {
        worker
            .generate_content(
                GenerationType::Assessment,
                intro_context(),
                GenerationOptions::default(),
            )
            .await
    });

    let id = match rx.recv().await {
        Some(GenerationEvent::Started { id, .. }) => id,
        other => panic!("expected Started, got {:?}", other),
    };

    assert!(manager.cancel_generation(id));
    assert!(!manager.cancel_generation(id));
    assert!(!manager.cancel_generation(id));

    let err = handle.await.unwrap().unwrap_err();
    assert!(matches!(err, Error::GenerationCancelled { .. }));

    let history = manager.get_generation_history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, GenerationStatus::Cancelled);
    assert!(history[0].ended_at.is_some());

    let mut cancelled = 0;
    while let Ok(event) = rx.try_recv() {
        if matches!(event, GenerationEvent::Cancelled { .. }) {
            cancelled += 1;
        }
    }
    assert_eq!(cancelled, 1);
}

/// Test: cancel_all clears every in-flight generation
#[tokio::test(start_paused = true)]
async fn test_cancel_all() {
    let manager = mock_manager();

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let worker = manager.clone();
            tokio::spawn(async move {
                worker
                    .generate_content(
                        GenerationType::LessonContent,
                        intro_context(),
                        GenerationOptions::default(),
                    )
                    .await
            })
        })
        .collect();

    while manager.get_active_generations().len() < 3 {
        tokio::task::yield_now().await;
    }

    assert_eq!(manager.cancel_all(), 3);
    assert_eq!(manager.cancel_all(), 0);

    for handle in handles {
        assert!(matches!(
            handle.await.unwrap(),
            Err(Error::GenerationCancelled { .. })
        ));
    }
    assert!(manager
        .get_generation_history()
        .iter()
        .all(|r| r.status == GenerationStatus::Cancelled));
}

/// Test: one failing type does not disturb the others
#[tokio::test]
async fn test_failure_is_isolated() {
    let manager = GenerationManager::new().with_generator(FlakyGenerator {
        failing: GenerationType::Assessment,
    });

    let ok = manager
        .generate_content(
            GenerationType::CourseOutline,
            intro_context(),
            GenerationOptions::default(),
        )
        .await;
    let failed = manager
        .generate_content(
            GenerationType::Assessment,
            intro_context(),
            GenerationOptions::default(),
        )
        .await;

    assert!(ok.is_ok());
    match failed {
        Err(Error::GenerationFailed(msg)) => assert!(msg.contains("503")),
        other => panic!("expected GenerationFailed, got {:?}", other),
    }

    let history = manager.get_generation_history();
    assert_eq!(history[0].status, GenerationStatus::Completed);
    assert_eq!(history[1].status, GenerationStatus::Failed);
    assert!(history[1].error.as_deref().unwrap().contains("503"));
    assert!(manager.get_active_generations().is_empty());
}

/// Test: configured timeout turns a slow generation into a failure
#[tokio::test(start_paused = true)]
async fn test_config_timeout() {
    let config = Config {
        generation: GenerationConfig {
            min_step_delay_ms: 900,
            max_step_delay_ms: 900,
            timeout_secs: Some(3),
        },
    };
    let manager = GenerationManager::from_config(&config);

    let err = manager
        .generate_content(
            GenerationType::CourseOutline,
            intro_context(),
            GenerationOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout(d) if d == Duration::from_secs(3)));
    let record = &manager.get_generation_history()[0];
    assert_eq!(record.status, GenerationStatus::Failed);
    assert_eq!(record.progress, 60);
}
