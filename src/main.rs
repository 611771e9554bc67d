use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use futures::future::join_all;

use coursecraft::config::Config;
use coursecraft::generation::{
    GenerationContext, GenerationManager, GenerationOptions, GenerationType,
};
use coursecraft::workflow::{Phase, PhaseConfig, PhaseData, WorkflowManager, WorkflowSnapshot};
use coursecraft::{clog, clog_error, Error, Result};

/// Coursecraft - course-creation wizard and content generation
#[derive(Parser, Debug)]
#[command(name = "coursecraft")]
#[command(version, about, long_about = None)]
#[command(after_help = "ENVIRONMENT:\n    COURSECRAFT_DEBUG=1     Enable debug logging (alternative to --debug)")]
pub struct Cli {
    /// Enable debug logging (writes to ~/.coursecraft/coursecraft.log)
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List the wizard phases with their required fields
    Phases,

    /// Validate a JSON payload against a phase
    Validate {
        /// Phase identifier, e.g. basic-info
        phase: String,
        /// JSON file holding the payload object
        file: PathBuf,
    },

    /// Drive the wizard through every phase from a JSON file keyed by phase
    Wizard {
        /// JSON object mapping phase identifiers to payload objects
        file: PathBuf,

        /// Continue from a previously saved snapshot
        #[arg(long)]
        resume: Option<PathBuf>,

        /// Write the resulting wizard state here
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },

    /// Generate course content (several types run concurrently)
    Generate {
        /// One or more of: course-outline, learning-objectives, lesson-content,
        /// assessment, enhancement-suggestions
        #[arg(required = true)]
        types: Vec<String>,

        /// JSON file with the generation context; flags override its fields
        #[arg(long)]
        context: Option<PathBuf>,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        level: Option<String>,

        /// Course length in hours
        #[arg(long)]
        duration: Option<u32>,

        /// Lesson or module the content is for
        #[arg(long)]
        topic: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    coursecraft::log::init_with_debug(cli.debug);
    if coursecraft::log::is_debug() {
        clog!("coursecraft starting (debug mode enabled)");
    }

    let result = match cli.command {
        Command::Phases => run_phases(),
        Command::Validate { phase, file } => run_validate(&phase, &file),
        Command::Wizard {
            file,
            resume,
            snapshot,
        } => run_wizard(&file, resume.as_deref(), snapshot.as_deref()),
        Command::Generate {
            types,
            context,
            title,
            level,
            duration,
            topic,
        } => build_context(context.as_deref(), title, level, duration, topic)
            .and_then(|context| run_generate(&types, context)),
    };

    if let Err(e) = result {
        clog_error!("command failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn read_object(path: &Path) -> Result<PhaseData> {
    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;
    match value {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(Error::Validation(format!(
            "{} must contain a JSON object",
            path.display()
        ))),
    }
}

fn run_phases() -> Result<()> {
    for config in PhaseConfig::all() {
        println!(
            "{}. {} [{}] ({})",
            config.phase.index() + 1,
            config.title,
            config.phase,
            config.estimated_time
        );
        println!("   {}", config.description);
        println!("   required: {}", config.required_fields.join(", "));
    }
    Ok(())
}

fn run_validate(phase: &str, file: &Path) -> Result<()> {
    let phase: Phase = phase.parse()?;
    let data = read_object(file)?;
    let result = coursecraft::workflow::validate_phase_data(phase, &data);
    println!("{}", serde_json::to_string_pretty(&result)?);
    if !result.is_valid {
        std::process::exit(2);
    }
    Ok(())
}

fn run_wizard(file: &Path, resume: Option<&Path>, snapshot: Option<&Path>) -> Result<()> {
    let payloads = read_object(file)?;
    let mut by_phase = BTreeMap::new();
    for (key, value) in payloads {
        let phase: Phase = key.parse()?;
        match value {
            serde_json::Value::Object(map) => {
                by_phase.insert(phase, map);
            }
            _ => {
                return Err(Error::Validation(format!(
                    "payload for {} must be a JSON object",
                    phase
                )))
            }
        }
    }

    let mut manager = match resume {
        Some(path) => {
            let saved: WorkflowSnapshot = serde_json::from_str(&fs::read_to_string(path)?)?;
            WorkflowManager::restore(saved)?
        }
        None => WorkflowManager::new(),
    };
    clog!("Wizard starting at {}", manager.current_phase());

    loop {
        let phase = manager.current_phase();
        let title = manager.current_phase_config().title;

        if !manager.is_phase_completed(phase) {
            let Some(data) = by_phase.remove(&phase) else {
                println!("{:<20} waiting for input", title);
                break;
            };
            let outcome = manager.complete_phase(phase, data);
            if !outcome.success {
                println!("{:<20} rejected", title);
                for (field, message) in &outcome.errors {
                    println!("    {}: {}", field, message);
                }
                break;
            }
        }
        println!("{:<20} done ({:.0}%)", title, manager.phase_progress());

        if !manager.next_phase() {
            break;
        }
    }

    if manager.is_complete() {
        println!("\nAll phases complete.");
    }
    clog!(
        "Wizard stopped at {} with {:.0}% complete",
        manager.current_phase(),
        manager.phase_progress()
    );

    if let Some(path) = snapshot {
        fs::write(path, serde_json::to_string_pretty(&manager.snapshot())?)?;
        println!("Snapshot written to {}", path.display());
    }
    Ok(())
}

fn build_context(
    file: Option<&Path>,
    title: Option<String>,
    level: Option<String>,
    duration: Option<u32>,
    topic: Option<String>,
) -> Result<GenerationContext> {
    let mut context: GenerationContext = match file {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => GenerationContext::default(),
    };
    if let Some(title) = title {
        context.title = title;
    }
    if level.is_some() {
        context.level = level;
    }
    if duration.is_some() {
        context.duration = duration;
    }
    if topic.is_some() {
        context.topic = topic;
    }
    if context.title.trim().is_empty() {
        return Err(Error::Validation("a course title is required".to_string()));
    }
    Ok(context)
}

fn run_generate(types: &[String], context: GenerationContext) -> Result<()> {
    let kinds = types
        .iter()
        .map(|t| t.parse::<GenerationType>())
        .collect::<Result<Vec<_>>>()?;

    let manager = GenerationManager::from_config(&Config::load()?);
    let rt = tokio::runtime::Runtime::new()?;

    let results = rt.block_on(async {
        let runs = kinds.iter().map(|kind| {
            let kind = *kind;
            let options = GenerationOptions::default()
                .with_progress(move |progress| eprintln!("[{}] {}%", kind, progress));
            manager.generate_content(kind, context.clone(), options)
        });
        join_all(runs).await
    });

    let mut output = serde_json::Map::new();
    for (kind, result) in kinds.iter().zip(results) {
        let result = result?;
        if let Some(outline) = result.as_outline() {
            eprintln!(
                "[{}] {} modules, {} lessons",
                kind,
                outline.modules.len(),
                outline.lesson_count()
            );
        }
        output.insert(kind.to_string(), serde_json::to_value(result)?);
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
