use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::info;

use workflow_engine::{
    init_telemetry, transition_span, CallbackRegistry, EngineConfig, Transition, Workflow,
    WorkflowDefinition, WorkflowRegistry,
};

/// Objects driven from the command line are plain JSON records
type Record = Map<String, Value>;

#[derive(Parser)]
#[command(name = "workflow-engine")]
#[command(about = "Validate and exercise declarative workflow definitions")]
struct Cli {
    /// Configuration file (defaults to ./workflow-engine.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate workflow definition files (defaults to the configured definitions)
    Check {
        files: Vec<PathBuf>,
    },
    /// List the transitions available from a state
    Transitions {
        file: PathBuf,
        /// State to list transitions from (defaults to the initial state)
        #[arg(long)]
        state: Option<String>,
    },
    /// Walk a fresh object through the named transitions
    Simulate {
        file: PathBuf,
        #[arg(required = true)]
        transitions: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    EngineConfig::load_env_file()?;
    let config = match &cli.config {
        Some(path) => EngineConfig::load_from(path)?,
        None => EngineConfig::load()?,
    };
    init_telemetry(&config.observability)?;

    match cli.command {
        Commands::Check { files } => {
            let files = if files.is_empty() {
                config.definitions.clone()
            } else {
                files
            };
            check(&files)
        }
        Commands::Transitions { file, state } => list_transitions(&file, state.as_deref()),
        Commands::Simulate { file, transitions } => simulate(&file, &transitions),
    }
}

/// Callbacks named in a definition resolve to no-ops that only log.
fn logging_callbacks(definition: &WorkflowDefinition) -> CallbackRegistry<Record> {
    let mut callbacks = CallbackRegistry::new();
    for name in definition.callback_names() {
        let callback_name = name.to_string();
        callbacks.register(name, move |_: &mut Record, transition: &Transition<Record>| {
            info!(
                callback = %callback_name,
                transition = %transition.name,
                "Callback invoked"
            );
            Ok(())
        });
    }
    callbacks
}

fn load(file: &Path) -> Result<(WorkflowDefinition, Workflow<Record>)> {
    let definition = WorkflowDefinition::from_path(file)
        .with_context(|| format!("Failed to load {}", file.display()))?;
    let workflow = definition
        .build(&logging_callbacks(&definition))
        .with_context(|| format!("Invalid workflow in {}", file.display()))?;
    Ok((definition, workflow))
}

fn check(files: &[PathBuf]) -> Result<()> {
    if files.is_empty() {
        bail!("No workflow definitions given and none configured");
    }

    // Register as startup would, so clashing (name, for) pairs are caught too
    let mut registry: WorkflowRegistry<Record> = WorkflowRegistry::new();
    let mut failures = 0;
    for file in files {
        let registered = load(file).and_then(|(definition, workflow)| {
            let summary = format!(
                "workflow '{}' ({} states, {} transitions)",
                definition.name,
                workflow.machine().states().len(),
                workflow.machine().all_transitions().len()
            );
            registry
                .register(&definition.name, definition.for_type.as_deref(), workflow)
                .with_context(|| format!("Conflicting workflow in {}", file.display()))?;
            Ok(summary)
        });

        match registered {
            Ok(summary) => println!("✅ {}: {}", file.display(), summary),
            Err(e) => {
                failures += 1;
                println!("❌ {}: {:#}", file.display(), e);
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} workflow definitions are invalid", files.len());
    }
    Ok(())
}

fn list_transitions(file: &Path, state: Option<&str>) -> Result<()> {
    let (_, workflow) = load(file)?;
    let state = state.unwrap_or(workflow.initial_state());

    if !workflow.machine().has_state(state) {
        bail!("Unknown state '{state}'");
    }

    let transitions = workflow.machine().transitions(state);
    println!("Transitions from '{state}':");
    if transitions.is_empty() {
        println!("  (none)");
    }
    for transition in transitions {
        match transition.permission() {
            Some(permission) => println!(
                "  {} -> {} [permission: {}]",
                transition.name, transition.to_state, permission
            ),
            None => println!("  {} -> {}", transition.name, transition.to_state),
        }
    }
    Ok(())
}

fn simulate(file: &Path, transitions: &[String]) -> Result<()> {
    let (definition, workflow) = load(file)?;
    let mut record = Record::new();
    workflow.initialize(&mut record);
    println!("initial: {}", workflow.state_of(&record)?);

    for name in transitions {
        let _span = transition_span(&definition.name, name).entered();
        let from_state = workflow.state_of(&record)?;
        workflow.transition(&mut record, name)?;
        println!("{name}: {from_state} -> {}", workflow.state_of(&record)?);
    }

    println!("{}", Value::Object(record));
    Ok(())
}
