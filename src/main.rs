use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use task_recorder_lib::capture::{CoordinateScaler, NativeInputSource};
use task_recorder_lib::config::{self, Settings};
use task_recorder_lib::executor::{ComputerTool, Desktop, NativeDesktop};
use task_recorder_lib::playback::PlaybackEngine;
use task_recorder_lib::recorder::{TaskRecorder, DEFAULT_ABORT_KEY};
use task_recorder_lib::task::{Task, TaskStore};

#[derive(Parser)]
#[command(name = "task-recorder", version, about = "Record and replay desktop tasks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record a new task until the abort key is pressed
    Record {
        /// Task name (also determines the file name)
        #[arg(short, long)]
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Symbolic key that stops recording
        #[arg(long, default_value = DEFAULT_ABORT_KEY)]
        abort_key: String,
    },
    /// Replay a saved task
    Play {
        name: String,
    },
    /// List saved tasks
    List,
    /// Print the executor capability descriptor as JSON
    Params,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    task_recorder_lib::init_tracing();

    let settings = config::init(Settings::from_env()?)?;
    let store = TaskStore::new(&settings.tasks_dir)
        .with_context(|| format!("opening task directory {}", settings.tasks_dir.display()))?;

    match cli.command {
        Command::Record {
            name,
            description,
            abort_key,
        } => {
            let desktop = NativeDesktop::new(settings.failsafe);
            let scaler =
                CoordinateScaler::new(desktop.screen_size()?, settings.scaling_target.resolution())?;
            let recorder = TaskRecorder::new(Arc::new(NativeInputSource), scaler)
                .with_abort_key(abort_key.clone());

            println!("Recording started. Press '{}' to stop recording...", abort_key);
            let actions = recorder.start()?.wait().await?;
            println!("Recording stopped.");

            let path = store.save(&Task::new(name, description, actions))?;
            println!("Task saved to {}", path.display());
        }
        Command::Play { name } => {
            let task = store.load(&name)?;
            let tool = ComputerTool::new(Arc::new(NativeDesktop::new(settings.failsafe)), settings)?;
            let report = PlaybackEngine::new(&tool)
                .with_wait_before_action(settings.wait_before_action)
                .play(&task)
                .await;
            println!(
                "Executed {} action(s), {} failed",
                report.executed,
                report.failures.len()
            );
        }
        Command::List => {
            let tasks = store.list()?;
            if tasks.is_empty() {
                println!("No tasks available");
            } else {
                println!("Available tasks:");
                for task in tasks {
                    println!("- {}", task);
                }
            }
        }
        Command::Params => {
            let tool = ComputerTool::new(Arc::new(NativeDesktop::new(settings.failsafe)), settings)?;
            println!("{}", serde_json::to_string_pretty(&tool.to_params())?);
        }
    }

    Ok(())
}
