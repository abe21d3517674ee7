use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use parlance::config::Config;
use parlance::executor::Executor;
use parlance::formatter::PlainTextFormatter;
use parlance::keyboard::{EnigoOutput, InputMethod, KeyboardOutput, Recorder};
use parlance::registry::CommandRegistry;
use parlance::signals::{self, UserSignals};

#[derive(Parser)]
#[command(name = "parlance", about = "Voice-command dictation engine")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "parlance.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Type out utterances read line by line from stdin (default)
    Run {
        /// Record keyboard events and print them instead of sending them
        #[arg(long)]
        dry_run: bool,
    },
    /// Run one utterance through the dictation formatter and print it
    Format {
        /// The utterance
        text: Vec<String>,
    },
    /// List the command names the configuration defines
    Commands,
}

fn main() -> anyhow::Result<()> {
    // Respects RUST_LOG, defaults to info; stdout stays clean for dry runs
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    match cli.command.unwrap_or(Command::Run { dry_run: false }) {
        Command::Run { dry_run } => run(config, dry_run),
        Command::Format { text } => {
            let mut formatter = PlainTextFormatter::new(&config.camel_trigger);
            println!("{:?}", formatter.format(&text.join(" "), false, false));
            Ok(())
        }
        Command::Commands => {
            let registry = CommandRegistry::from_definitions(&config.commands)?;
            for name in registry.names() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn run(config: Config, dry_run: bool) -> anyhow::Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || r.store(false, Ordering::SeqCst))?;

    let signals = Arc::new(UserSignals::new());
    let _listener = signals::spawn_listener(Arc::clone(&signals), running.clone());

    // Channel: recognizer boundary -> engine
    let (utterance_tx, utterance_rx) = flume::unbounded::<String>();

    // Stdin reader thread; each line is one utterance
    let _reader = thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if utterance_tx.send(line).is_err() {
                break;
            }
        }
    });

    let recorder = dry_run.then(Recorder::new);
    let keys: Box<dyn KeyboardOutput> = match &recorder {
        Some(recorder) => Box::new(recorder.clone()),
        None => Box::new(EnigoOutput::new(InputMethod::from_str(
            &config.input_method,
        ))?),
    };

    let executor = Executor::new(&config, signals, keys)?;
    info!(
        escape_word = %config.escape_word,
        commands = config.commands.len(),
        dry_run,
        "parlance started"
    );
    println!("Listening on stdin. Ctrl+C to stop.");

    executor.run(utterance_rx, running);

    if let Some(recorder) = recorder {
        for event in recorder.events() {
            println!("{event:?}");
        }
    }
    Ok(())
}
