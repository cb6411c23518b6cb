//! Pipeline trace debugger CLI.
//!
//! This binary steps through the cycle-by-cycle trace of the pipeline simulator. It performs:
//! 1. **Run:** Invoke the simulator under a timeout and debug the trace it prints.
//! 2. **Load:** Debug a trace saved to a file.
//! 3. **Stats:** Print a summary of a saved trace and exit.
//!
//! Commands are read one per line from stdin: `w`/`s` step, `e`/`d` skip stalls,
//! `g`/`G` jump to start/end, `q` quits.

mod render;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use pipetrace_core::history::RegisterHistory;
use pipetrace_core::pipeline::decode_all;
use pipetrace_core::trace::load_file;
use pipetrace_core::{Command, Config, Session, TraceStats};

#[derive(Parser, Debug)]
#[command(
    name = "pipetrace",
    author,
    version,
    about = "Cycle-by-cycle debugger for pipeline simulator traces",
    long_about = "Step through the per-cycle pipeline state of the 5-stage simulator.\n\nExamples:\n  pipetrace run --listing prog.dump -- ./bin/main -l -j -k 0x10000 prog.hex\n  pipetrace load trace.jsonl prog.dump\n  pipetrace stats trace.jsonl"
)]
struct Cli {
    /// JSON configuration file (timeout and viewport sizes).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the simulator and debug its trace.
    Run {
        /// Disassembly listing of the simulated program.
        #[arg(short, long)]
        listing: PathBuf,

        /// Override the acquisition timeout, in milliseconds.
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Simulator executable.
        program: String,

        /// Arguments passed to the simulator.
        #[arg(allow_hyphen_values = true, trailing_var_arg = true)]
        args: Vec<String>,
    },

    /// Debug a trace saved to a file.
    Load {
        /// Newline-delimited JSON trace.
        trace: PathBuf,

        /// Disassembly listing of the traced program.
        listing: PathBuf,
    },

    /// Print trace statistics and exit.
    Stats {
        /// Newline-delimited JSON trace.
        trace: PathBuf,

        /// Sections to print (summary, stalls, registers, anomalies); all when omitted.
        #[arg(short, long)]
        section: Vec<String>,
    },
}

fn main() {
    init_logger();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path).unwrap_or_else(|e| fail(&e)),
        None => Config::default(),
    };

    match cli.command {
        Commands::Run {
            listing,
            timeout_ms,
            program,
            args,
        } => {
            if let Some(ms) = timeout_ms {
                config.acquisition_timeout_ms = ms;
            }
            let session =
                Session::acquire(&program, &args, &listing, config).unwrap_or_else(|e| fail(&e));
            interact(session);
        }
        Commands::Load { trace, listing } => {
            let session =
                Session::from_files(&trace, &listing, config).unwrap_or_else(|e| fail(&e));
            interact(session);
        }
        Commands::Stats { trace, section } => cmd_stats(&trace, &section),
    }
}

/// Initializes the global tracing subscriber; `RUST_LOG` overrides the default `warn` level.
fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn fail(err: &dyn std::error::Error) -> ! {
    error!(%err, "session could not be built");
    eprintln!("Error: {err}");
    process::exit(1);
}

/// Prints the statistics of a saved trace.
fn cmd_stats(trace: &Path, sections: &[String]) {
    let raw = load_file(trace).unwrap_or_else(|e| fail(&e));
    let cycles = decode_all(&raw);
    let history = RegisterHistory::build(&cycles);
    let stats = TraceStats::collect(&cycles, &history);
    if let Err(e) = stats.write_sections(&mut io::stdout().lock(), sections) {
        fail(&e);
    }
}

/// Renders the current cycle, then applies one command per stdin line until `q` or EOF.
fn interact(mut session: Session) {
    let history = session.config().history_viewport;
    let stdin = io::stdin();
    let mut out = io::stdout().lock();

    for line in std::iter::once(Ok(String::new())).chain(stdin.lock().lines()) {
        let line = match line {
            Ok(line) => line,
            Err(e) => fail(&e),
        };

        if let Some(key) = line.trim().chars().next() {
            match Command::from_key(key) {
                Some(Command::Quit) => break,
                Some(cmd) => {
                    let _ = session.navigator_mut().apply(cmd);
                }
                None => {
                    debug!(%key, "unbound key");
                    eprintln!("keys: w/s step, e/d skip stalls, g/G start/end, q quit");
                    continue;
                }
            }
        }

        let nav = session.navigator();
        let shown = render::snapshot(&mut out, &nav.snapshot(), nav.len(), history)
            .and_then(|()| out.flush());
        if let Err(e) = shown {
            fail(&e);
        }
    }
}
