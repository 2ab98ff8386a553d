mod session;

pub use session::*;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;
use std::sync::Once;

use crate::application::LedgerService;

static INIT_TRACING: Once = Once::new();

/// FinanZero - income and expense ledger
#[derive(Parser, Debug)]
#[command(name = "finanzero")]
#[command(about = "Record income and expenses and keep an eye on the balance")]
#[command(version)]
pub struct Cli {
    /// Read session commands from a file instead of stdin
    #[arg(long, env = "FINANZERO_SCRIPT")]
    pub script: Option<PathBuf>,

    /// Start with the sample entries
    #[arg(long, env = "FINANZERO_SEED")]
    pub seed: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let service = LedgerService::in_memory();
        if self.seed {
            service.seed_sample_entries()?;
        }

        let stdout = io::stdout().lock();
        match &self.script {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open script {}", path.display()))?;
                Session::new(&service, stdout).run(BufReader::new(file))
            }
            None => {
                let stdin = io::stdin();
                let interactive = stdin.is_terminal();
                Session::new(&service, stdout)
                    .with_prompt(interactive)
                    .run(stdin.lock())
            }
        }
    }
}

/// Set up the global `tracing` subscriber, logging to stderr.
/// `RUST_LOG` takes precedence over the verbosity flag.
pub fn init_tracing(verbose: bool) {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let default_level = if verbose {
            "finanzero=debug"
        } else {
            "finanzero=info"
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    });
}
