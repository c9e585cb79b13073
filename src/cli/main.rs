mod session;

use clap::Parser;
use session::Session;
use std::{env, io};
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "TTT_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

/// Play tic-tac-toe in the terminal, with time travel through the move list.
#[derive(Debug, Parser)]
#[command(name = "ttt_cli", version)]
struct Cli {
    /// Directives to run before reading stdin, separated by ';' (e.g. "0;3;1").
    #[arg(short, long)]
    script: Option<String>,

    /// Exit after the script instead of starting the interactive loop.
    #[arg(long)]
    batch: bool,

    /// Print X and O without terminal colors.
    #[arg(long)]
    no_color: bool,
}

/// Filter from the `TTT_LOG` value, or the default plus a warning when the
/// value does not parse.
fn log_filter(directives: Option<&str>) -> (EnvFilter, Option<String>) {
    let Some(directives) = directives else {
        return (EnvFilter::new(DEFAULT_LOG_FILTER), None);
    };

    match EnvFilter::try_new(directives) {
        Ok(filter) => (filter, None),
        Err(err) => (
            EnvFilter::new(DEFAULT_LOG_FILTER),
            Some(format!(
                "ignoring {LOG_ENV_VAR}='{directives}' ({err}), using '{DEFAULT_LOG_FILTER}'"
            )),
        ),
    }
}

fn main() -> anyhow::Result<()> {
    let directives = env::var(LOG_ENV_VAR).ok();
    let (filter, warning) = log_filter(directives.as_deref());
    if let Some(warning) = warning {
        eprintln!("{warning}");
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut session = Session::new(io::stdout(), !cli.no_color);

    session.start()?;
    if let Some(script) = cli.script.as_deref() {
        session.run_line(script)?;
    }
    if !cli.batch {
        session.interpretation_loop(io::stdin().lock())?;
    }

    Ok(())
}
