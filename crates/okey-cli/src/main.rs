//! Okey terminal table.
//!
//! Plays one human seat from stdin against three opponents, or simulates
//! whole deals when `OKEY_MODE=auto`.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod command;
mod config;
mod render;
mod session;

use config::{CliConfig, Mode};
use session::Session;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CliConfig::from_env()?;
    info!(
        mode = ?config.mode,
        seed = ?config.table.seed,
        difficulty = ?config.table.difficulty,
        "Starting Okey table"
    );

    let mut session = Session::new(config.table.clone());

    match config.mode {
        Mode::Interactive => {
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            session.run_interactive(stdin.lock(), &mut stdout)?;
            info!(scores = ?session.table().state().scores, "Left the table");
        }
        Mode::Auto => {
            let summary = session.run_auto(config.deals)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
