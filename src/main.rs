// Registration desk entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, keep stdout for the report)
// 2. Load config
// 3. Open the speaker store
// 4. Load submissions from the intake CSVs
// 5. Evaluate each submission
// 6. Print the accepted/rejected report

use greenroom::config;
use greenroom::db::SqliteStore;
use greenroom::intake;
use greenroom::registration::evaluator::{self, RegisterError};

use anyhow::Context;
use tracing::{info, warn};

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Registration desk starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: db={}, speakers={}, sessions={}",
        config.db_path,
        config.speakers_csv.display(),
        config.sessions_csv.display()
    );

    let store = SqliteStore::open(&config.db_path).context("failed to open speaker store")?;
    info!("Speaker store opened at {}", config.db_path);

    let mut speakers = intake::load_submissions(&config.speakers_csv, &config.sessions_csv)
        .context("failed to load submissions")?;
    info!("Loaded {} submissions", speakers.len());

    let mut accepted = 0usize;
    let mut rejected = 0usize;

    for speaker in &mut speakers {
        match evaluator::register(speaker, &config.policy, &store) {
            Ok(id) => {
                accepted += 1;
                println!(
                    "accepted  {} <{}>  id={}  fee=${}",
                    speaker.full_name(),
                    speaker.email,
                    id,
                    speaker.registration_fee
                );
            }
            Err(RegisterError::SaveFailed(source)) => {
                // Store trouble is fatal: later saves would fail the same way.
                return Err(anyhow::Error::new(source)
                    .context("speaker store failed during registration"));
            }
            Err(err) => {
                rejected += 1;
                warn!("rejected {} <{}>: {}", speaker.full_name(), speaker.email, err);
                println!("rejected  {} <{}>  ({err})", speaker.full_name(), speaker.email);
            }
        }
    }

    println!("{accepted} accepted, {rejected} rejected");
    info!("Registration run complete: {} accepted, {} rejected", accepted, rejected);
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which carries the
/// registration report).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("greenroom.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("greenroom=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
