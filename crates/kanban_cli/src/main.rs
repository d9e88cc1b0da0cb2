//! `kanban` command-line front end.
//!
//! Each invocation opens the board database, runs one subcommand and
//! flushes the pending snapshot before exiting.

use anyhow::{Context, Result};
use clap::Parser;
use kanban_core::db::open_db;
use kanban_core::logging::normalize_level;
use kanban_core::{
    init_logging, BoardService, BoardSession, KanbanConfig, SqliteBoardRepository,
};
use log::info;
use std::path::{Path, PathBuf};
use std::time::Instant;

mod commands;

#[derive(Parser)]
#[command(name = "kanban")]
#[command(version, about = "Single-board Kanban task tracker")]
struct Cli {
    /// Board database file (overrides KANBAN_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Directory for rotating log files (overrides KANBAN_LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error (overrides KANBAN_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: commands::Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    if let Some(log_dir) = &config.log_dir {
        let log_dir = absolute(log_dir)?;
        init_logging(config.log_level, &log_dir)
            .with_context(|| format!("failed to initialize logging in {}", log_dir.display()))?;
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let repo = SqliteBoardRepository::try_new(&conn)?;
    let mut session = BoardSession::open(
        BoardService::new(repo),
        config.save_debounce,
        Instant::now(),
    )?;

    let mut stdout = std::io::stdout().lock();
    commands::run(&mut session, cli.command, &mut stdout)?;

    if session.flush(Instant::now())? {
        info!("event=cli_exit module=cli status=ok saved=true");
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<KanbanConfig> {
    let mut config = KanbanConfig::from_env()?;
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = Some(log_dir.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = normalize_level(level).context("invalid --log-level")?;
    }
    Ok(config)
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::{resolve_config, Cli};
    use clap::Parser;
    use kanban_core::LoggingError;
    use std::path::PathBuf;

    #[test]
    fn flags_override_environment() {
        let cli = Cli::try_parse_from([
            "kanban",
            "--db",
            "/tmp/flag.db",
            "--log-level",
            "WARN",
            "show",
        ])
        .unwrap();
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/flag.db"));
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn invalid_log_level_keeps_error_source() {
        let cli = Cli::try_parse_from(["kanban", "--log-level", "loud", "show"]).unwrap();
        let err = resolve_config(&cli).unwrap_err();

        assert!(err.to_string().contains("--log-level"));
        assert!(matches!(
            err.downcast_ref::<LoggingError>(),
            Some(LoggingError::UnsupportedLevel(level)) if level == "loud"
        ));
    }
}
