//! Command dispatch and handlers.

pub mod apply;
pub mod delete;
pub mod validate;

use std::env;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::cassette::config::CassetteConfig;
use crate::cassette::session::RecordingSession;
use crate::cli::{Cli, Command};
use crate::config::OncallConfig;
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// `ONCALL_REPLAY=<file|dir>` serves every port call from cassettes instead
/// of AWS. `ONCALL_RECORD=<dir>` records every port call to per-port
/// cassettes in that directory; an empty value picks a timestamped
/// directory under `.oncall/cassettes/`.
///
/// # Errors
///
/// Returns an error string if the config is unusable, the run cannot
/// start, or any item failed.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let config = load_config(&cli.config)?;
    if matches!(cli.command, Command::Validate) {
        validate::run(&config);
        return Ok(());
    }

    let ctx = build_context(&config)?;
    let (ctx, session) = match env::var_os("ONCALL_RECORD") {
        Some(dir) => {
            let session = if dir.is_empty() {
                RecordingSession::new()?
            } else {
                RecordingSession::at(&PathBuf::from(dir))?
            };
            info!("Recording port calls to {}", session.output_dir().display());
            (ServiceContext::recording(ctx, &session), Some(session))
        }
        None => (ctx, None),
    };

    let result = dispatch_with_context(&cli.command, &ctx, &config);

    // Finish recording even when the command failed.
    if let Some(session) = session {
        // The adapters hold recorder references until the context is gone.
        drop(ctx);
        let dir = session.finish()?;
        info!("Recording saved to: {}", dir.display());
    }

    result
}

/// Dispatch a command with the given service context.
fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    config: &OncallConfig,
) -> Result<(), String> {
    match command {
        Command::Apply { dry_run } => apply::run(ctx, config, *dry_run),
        Command::Delete { dry_run, yes, aliases } => {
            delete::run(ctx, config, &delete::DeleteArgs { dry_run: *dry_run, yes: *yes, aliases })
        }
        Command::Validate => {
            validate::run(config);
            Ok(())
        }
    }
}

/// Loads and validates the desired-state file.
fn load_config(path: &Path) -> Result<OncallConfig, String> {
    let config = OncallConfig::load(path).map_err(|e| e.to_string())?;
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Replays from `ONCALL_REPLAY` when set, otherwise talks to AWS.
fn build_context(config: &OncallConfig) -> Result<ServiceContext, String> {
    match env::var_os("ONCALL_REPLAY") {
        Some(path) => {
            let path = PathBuf::from(path);
            info!("Replaying port calls from {}", path.display());
            if path.is_dir() {
                let cassettes = CassetteConfig::from_dir(&path);
                let missing = cassettes.missing_ports();
                if !missing.is_empty() {
                    return Err(format!(
                        "No {} cassette(s) in {}",
                        missing.join(", "),
                        path.display()
                    ));
                }
                ServiceContext::replaying_from(&cassettes)
            } else {
                ServiceContext::replaying(&path)
            }
        }
        None => ServiceContext::live(&config.region()),
    }
}
