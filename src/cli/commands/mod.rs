pub mod backup;
pub mod clock;
pub mod config;
pub mod db;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod perimeter;
pub mod reset;
pub mod staff;
pub mod stats;
pub mod watch;

use crate::cli::parser::Cli;
use crate::errors::{AppError, AppResult};
use crate::models::worker::{Identity, Role};

/// Build the caller identity from the global `--worker/--role/--name/--email` flags.
pub(crate) fn identity(cli: &Cli) -> AppResult<Identity> {
    let worker = cli
        .worker
        .as_deref()
        .ok_or_else(|| AppError::Validation("this command needs --worker <ID>".into()))?;

    let role = Role::from_code(&cli.role)
        .ok_or_else(|| AppError::Validation(format!("unknown role '{}'", cli.role)))?;

    Identity::new(
        worker,
        role,
        cli.email.as_deref().unwrap_or(""),
        cli.name.as_deref().unwrap_or(""),
    )
}

/// Like [`identity`], but `None` when no `--worker` was given.
pub(crate) fn optional_identity(cli: &Cli) -> AppResult<Option<Identity>> {
    match cli.worker {
        Some(_) => identity(cli).map(Some),
        None => Ok(None),
    }
}
