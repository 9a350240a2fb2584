use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log::audit_quietly;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the SQLite database
///  - all pending DB migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.as_deref(), cli.test)?;

    println!("⚙️  Initializing careclock…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {}", cfg.database);

    let pool = DbPool::open(&cfg.database, cfg.busy_timeout_ms)?;
    init_db(&pool.conn)?;

    println!("✅ Database initialized at {}", cfg.database);

    audit_quietly(
        &pool.conn,
        "init",
        &cfg.database,
        "Database initialized",
    );

    println!("🎉 careclock initialization completed!");
    Ok(())
}
