use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for careclock
/// Geofenced attendance tracking for care staff, backed by SQLite
#[derive(Parser)]
#[command(
    name = "careclock",
    version = env!("CARGO_PKG_VERSION"),
    about = "Geofenced attendance: clock care staff in and out inside a work perimeter using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Print debug diagnostics on stderr
    #[arg(global = true, long, short = 'v')]
    pub verbose: bool,

    /// Identity of the caller: worker id from the identity provider
    #[arg(global = true, long = "worker", value_name = "ID")]
    pub worker: Option<String>,

    /// Caller role: manager (m) or care-worker (c)
    #[arg(global = true, long = "role", value_name = "ROLE", default_value = "care-worker")]
    pub role: String,

    /// Caller display name
    #[arg(global = true, long = "name", value_name = "NAME")]
    pub name: Option<String>,

    /// Caller email
    #[arg(global = true, long = "email", value_name = "EMAIL")]
    pub email: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Configure or inspect the work perimeter
    Perimeter {
        #[command(subcommand)]
        action: PerimeterAction,
    },

    /// Clock in or out at a location
    Clock {
        #[command(subcommand)]
        action: ClockAction,
    },

    /// Show whether the caller is currently clocked in
    Status,

    /// List shift records, newest first
    List {
        /// Worker id (managers only; defaults to the caller)
        #[arg(long = "for", value_name = "ID")]
        for_worker: Option<String>,

        /// Lower bound on clock-in time (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        from: Option<String>,

        /// Upper bound on clock-in time, inclusive day (YYYY-MM-DD or RFC 3339)
        #[arg(long)]
        to: Option<String>,
    },

    /// Supervisor dashboard statistics
    Stats {
        /// Print as JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Latest shift of every care worker
    Overview,

    /// Workers currently clocked in
    Active,

    /// Read `lat,lng` samples from stdin and report perimeter crossings
    Watch,

    /// Export shift records
    Export {
        /// Export format
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file path
        #[arg(long, value_name = "FILE")]
        file: String,

        /// Only this worker's records
        #[arg(long = "for", value_name = "ID")]
        for_worker: Option<String>,

        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: Option<String>,

        /// Overwrite output file without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Create a backup copy of the database
    Backup {
        /// Destination file path
        #[arg(long, value_name = "FILE")]
        file: String,

        /// Compress the backup (zip)
        #[arg(long)]
        compress: bool,

        /// Overwrite without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Delete every shift record (managers only)
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,

        /// Also delete worker profiles
        #[arg(long)]
        workers: bool,
    },
}

#[derive(Subcommand)]
pub enum PerimeterAction {
    /// Replace the work perimeter (managers only)
    Set {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lng: f64,

        /// Radius in kilometers
        #[arg(long = "radius-km", allow_negative_numbers = true)]
        radius_km: f64,
    },

    /// Show the current perimeter
    Show,

    /// Check whether a point is inside the perimeter
    Check {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
    },
}

#[derive(Subcommand)]
pub enum ClockAction {
    /// Start a shift
    In {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lng: f64,

        #[arg(long)]
        note: Option<String>,
    },

    /// End the open shift
    Out {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lng: f64,

        #[arg(long)]
        note: Option<String>,
    },
}
