use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

pub const VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(
    name = "golembase-etl",
    version = VERSION_STRING,
    about = "Replays the GolemBase entity-store WAL into a SQLite mirror"
)]
pub struct Options {
    #[arg(
        long = "wal",
        value_name = "WAL_DIR",
        env = "WAL_DIR",
        help = "Directory the chain writes its per-block WAL files to"
    )]
    pub wal_dir: PathBuf,
    #[arg(
        long = "rpc-endpoint",
        value_name = "URL",
        env = "RPC_ENDPOINT",
        help = "JSON-RPC endpoint of the chain, used for the network id and the genesis hash"
    )]
    pub rpc_endpoint: String,
    #[arg(
        long = "db",
        value_name = "FILE",
        env = "DB_FILE",
        help = "SQLite database file the mirror is kept in"
    )]
    pub db_file: String,
    #[arg(
        long = "log.level",
        default_value_t = Level::INFO,
        value_name = "LOG_LEVEL",
        help = "The verbosity level used for logs.",
        long_help = "Possible values: info, debug, trace, warn, error"
    )]
    pub log_level: Level,
}
