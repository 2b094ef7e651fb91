//! Command-line and environment configuration.

use std::{net::SocketAddr, path::PathBuf};

use clap::{ArgAction, ValueEnum};
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// A MongoDB server reached through `--mongo-uri`.
    Mongodb,
    /// A process-local store that is lost on exit.
    Memory,
}

#[derive(Debug, Clone, clap::Parser)]
#[command(version, about)]
pub struct Config {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Address to listen on
    #[arg(long, env = "ACADEMIA_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "ACADEMIA_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Storage backend
    #[arg(long, env = "ACADEMIA_BACKEND", value_enum, default_value_t = BackendKind::Mongodb)]
    pub backend: BackendKind,

    /// MongoDB connection string
    #[arg(long, env = "ACADEMIA_MONGO_URI", default_value = "mongodb://localhost:27017")]
    pub mongo_uri: String,

    /// MongoDB database name
    #[arg(long, env = "ACADEMIA_DATABASE", default_value = "academia")]
    pub database: String,

    /// JSON file with initial students and courses
    #[arg(long, env = "ACADEMIA_SEED_FILE", default_value = "data.json")]
    pub seed_file: PathBuf,

    /// Skip loading the seed file
    #[arg(long)]
    pub no_seed: bool,
}

impl Config {
    /// The address to bind, or an error naming the bad host.
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("invalid listen address {addr}: {e}"))
    }

    /// The seed file to load, unless seeding is turned off.
    pub fn seed_path(&self) -> Option<&PathBuf> {
        (!self.no_seed).then_some(&self.seed_file)
    }

    /// The log filter from `RUST_LOG`, raised by `-v` when given.
    pub fn log_filter(&self) -> EnvFilter {
        log_filter(self.verbose, std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
    }
}

fn log_filter(verbosity: u8, directives: Option<&str>) -> EnvFilter {
    let level = match verbosity {
        0 => None,
        1 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    };
    let from_env = directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok());

    match (from_env, level) {
        (Some(filter), None) => filter,
        (Some(filter), Some(level)) => filter.add_directive(level.into()),
        (None, level) => EnvFilter::default().add_directive(level.unwrap_or(Level::INFO).into()),
    }
}
