//! Command line / environment configuration.

use std::net::IpAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::constants::{DEFAULT_BIND_ADDRESS, DEFAULT_PORT};

/// Server configuration, parsed once at startup and passed down
/// explicitly.
#[derive(Parser, Debug, Clone)]
#[command(name = "maiden", version, about = "Web editor and dust file API for norns")]
pub struct Config {
    #[arg(
        short = 'p',
        long,
        env = "MAIDEN_PORT",
        default_value_t = DEFAULT_PORT,
        help = "HTTP port"
    )]
    pub port: u16,

    #[arg(
        short = 'b',
        long,
        env = "MAIDEN_BIND",
        default_value = DEFAULT_BIND_ADDRESS,
        help = "Bind address"
    )]
    pub bind: IpAddr,

    #[arg(
        long = "data",
        env = "MAIDEN_DATA_DIR",
        default_value = "data/",
        help = "Path to user data directory"
    )]
    pub data_dir: PathBuf,

    #[arg(
        long = "app",
        env = "MAIDEN_APP_DIR",
        default_value = "app/",
        help = "Path to maiden app directory"
    )]
    pub app_dir: PathBuf,

    #[arg(
        long = "doc",
        env = "MAIDEN_DOC_DIR",
        default_value = "doc/",
        help = "Path to matron lua docs"
    )]
    pub doc_dir: PathBuf,

    #[arg(long, env = "MAIDEN_DEBUG", help = "Enable debug logging")]
    pub debug: bool,
}

impl Config {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_filter(&self) -> String {
        let level = if self.debug { "debug" } else { "info" };
        format!("{level},tower_http={level}")
    }
}
