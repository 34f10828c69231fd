//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "weblogd")]
#[command(version, about = "Per-user, scope-restricted log browser")]
pub struct Cli {
    /// Config file (weblog.toml/yaml/json); searched for when omitted
    #[arg(short, long, env = "WEBLOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on, overrides the config
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Installation root, overrides the config
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Default log filter for the chosen verbosity
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "weblogd=info,weblog_web=info,weblog_access=info,weblog_db=info",
            1 => "weblogd=debug,weblog_web=debug,weblog_access=debug,weblog_db=debug",
            _ => "weblogd=trace,weblog_web=trace,weblog_access=trace,weblog_db=trace,tower_http=debug",
        }
    }
}
