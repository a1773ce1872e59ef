//! CLI argument definitions

use clap::{Parser, Subcommand};
use shaper_core::ExecutionMode;
use shaper_netns::{DEFAULT_NETNS_ROOT, NetnsConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "shaper")]
#[command(about = "Resolve the host-side veth interfaces of Docker containers", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory for named network namespace links
    #[arg(long, global = true, default_value = DEFAULT_NETNS_ROOT)]
    pub netns_root: PathBuf,

    /// `ip` binary used to list veth interfaces
    #[arg(long, global = true, default_value = "ip")]
    pub ip_command: String,

    /// How shaping commands will be used: execute, stdout or script
    #[arg(long, global = true, default_value = "execute")]
    pub mode: ExecutionMode,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Namespace configuration derived from the global flags
    pub fn netns_config(&self) -> NetnsConfig {
        NetnsConfig::new()
            .with_netns_root(self.netns_root.clone())
            .with_ip_command(self.ip_command.clone())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the host veth interfaces of a container
    Veth {
        /// Container name or ID
        container: String,

        /// Print full veth records as JSON
        #[arg(long)]
        json: bool,
    },

    /// List running containers
    Containers,

    /// Check that a container exists
    Verify {
        /// Container name or ID
        container: String,
    },

    /// Parse an `ip link show type veth` listing
    Parse {
        /// Scope to tag records with (hostname or container name)
        scope: String,

        /// Listing file (default: stdin)
        file: Option<PathBuf>,
    },
}
