//! Command-line configuration.

use anyhow::Result;
use clap::Parser;
use corelib::ring::DEFAULT_VNODES;
use corelib::Error;
use replication::DEFAULT_REPLICATION_FACTOR;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::commands::{Command, Workload};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "ringctl",
    version,
    about = "Compare key remapping under modulo sharding and consistent hashing"
)]
pub struct CliConfig {
    /// Initial servers, comma separated.
    #[arg(
        long,
        global = true,
        value_delimiter = ',',
        default_value = "server1,server2,server3,server4,server5,server6,server7"
    )]
    pub servers: Vec<String>,

    /// Server added when measuring addition impact.
    #[arg(long, global = true, default_value = "server41")]
    pub new_server: String,

    /// Server removed when measuring removal impact.
    #[arg(long, global = true, default_value = "server3")]
    pub remove_server: String,

    /// Number of sample keys.
    #[arg(long, global = true, default_value_t = 5000)]
    pub keys: usize,

    /// Sample keys are `{prefix}1..={prefix}N`.
    #[arg(long, global = true, default_value = "key")]
    pub key_prefix: String,

    /// Virtual nodes per server.
    #[arg(long, global = true, default_value_t = DEFAULT_VNODES)]
    pub vnodes: usize,

    /// Replication factor.
    #[arg(long, global = true, default_value_t = DEFAULT_REPLICATION_FACTOR)]
    pub replicas: usize,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl CliConfig {
    pub fn run(self) -> Result<()> {
        init_tracing(&self.log_level);

        let workload = self.workload()?;
        let command = self.command.clone().unwrap_or_default();
        debug!(?command, servers = workload.servers.len(), keys = workload.keys.len(), "running");

        let result = command.execute(&workload)?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print!("{result}");
        }
        Ok(())
    }

    /// Validated inputs for a command.
    pub fn workload(&self) -> Result<Workload> {
        let servers: Vec<String> = self
            .servers
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if servers.is_empty() {
            return Err(Error::InvalidConfig("at least one server is required".into()).into());
        }

        let keys = (1..=self.keys).map(|i| format!("{}{i}", self.key_prefix)).collect();

        Ok(Workload {
            servers,
            keys,
            vnodes: self.vnodes,
            replicas: self.replicas,
            new_server: self.new_server.clone(),
            remove_server: self.remove_server.clone(),
        })
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
