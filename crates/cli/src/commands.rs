//! Subcommands and their results.

use std::collections::BTreeMap;
use std::fmt;

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use corelib::impact::{measure_addition_impact, measure_removal_impact, KeyMove};
use corelib::topology::ownership;
use corelib::{AssignmentSnapshot, BasicRing, RingBuilder, RingLookup, ServerId, Topology, VirtualNodeRing};
use replication::ReplicatedRing;
use serde::Serialize;
use sharding::ModuloSharder;
use tracing::info;

/// Inputs shared by every command.
#[derive(Debug, Clone)]
pub struct Workload {
    pub servers: Vec<String>,
    pub keys: Vec<String>,
    pub vnodes: usize,
    pub replicas: usize,
    pub new_server: String,
    pub remove_server: String,
}

impl Workload {
    fn sharder(&self) -> ModuloSharder {
        let mut sharder = ModuloSharder::new();
        for id in &self.servers {
            sharder.add_server(id);
        }
        sharder
    }

    fn basic_ring(&self) -> BasicRing {
        let mut ring = BasicRing::new();
        for id in &self.servers {
            ring.add_server(id);
        }
        ring
    }

    fn vnode_ring(&self) -> VirtualNodeRing {
        RingBuilder::new()
            .with_vnodes(self.vnodes)
            .add_servers(self.servers.iter().map(String::as_str))
            .build()
    }
}

/// Key assignment scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scheme {
    /// `hash mod N` over the sorted server list.
    Modulo,
    /// One ring position per server.
    Basic,
    /// `--vnodes` ring positions per server.
    Vnodes,
}

impl Scheme {
    fn ring(self, workload: &Workload) -> Box<dyn RingLookup> {
        match self {
            Scheme::Modulo => Box::new(workload.sharder()),
            Scheme::Basic => Box::new(workload.basic_ring()),
            Scheme::Vnodes => Box::new(workload.vnode_ring()),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scheme::Modulo => "modulo",
            Scheme::Basic => "basic",
            Scheme::Vnodes => "vnodes",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, Subcommand)]
pub enum Command {
    /// Remapping impact of adding and removing one server, for every scheme.
    #[default]
    Compare,
    /// Keys per server and share of the position space.
    Distribution {
        #[arg(long, value_enum, default_value_t = Scheme::Vnodes)]
        scheme: Scheme,
    },
    /// Replica placement for the given keys.
    Replicas {
        /// Keys to place; defaults to the first five generated keys.
        #[arg(value_name = "KEY")]
        key: Vec<String>,
    },
    /// Apply `--new-server` then `--remove-server` and list keys that moved.
    Impact {
        #[arg(long, value_enum, default_value_t = Scheme::Vnodes)]
        scheme: Scheme,

        /// Maximum number of moved keys to list.
        #[arg(long, default_value_t = 10)]
        show: usize,
    },
}

impl Command {
    pub fn execute(&self, workload: &Workload) -> Result<CommandResult> {
        match self {
            Command::Compare => Ok(compare(workload)),
            Command::Distribution { scheme } => Ok(distribution(workload, *scheme)),
            Command::Replicas { key } => replicas(workload, key),
            Command::Impact { scheme, show } => Ok(impact(workload, *scheme, *show)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemeImpact {
    pub scheme: Scheme,
    pub addition: f64,
    pub removal: f64,
    /// Closed-form estimate, modulo only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_addition: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_removal: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Placement {
    pub key: String,
    pub servers: Vec<ServerId>,
    pub full: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum CommandResult {
    Compare {
        keys: usize,
        new_server: String,
        remove_server: String,
        results: Vec<SchemeImpact>,
    },
    Distribution {
        scheme: Scheme,
        topology: Topology,
        std_dev_percent: f64,
        #[serde(skip_serializing_if = "Option::is_none")]
        ownership: Option<BTreeMap<ServerId, f64>>,
    },
    Replicas {
        replication_factor: usize,
        placements: Vec<Placement>,
    },
    Impact {
        scheme: Scheme,
        addition: f64,
        removal: f64,
        moved: usize,
        sample: Vec<KeyMove>,
    },
}

/// Each measurement starts from the initial membership.
fn compare(workload: &Workload) -> CommandResult {
    let keys = &workload.keys;
    let (add, remove) = (&workload.new_server, &workload.remove_server);

    let sharder = workload.sharder();
    let metrics = sharder.metrics();
    let mut results = vec![SchemeImpact {
        scheme: Scheme::Modulo,
        addition: metrics.measure_addition_impact(keys, add),
        removal: metrics.measure_removal_impact(keys, remove),
        expected_addition: Some(metrics.membership_impact_of_addition(add)),
        expected_removal: Some(metrics.membership_impact_of_removal(remove)),
    }];

    for scheme in [Scheme::Basic, Scheme::Vnodes] {
        let addition = measure_addition_impact(&mut *scheme.ring(workload), keys, add);
        let removal = measure_removal_impact(&mut *scheme.ring(workload), keys, remove);
        results.push(SchemeImpact {
            scheme,
            addition,
            removal,
            expected_addition: None,
            expected_removal: None,
        });
    }

    info!(keys = keys.len(), schemes = results.len(), "compared schemes");
    CommandResult::Compare {
        keys: keys.len(),
        new_server: add.clone(),
        remove_server: remove.clone(),
        results,
    }
}

fn distribution(workload: &Workload, scheme: Scheme) -> CommandResult {
    let (topology, ownership) = match scheme {
        Scheme::Modulo => (workload.sharder().metrics().distribution(&workload.keys), None),
        Scheme::Basic => {
            let ring = workload.basic_ring();
            (Topology::from_keys(&ring, &workload.keys), Some(ownership(&ring)))
        }
        Scheme::Vnodes => {
            let ring = workload.vnode_ring();
            (Topology::from_keys(&ring, &workload.keys), Some(ownership(&ring)))
        }
    };
    CommandResult::Distribution {
        scheme,
        std_dev_percent: topology.std_dev_percent(),
        topology,
        ownership,
    }
}

fn replicas(workload: &Workload, keys: &[String]) -> Result<CommandResult> {
    let mut ring = ReplicatedRing::new(workload.vnodes, workload.replicas)?;
    for id in &workload.servers {
        ring.add_server(id);
    }

    let keys = if keys.is_empty() {
        &workload.keys[..workload.keys.len().min(5)]
    } else {
        keys
    };
    let placements = keys
        .iter()
        .map(|key| Placement {
            key: key.clone(),
            servers: ring.all_servers_for_key(key).into_vec(),
            full: ring.has_full_replication(key),
        })
        .collect();

    Ok(CommandResult::Replicas {
        replication_factor: ring.replication_factor(),
        placements,
    })
}

fn impact(workload: &Workload, scheme: Scheme, show: usize) -> CommandResult {
    let keys = &workload.keys;
    let mut ring = scheme.ring(workload);
    let before = AssignmentSnapshot::capture(&*ring, keys);

    let addition = measure_addition_impact(&mut *ring, keys, &workload.new_server);
    let removal = measure_removal_impact(&mut *ring, keys, &workload.remove_server);

    let after = AssignmentSnapshot::capture(&*ring, keys);
    let mut moves = before.moves(&after);
    let moved = moves.len();
    moves.truncate(show);

    CommandResult::Impact {
        scheme,
        addition,
        removal,
        moved,
        sample: moves,
    }
}

fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

fn server_or_dash(server: &Option<ServerId>) -> &str {
    server.as_ref().map_or("-", ServerId::as_str)
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Compare {
                keys,
                new_server,
                remove_server,
                results,
            } => {
                writeln!(f, "=== Remapping impact when adding/removing a node ===")?;
                writeln!(f, "keys: {keys}  add: {new_server}  remove: {remove_server}")?;
                for r in results {
                    write!(
                        f,
                        "{:<8} add={:>6} remove={:>6}",
                        r.scheme,
                        percent(r.addition),
                        percent(r.removal)
                    )?;
                    if let (Some(add), Some(remove)) = (r.expected_addition, r.expected_removal) {
                        write!(f, "  (expected add={} remove={})", percent(add), percent(remove))?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            }
            CommandResult::Distribution {
                scheme,
                topology,
                std_dev_percent,
                ownership,
            } => {
                writeln!(f, "scheme: {scheme}  keys: {}", topology.total())?;
                for (server, pct) in topology.percentages() {
                    write!(f, "  {server:<12} {:>6} keys {pct:>5.1}%", topology.count(server.as_str()))?;
                    if let Some(share) = ownership.as_ref().and_then(|o| o.get(&server)) {
                        write!(f, "  owns {}", percent(*share))?;
                    }
                    writeln!(f)?;
                }
                if topology.unassigned() > 0 {
                    writeln!(f, "  unassigned   {:>6}", topology.unassigned())?;
                }
                writeln!(f, "std dev: {std_dev_percent:.2}%")
            }
            CommandResult::Replicas {
                replication_factor,
                placements,
            } => {
                writeln!(f, "replication factor: {replication_factor}")?;
                for p in placements {
                    let servers: Vec<&str> = p.servers.iter().map(ServerId::as_str).collect();
                    let note = if p.full { "" } else { "  (partial)" };
                    writeln!(f, "  {:<12} -> [{}]{note}", p.key, servers.join(", "))?;
                }
                Ok(())
            }
            CommandResult::Impact {
                scheme,
                addition,
                removal,
                moved,
                sample,
            } => {
                writeln!(
                    f,
                    "scheme: {scheme}  add={}  remove={}  net moved: {moved}",
                    percent(*addition),
                    percent(*removal)
                )?;
                for m in sample {
                    writeln!(
                        f,
                        "  {:<12} {} -> {}",
                        m.key,
                        server_or_dash(&m.from),
                        server_or_dash(&m.to)
                    )?;
                }
                Ok(())
            }
        }
    }
}
