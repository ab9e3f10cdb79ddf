//! Modulo sharding, the unstable baseline consistent hashing is measured
//! against.
//!
//! - `ModuloSharder`: key → `sorted_servers[|md5(key)| mod N]`
//! - `analytical`: closed-form remapping cost from server counts (gcd
//!   identity) or from the exact before/after memberships
//! - `ModuloMetrics`: read-only impact measurement against a sharder

pub mod analytical;
pub mod metrics;
pub mod modulo;

pub use analytical::{impact_between_counts, impact_between_memberships};
pub use metrics::ModuloMetrics;
pub use modulo::ModuloSharder;
