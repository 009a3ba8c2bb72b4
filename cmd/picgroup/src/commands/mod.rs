//! CLI commands module.

mod assign;
mod autok;
mod cluster;
mod profile;
mod util;

pub use assign::AssignCommand;
pub use autok::AutoKCommand;
pub use cluster::ClusterCommand;
pub use profile::ProfileCommand;

pub(crate) use util::*;
