//! User albums grouped by the picgroup clustering engine.
//!
//! The album sits between the engine and its collaborators: an
//! [`AlbumStore`] holding item records and cluster membership, and an
//! optional [`ClusterNamer`] producing human-readable cluster names. It
//! serializes decisions per user so every incremental assignment sees all
//! earlier ones.

mod album;
mod config;
mod error;
mod namer;
mod record;
mod store;

pub use album::{Album, ClusterGroup, ClusterReport, ClusterRequest};
pub use config::AlbumConfig;
pub use error::AlbumError;
pub use namer::{ClusterNamer, DEFAULT_NAMING_SAMPLES, FALLBACK_NAME, KeywordNamer, name_or_fallback};
pub use record::{ItemRecord, assignment_of};
pub use store::{AlbumStore, MemoryStore};
