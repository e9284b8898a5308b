//! Audit logging for Pocket
//!
//! Every create, update and delete made through the services, plus imports
//! and full clears, is appended to `audit.log` as one JSON line.
//!
//! - [`AuditEntry`]: one operation, with before/after snapshots
//! - [`Audited`]: implemented by the four stored records
//! - [`AuditLogger`]: the JSONL writer/reader
//! - [`generate_diff`]: the changed-fields summary for updates

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, Audited, EntityType, Operation};
pub use logger::AuditLogger;
