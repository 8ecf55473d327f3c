//! RAM-only stores with per-entry TTLs.
//!
//! Nothing in this crate touches disk. Raw text, token mappings, verdicts
//! and approval hashes all live in process memory and expire; a restart
//! wipes everything, which is the intended privacy posture.

pub mod approvals;
pub mod events;
pub mod mappings;
pub mod verdicts;

pub use approvals::{token_hash, ApprovalService};
pub use events::{EventStore, StoredEvent};
pub use mappings::MappingStore;
pub use verdicts::{VerdictStatus, VerdictStore};
