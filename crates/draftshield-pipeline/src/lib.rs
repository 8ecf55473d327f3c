//! Pipeline orchestration: L0 mask, L1 anonymize, L2 verify, L3 audit,
//! then the gate. Produces a per-run receipt and a gate verdict.

pub mod auditor;
pub mod pipeline;
pub mod receipt;

pub use auditor::{AuditOutcome, SemanticAuditor};
pub use pipeline::{PrivacyPipeline, PrivacyVerdict};
pub use receipt::{Receipt, ReceiptBuilder, ReceiptStep, StepStatus};
