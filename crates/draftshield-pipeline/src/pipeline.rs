//! The run state machine: L0 → L1 → L2 (retry loop) → L3 → gate.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use draftshield_anonymize::{Anonymizer, TokenSequence};
use draftshield_core::{Error, Result, ShieldConfig};
use draftshield_mask::{LeakVerifier, MaskMode, RegexMasker};
use draftshield_model::{AuditBackend, DetectBackend};
use draftshield_store::{
    token_hash, ApprovalService, EventStore, MappingStore, VerdictStatus, VerdictStore,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auditor::SemanticAuditor;
use crate::receipt::{Receipt, ReceiptBuilder, StepStatus};

/// Callers may ask for fewer retries, never more.
const RETRY_CAP: u32 = 3;

/// What the gate decided for one run.
#[derive(Debug, Serialize)]
pub struct PrivacyVerdict {
    pub event_id: Uuid,
    pub clean_text: String,
    pub verification_passed: bool,
    pub semantic_risk: bool,
    pub gated: bool,
    pub approval_required: bool,
    /// Present only for gated non-production runs; shown once, never stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_token: Option<String>,
    pub receipt: Receipt,
}

impl PrivacyVerdict {
    /// The only definition of "safe to draft from".
    pub fn is_anonymized(&self) -> bool {
        self.verification_passed && !self.semantic_risk
    }
}

pub struct PrivacyPipeline<D: DetectBackend, A: AuditBackend> {
    config: ShieldConfig,
    masker: RegexMasker,
    verifier: LeakVerifier,
    anonymizer: Anonymizer<D>,
    auditor: SemanticAuditor<A>,
    events: Arc<EventStore>,
    mappings: Arc<MappingStore>,
    verdicts: Arc<VerdictStore>,
    approvals: Arc<ApprovalService>,
}

impl<D: DetectBackend, A: AuditBackend> PrivacyPipeline<D, A> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: ShieldConfig,
        detect: D,
        audit: A,
        events: Arc<EventStore>,
        mappings: Arc<MappingStore>,
        verdicts: Arc<VerdictStore>,
        approvals: Arc<ApprovalService>,
    ) -> Self {
        Self {
            config,
            masker: RegexMasker::new(),
            verifier: LeakVerifier::new(),
            anonymizer: Anonymizer::new(detect),
            auditor: SemanticAuditor::new(audit),
            events,
            mappings,
            verdicts,
            approvals,
        }
    }

    /// Run the full pipeline for a stored event.
    ///
    /// On a production hard stop the verdict-status record is written before
    /// the error is returned, so the drafting boundary still sees the event
    /// as gated.
    pub async fn run(
        &self,
        event_id: Uuid,
        production_mode: bool,
        max_retries: u32,
    ) -> Result<PrivacyVerdict> {
        let retries = max_retries.min(RETRY_CAP);
        let raw = self
            .events
            .get_raw_text(&event_id)
            .ok_or_else(|| Error::NotFound(event_id.to_string()))?;

        let len = raw.chars().count();
        if len > self.config.max_input_chars {
            return Err(Error::InputTooLarge {
                len,
                max: self.config.max_input_chars,
            });
        }

        let mut receipt = ReceiptBuilder::new(event_id);

        // L0: production runs get the extra substitution pass.
        let mode = if production_mode {
            MaskMode::Strict
        } else {
            MaskMode::Balanced
        };
        let masked = self.masker.mask(&raw, mode);
        let mut l0_metrics: BTreeMap<String, u64> = masked
            .counts
            .iter()
            .map(|(label, hits)| (label.to_string(), *hits as u64))
            .collect();
        l0_metrics.insert("passes".into(), masked.passes as u64);
        receipt.step("l0_mask", StepStatus::Ok, l0_metrics);

        // L1/L2 loop. The token sequence and mapping span all attempts so a
        // retry never reassigns an already-issued token.
        let mut seq = TokenSequence::default();
        let mut mapping: HashMap<String, String> = HashMap::new();
        let mut current = masked.text;
        let mut verification_passed = false;
        let mut attempt: u32 = 0;

        loop {
            match self.anonymizer.anonymize(&current, &mut seq).await {
                Ok(out) => {
                    if out.fallback_used {
                        receipt.flag("detector_fallback");
                    }
                    mapping.extend(out.mapping);
                    current = out.clean_text;
                }
                Err(e) => {
                    if attempt < retries {
                        warn!(event_id = %event_id, attempt, error = %e, "anonymization attempt failed, retrying");
                        receipt.step("l1_anonymize", StepStatus::Retry, BTreeMap::new());
                        attempt += 1;
                        continue;
                    }
                    receipt.step("l1_anonymize", StepStatus::Failed, BTreeMap::new());
                    return Err(Error::RetriesExhausted {
                        attempts: attempt + 1,
                    });
                }
            }
            receipt.step(
                "l1_anonymize",
                StepStatus::Ok,
                BTreeMap::from([("tokens".to_string(), seq.issued() as u64)]),
            );

            let report = self.verifier.verify(&current);
            let l2_metrics =
                BTreeMap::from([("residual_categories".to_string(), report.residual.len() as u64)]);
            if report.passed {
                receipt.step("l2_verify", StepStatus::Ok, l2_metrics);
                verification_passed = true;
                break;
            }
            if attempt < retries {
                warn!(
                    event_id = %event_id,
                    attempt,
                    residual = ?report.residual,
                    "verification failed, re-anonymizing"
                );
                receipt.step("l2_verify", StepStatus::Retry, l2_metrics);
                attempt += 1;
                // loops back into L1 on the anonymized text, never the raw
                continue;
            }
            receipt.step("l2_verify", StepStatus::Failed, l2_metrics);
            break;
        }

        // L3 runs only on verified text. Unverified text is treated as risky
        // without asking the model anything.
        let semantic_risk = if verification_passed {
            let outcome = self.auditor.audit(&current).await;
            if !outcome.reason.is_empty() {
                receipt.flag(&outcome.reason);
            }
            let status = if outcome.degraded {
                StepStatus::Failed
            } else {
                StepStatus::Ok
            };
            receipt.step_with_model(
                "l3_audit",
                status,
                Some(self.config.audit_model.clone()),
                BTreeMap::new(),
            );
            outcome.semantic_risk
        } else {
            receipt.flag("verification_failed");
            receipt.step("l3_audit", StepStatus::Skipped, BTreeMap::new());
            true
        };

        let gated = !verification_passed || semantic_risk;

        if production_mode && gated {
            self.verdicts
                .set(event_id, VerdictStatus::new(verification_passed, semantic_risk));
            self.mappings.put(event_id, mapping);
            receipt.step("gate", StepStatus::Blocked, BTreeMap::new());
            let receipt = receipt.finish(&current);
            info!(
                event_id = %event_id,
                flags = ?receipt.flags,
                "production hard stop, no approval path"
            );
            return Err(Error::ProductionBlocked);
        }

        let mut status = VerdictStatus::new(verification_passed, semantic_risk);
        let approval_token = if gated {
            let token = self.approvals.issue(event_id);
            status = status.with_token_hash(token_hash(&token));
            receipt.step("gate", StepStatus::Blocked, BTreeMap::new());
            Some(token)
        } else {
            receipt.step("gate", StepStatus::Ok, BTreeMap::new());
            None
        };
        let approval_required = status.approval_required;
        self.verdicts.set(event_id, status);
        self.mappings.put(event_id, mapping);
        let receipt = receipt.finish(&current);

        info!(
            event_id = %event_id,
            gated,
            verification_passed,
            semantic_risk,
            "pipeline run complete"
        );

        Ok(PrivacyVerdict {
            event_id,
            clean_text: current,
            verification_passed,
            semantic_risk,
            gated,
            approval_required,
            approval_token,
            receipt,
        })
    }
}
