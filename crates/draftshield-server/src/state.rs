//! Shared application state.

use std::sync::Arc;
use std::time::Duration;

use draftshield_core::ShieldConfig;
use draftshield_draft::DraftBoundary;
use draftshield_model::ModelClient;
use draftshield_pipeline::PrivacyPipeline;
use draftshield_store::{ApprovalService, EventStore, MappingStore, VerdictStore};

/// The production pipeline uses the model client for both detection and
/// audit; tests swap in stub backends at the pipeline crate level.
pub type ShieldPipeline = PrivacyPipeline<ModelClient, ModelClient>;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: ShieldConfig,
    pub pipeline: ShieldPipeline,
    pub boundary: DraftBoundary,
    pub events: Arc<EventStore>,
    pub mappings: Arc<MappingStore>,
    pub verdicts: Arc<VerdictStore>,
    pub approvals: Arc<ApprovalService>,
}

impl AppState {
    pub fn new(config: ShieldConfig) -> draftshield_core::Result<Self> {
        let client = ModelClient::new(&config)?;

        let events = Arc::new(EventStore::new(Duration::from_secs(config.event_ttl_secs)));
        let mappings = Arc::new(MappingStore::new(Duration::from_secs(
            config.mapping_ttl_secs,
        )));
        let verdicts = Arc::new(VerdictStore::new(Duration::from_secs(
            config.verdict_ttl_secs,
        )));
        let approvals = Arc::new(ApprovalService::new(Duration::from_secs(
            config.approval_ttl_secs,
        )));

        let pipeline = PrivacyPipeline::new(
            config.clone(),
            client.clone(),
            client,
            events.clone(),
            mappings.clone(),
            verdicts.clone(),
            approvals.clone(),
        );
        let boundary = DraftBoundary::new(verdicts.clone(), approvals.clone());

        Ok(Self {
            config,
            pipeline,
            boundary,
            events,
            mappings,
            verdicts,
            approvals,
        })
    }
}
