use tracing::{debug, error, instrument};

use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::domain::{SecurityEvent, SecurityEventCreate};

/// Client for the security event log.
#[derive(Clone)]
pub struct AuditClient {
    inner: ResourceClient<SecurityEvent>,
}

crate::impl_client_new!(AuditClient, SecurityEvent);

impl AuditClient {
    /// Record a privileged action. Failures are logged, never returned: the
    /// audited operation has already happened.
    #[instrument(skip(self, event), fields(action = %event.action, entity_id = %event.entity_id))]
    pub async fn log_security_event(&self, event: SecurityEventCreate) {
        debug!("Sending request");
        if let Err(e) = self.inner.create(event).await {
            error!(error = %e, "Failed to record security event");
        }
    }

    /// Newest first, at most `limit`.
    #[instrument(skip(self))]
    pub async fn recent(&self, limit: usize) -> Result<Vec<SecurityEvent>, FrameworkError> {
        debug!("Sending request");
        let events = self.inner.list().await?;
        Ok(events.into_iter().rev().take(limit).collect())
    }
}
