//! Health service
//!
//! Liveness and readiness of the backing stores.

use futures::future::join_all;
use tracing::{instrument, warn};

use crate::dto::{HealthResponse, ReadinessResponse};

use super::context::ServiceContext;

/// Health service
pub struct HealthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> HealthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub fn liveness(&self) -> HealthResponse {
        HealthResponse::healthy()
    }

    /// Run every probe concurrently
    #[instrument(skip(self))]
    pub async fn readiness(&self) -> ReadinessResponse {
        let probes = self.ctx.probes();
        let results = join_all(probes.iter().map(|probe| probe.check())).await;

        let checks: Vec<(&'static str, bool)> = probes
            .iter()
            .map(|probe| probe.name())
            .zip(results)
            .collect();

        for (name, healthy) in &checks {
            if !healthy {
                warn!(probe = *name, "Readiness probe failed");
            }
        }

        ReadinessResponse::from_checks(checks)
    }
}
