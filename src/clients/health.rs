use std::{collections::HashMap, sync::Arc, time::Instant};

use chrono::Utc;
use tracing::{debug, warn};

use crate::{
    clients::{database::DatabaseClient, llm::LlmClient},
    models::{
        health::{HealthCheckResponse, HealthStatus, ServiceHealth},
        provider::Provider,
    },
};

pub struct HealthChecker {
    database_client: Arc<DatabaseClient>,
    llm_client: LlmClient,
}

impl HealthChecker {
    pub fn new(database_client: Arc<DatabaseClient>, llm_client: LlmClient) -> Self {
        Self {
            database_client,
            llm_client,
        }
    }

    pub async fn check_all(&self) -> HealthCheckResponse {
        let mut checks = HashMap::new();

        let db_health = self.check_database().await;
        checks.insert("database".to_string(), db_health);

        for provider in [Provider::Google, Provider::OpenAi] {
            checks.insert(provider.to_string(), self.check_provider(provider));
        }

        let overall_status = determine_overall_status(&checks);

        HealthCheckResponse {
            status: overall_status,
            timestamp: Utc::now(),
            checks,
        }
    }

    async fn check_database(&self) -> ServiceHealth {
        let start = Instant::now();

        match self.database_client.health_check().await {
            Ok(_) => {
                let elapsed = start.elapsed().as_millis() as u64;
                debug!(response_time_ms = elapsed, "Database health check passed");
                ServiceHealth::healthy(elapsed)
            }
            Err(e) => {
                warn!(error = %e, "Database health check failed");
                ServiceHealth::unhealthy(format!("Health check query failed: {}", e))
            }
        }
    }

    fn check_provider(&self, provider: Provider) -> ServiceHealth {
        let model = self.llm_client.settings(provider).story_model.clone();

        if self.llm_client.is_configured(provider) {
            ServiceHealth::healthy(0).with_model(model)
        } else {
            ServiceHealth::degraded("API key not configured".to_string()).with_model(model)
        }
    }
}

/// The database is critical; a provider without credentials only degrades
/// the service since the other provider can still be used.
pub fn determine_overall_status(checks: &HashMap<String, ServiceHealth>) -> HealthStatus {
    let has_unhealthy = checks
        .values()
        .any(|health| health.status == HealthStatus::Unhealthy);

    let has_degraded = checks
        .values()
        .any(|health| health.status == HealthStatus::Degraded);

    if has_unhealthy {
        HealthStatus::Unhealthy
    } else if has_degraded {
        HealthStatus::Degraded
    } else {
        HealthStatus::Healthy
    }
}
