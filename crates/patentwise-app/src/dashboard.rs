//! Dashboard: the signed-in user's submissions, alerts and headline counts.

use std::sync::Arc;

use patentwise_core::{Alert, AlertId, Principal, SubmissionRecord};
use patentwise_risk::{DashboardMetrics, aggregate_dashboard_metrics, mark_alert_read};
use patentwise_store::{AlertError, AlertStore, Backend, IngestionError, SubmissionIngestion};
use thiserror::Error;
use tracing::{debug, info};

use crate::gate::{GateError, IdentityGate};

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("loading submissions: {0}")]
    Submissions(#[from] IngestionError),
    #[error("loading alerts: {0}")]
    Alerts(#[from] AlertError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub submissions: Vec<SubmissionRecord>,
    pub alerts: Vec<Alert>,
    pub metrics: DashboardMetrics,
}

impl Dashboard {
    fn new(submissions: Vec<SubmissionRecord>, alerts: Vec<Alert>) -> Self {
        let metrics = aggregate_dashboard_metrics(&submissions, &alerts);
        Self {
            submissions,
            alerts,
            metrics,
        }
    }

    pub fn unread_alerts(&self) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(|a| !a.read)
    }
}

pub struct DashboardService {
    principal: Principal,
    ingestion: Arc<dyn SubmissionIngestion>,
    alerts: Arc<dyn AlertStore>,
}

impl DashboardService {
    pub fn new(gate: &IdentityGate, backend: &Backend) -> Result<Self, GateError> {
        Ok(Self {
            principal: gate.require_principal()?.clone(),
            ingestion: backend.ingestion.clone(),
            alerts: backend.alerts.clone(),
        })
    }

    /// Fetch submissions and alerts concurrently. Newest first.
    pub async fn load(&self) -> Result<Dashboard, DashboardError> {
        let user = &self.principal.user_id;
        let (mut submissions, mut alerts) = futures::try_join!(
            async { self.ingestion.list_for_owner(user).await.map_err(DashboardError::from) },
            async { self.alerts.list(user).await.map_err(DashboardError::from) },
        )?;
        submissions.sort_by(|a, b| b.submission.submitted_at.cmp(&a.submission.submitted_at));
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let dashboard = Dashboard::new(submissions, alerts);
        info!(
            user = %user,
            submissions = dashboard.metrics.total_submissions,
            pending = dashboard.metrics.pending_count,
            unread = dashboard.metrics.unread_alert_count,
            "dashboard loaded"
        );
        Ok(dashboard)
    }

    /// Persist the read flag, then update the loaded dashboard. Already-read
    /// and unknown alerts are left as they are.
    pub async fn mark_read(&self, dashboard: &mut Dashboard, id: &AlertId) -> Result<(), DashboardError> {
        let Some(idx) = dashboard.alerts.iter().position(|a| &a.id == id) else {
            debug!(alert = %id, "alert not on this dashboard");
            return Ok(());
        };
        if dashboard.alerts[idx].read {
            return Ok(());
        }
        self.alerts.mark_read(id).await?;

        let alert = dashboard.alerts.remove(idx);
        dashboard.alerts.insert(idx, mark_alert_read(alert));
        dashboard.metrics = aggregate_dashboard_metrics(&dashboard.submissions, &dashboard.alerts);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patentwise_store::{FIXTURE_PASSWORD, FixtureBackend};

    async fn service(backend: &FixtureBackend) -> DashboardService {
        let mut gate = IdentityGate::new(Arc::new(backend.clone()));
        gate.resolve().await;
        gate.sign_in("inventor1@example.com", FIXTURE_PASSWORD)
            .await
            .unwrap();
        DashboardService::new(&gate, &backend.clone().into_backend()).unwrap()
    }

    #[tokio::test]
    async fn loads_seeded_dashboard() {
        let backend = FixtureBackend::seeded();
        let dashboard = service(&backend).await.load().await.unwrap();
        assert_eq!(
            dashboard.metrics,
            DashboardMetrics {
                total_submissions: 3,
                pending_count: 1,
                unread_alert_count: 2,
            }
        );
        assert_eq!(dashboard.submissions[0].submission.id.as_str(), "1");
        assert_eq!(dashboard.alerts[0].id.as_str(), "1");
        assert_eq!(dashboard.unread_alerts().count(), 2);
    }

    #[tokio::test]
    async fn mark_read_updates_counts_and_store() {
        let backend = FixtureBackend::seeded();
        let service = service(&backend).await;
        let mut dashboard = service.load().await.unwrap();

        service
            .mark_read(&mut dashboard, &AlertId::from("3"))
            .await
            .unwrap();
        assert_eq!(dashboard.metrics.unread_alert_count, 1);

        // Idempotent.
        service
            .mark_read(&mut dashboard, &AlertId::from("3"))
            .await
            .unwrap();
        assert_eq!(dashboard.metrics.unread_alert_count, 1);

        let reloaded = service.load().await.unwrap();
        assert_eq!(reloaded.metrics.unread_alert_count, 1);
    }

    #[tokio::test]
    async fn signed_out_cannot_open_dashboard() {
        let backend = FixtureBackend::seeded();
        let gate = IdentityGate::new(Arc::new(backend.clone()));
        assert!(matches!(
            DashboardService::new(&gate, &backend.into_backend()),
            Err(GateError::Unresolved)
        ));
    }
}
