//! Analysis results page for one submission.

use std::sync::Arc;

use chrono::Utc;
use patentwise_core::config::RiskConfig;
use patentwise_core::{Alert, AnalysisResult, SubmissionId, SubmissionRecord};
use patentwise_risk::{RiskReport, derive_alerts};
use patentwise_store::{AnalysisLookup, Backend, IngestionError, SubmissionIngestion};
use tracing::debug;

use crate::gate::{GateError, IdentityGate};

/// Everything the results page shows once the analysis exists.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisPage {
    /// `None` if the submission record itself could not be found.
    pub record: Option<SubmissionRecord>,
    pub result: AnalysisResult,
    pub report: RiskReport,
    /// Alerts the result would raise at the configured threshold.
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisView {
    Ready(Box<AnalysisPage>),
    /// Submitted but the pipeline has not produced a result yet.
    NotReady,
    /// No such submission.
    Missing,
}

pub struct AnalysisService {
    ingestion: Arc<dyn SubmissionIngestion>,
    risk: RiskConfig,
}

impl AnalysisService {
    pub fn new(gate: &IdentityGate, backend: &Backend, risk: RiskConfig) -> Result<Self, GateError> {
        gate.require_principal()?;
        Ok(Self {
            ingestion: backend.ingestion.clone(),
            risk,
        })
    }

    pub async fn view(&self, id: &SubmissionId) -> Result<AnalysisView, IngestionError> {
        let (lookup, record) =
            futures::try_join!(self.ingestion.get_analysis(id), self.ingestion.get(id))?;

        let result = match lookup {
            AnalysisLookup::Ready(result) => result,
            AnalysisLookup::Pending => {
                debug!(submission = %id, "analysis pending");
                return Ok(AnalysisView::NotReady);
            }
            AnalysisLookup::NotFound => return Ok(AnalysisView::Missing),
        };

        let report = RiskReport::from_analysis(
            &result,
            self.risk.similarity_alert_threshold,
            self.risk.distribution_epsilon,
        );
        let title = record
            .as_ref()
            .map(|r| r.submission.title.as_str())
            .unwrap_or(id.as_str());
        let alerts = derive_alerts(
            title,
            &result,
            self.risk.similarity_alert_threshold,
            Utc::now(),
        );
        Ok(AnalysisView::Ready(Box::new(AnalysisPage {
            record,
            result,
            report,
            alerts,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patentwise_core::{AlertKind, SessionState};
    use patentwise_risk::RiskTier;
    use patentwise_store::{FIXTURE_PASSWORD, FixtureBackend};

    async fn service(backend: &FixtureBackend) -> AnalysisService {
        let mut gate = IdentityGate::new(Arc::new(backend.clone()));
        gate.resolve().await;
        gate.sign_in("analyst1@example.com", FIXTURE_PASSWORD)
            .await
            .unwrap();
        AnalysisService::new(&gate, &backend.clone().into_backend(), RiskConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn ready_analysis_is_classified() {
        let backend = FixtureBackend::seeded();
        let view = service(&backend)
            .await
            .view(&SubmissionId::from("1"))
            .await
            .unwrap();
        let AnalysisView::Ready(page) = view else {
            panic!("expected a ready analysis, got {view:?}");
        };
        assert_eq!(page.report.headline_tier(), RiskTier::High);
        assert_eq!(page.report.prior_art_assessment.high_similarity_count, 1);
        assert_eq!(
            page.record.as_ref().unwrap().submission.title,
            "Method for Natural Language Processing"
        );
        let kinds: Vec<AlertKind> = page.alerts.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AlertKind::NewMatch,
                AlertKind::Infringement,
                AlertKind::CriticalChange
            ]
        );
    }

    #[tokio::test]
    async fn processing_is_not_ready_and_unknown_is_missing() {
        let backend = FixtureBackend::seeded();
        let service = service(&backend).await;
        assert_eq!(
            service.view(&SubmissionId::from("3")).await.unwrap(),
            AnalysisView::NotReady
        );
        assert_eq!(
            service.view(&SubmissionId::from("404")).await.unwrap(),
            AnalysisView::Missing
        );
    }

    #[tokio::test]
    async fn requires_session() {
        let backend = FixtureBackend::seeded();
        let mut gate = IdentityGate::new(Arc::new(backend.clone()));
        assert_eq!(gate.resolve().await, &SessionState::Unauthenticated);
        assert!(matches!(
            AnalysisService::new(&gate, &backend.into_backend(), RiskConfig::default()),
            Err(GateError::SignInRequired)
        ));
    }
}
