//! Dashboard aggregation and alert read-state transitions.

use patentwise_core::{Alert, SubmissionRecord};
use serde::Serialize;

/// Summary counts shown at the top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DashboardMetrics {
    pub total_submissions: usize,
    /// Submissions whose analysis has not reached a terminal status.
    pub pending_count: usize,
    pub unread_alert_count: usize,
}

/// Recompute dashboard counts from scratch.
pub fn aggregate_dashboard_metrics(
    submissions: &[SubmissionRecord],
    alerts: &[Alert],
) -> DashboardMetrics {
    DashboardMetrics {
        total_submissions: submissions.len(),
        pending_count: submissions.iter().filter(|s| s.status.is_pending()).count(),
        unread_alert_count: alerts.iter().filter(|a| !a.read).count(),
    }
}

/// Mark an alert read. Idempotent; never clears `read`.
pub fn mark_alert_read(alert: Alert) -> Alert {
    Alert { read: true, ..alert }
}
