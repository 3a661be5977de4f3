//! Application services: identity gate, route admission, the submission
//! wizard, and the dashboard, analysis and admin views.

pub mod admin;
pub mod analysis;
pub mod backend;
pub mod dashboard;
pub mod gate;
pub mod routes;
pub mod workflow;

pub use admin::AdminConsole;
pub use analysis::{AnalysisPage, AnalysisService, AnalysisView};
pub use backend::{BackendError, backend_from_config};
pub use dashboard::{Dashboard, DashboardError, DashboardService};
pub use gate::{GateError, IdentityGate, SignupError, SignupForm};
pub use routes::{Access, Admission, Route, admit};
pub use workflow::{Step, SubmissionWorkflow, SubmitOutcome, ValidationError, WorkflowError};
