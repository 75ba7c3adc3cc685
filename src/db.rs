pub mod report_source;
pub use report_source::{PgReportSource, ReportSource};
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
