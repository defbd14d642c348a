pub mod metrics;
pub mod view_model;

pub use metrics::{
    date_series, department_presence, derive_metrics, today_summary, DayCount, DerivedMetrics,
    TodaySummary,
};
pub use view_model::DashboardViewModel;
