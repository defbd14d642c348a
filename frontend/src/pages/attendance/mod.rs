pub mod utils;
pub mod view_model;

pub use utils::{AttendanceForm, FilterForm};
pub use view_model::SubmissionWorkflow;
