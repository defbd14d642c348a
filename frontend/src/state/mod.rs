pub mod attendance;
pub mod employees;
pub mod submission;
pub mod window;

pub use attendance::AttendanceLedger;
pub use employees::EmployeeDirectory;
pub use submission::{FormError, SubmissionState};
pub use window::{LoadOutcome, PageTicket, PageWindow};
