pub mod utils;
pub mod view_model;

pub use utils::EmployeeForm;
pub use view_model::{AddEmployeeViewModel, EmployeeListViewModel};
