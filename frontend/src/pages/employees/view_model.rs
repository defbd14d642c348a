use crate::{
    api::{ApiClient, ApiError, Employee, RecordId},
    pages::employees::utils::EmployeeForm,
    state::{EmployeeDirectory, FormError, LoadOutcome, SubmissionState},
};

pub const ADD_FAILED: &str = "Failed to add employee";
pub const FETCH_FAILED: &str = "Failed to fetch employees.";
pub const DELETE_FAILED: &str = "Failed to delete";

/// The "add employee" form.
#[derive(Debug, Clone)]
pub struct AddEmployeeViewModel {
    api: ApiClient,
    form: EmployeeForm,
    submission: SubmissionState<Employee>,
}

impl AddEmployeeViewModel {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            form: EmployeeForm::default(),
            submission: SubmissionState::Idle,
        }
    }

    /// Editing a field drops the messages shown for it.
    pub fn set_field(&mut self, field: &str, value: impl Into<String>) {
        self.form.set(field, value);
        self.submission.clear_field(field);
    }

    pub async fn submit(&mut self) -> &SubmissionState<Employee> {
        self.submission = SubmissionState::Idle;

        let payload = match self.form.to_payload() {
            Ok(payload) => payload,
            Err(errors) => {
                self.submission = SubmissionState::Rejected(FormError::FieldErrors(errors));
                return &self.submission;
            }
        };

        self.submission = SubmissionState::Submitting;
        let result = self.api.create_employee(&payload).await;
        if let Err(err) = &result {
            log::warn!("Creating employee {} failed: {}", payload.employee_id, err);
        }
        self.submission = SubmissionState::from_result(result, ADD_FAILED);
        &self.submission
    }

    pub fn form(&self) -> &EmployeeForm {
        &self.form
    }

    pub fn submission(&self) -> &SubmissionState<Employee> {
        &self.submission
    }
}

/// The paginated roster with per-row delete.
#[derive(Debug, Clone)]
pub struct EmployeeListViewModel {
    api: ApiClient,
    directory: EmployeeDirectory,
    loading: bool,
    error: Option<String>,
    alert: Option<String>,
}

impl EmployeeListViewModel {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            directory: EmployeeDirectory::new(),
            loading: true,
            error: None,
            alert: None,
        }
    }

    pub async fn load(&mut self) -> Result<LoadOutcome, ApiError> {
        let result = self.directory.load(&self.api, None).await;
        self.finish_load(result)
    }

    pub async fn next_page(&mut self) -> Option<Result<LoadOutcome, ApiError>> {
        let cursor = self.directory.next_cursor().cloned()?;
        let result = self.directory.load(&self.api, Some(&cursor)).await;
        Some(self.finish_load(result))
    }

    pub async fn previous_page(&mut self) -> Option<Result<LoadOutcome, ApiError>> {
        let cursor = self.directory.previous_cursor().cloned()?;
        let result = self.directory.load(&self.api, Some(&cursor)).await;
        Some(self.finish_load(result))
    }

    fn finish_load(
        &mut self,
        result: Result<LoadOutcome, ApiError>,
    ) -> Result<LoadOutcome, ApiError> {
        self.loading = false;
        match &result {
            Ok(_) => self.error = None,
            Err(err) => {
                log::error!("Failed to fetch employees: {}", err);
                self.error = Some(FETCH_FAILED.to_string());
            }
        }
        result
    }

    /// Call after the user confirmed. On failure the row stays and an alert
    /// is raised.
    pub async fn delete(&mut self, id: &RecordId) -> Result<(), ApiError> {
        self.alert = None;
        let result = self.directory.remove(&self.api, id).await;
        if result.is_err() {
            self.alert = Some(DELETE_FAILED.to_string());
        }
        result
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn employees(&self) -> &[Employee] {
        self.directory.employees()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn has_next(&self) -> bool {
        self.directory.next_cursor().is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.directory.previous_cursor().is_some()
    }
}
