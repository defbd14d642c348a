use chrono::NaiveDate;

use crate::{
    api::{
        ApiClient, ApiError, AttendanceFilter, AttendanceRecord, AttendanceStatus, Employee,
        RecordId, NON_FIELD_ERRORS,
    },
    pages::attendance::utils::{AttendanceForm, FilterForm},
    state::{AttendanceLedger, EmployeeDirectory, FormError, LoadOutcome, SubmissionState},
};

pub const MARK_SUCCESS: &str = "Attendance marked successfully";
pub const MARK_FAILED: &str = "Failed to mark attendance";
pub const PICKER_FAILED: &str = "Failed to fetch employees.";

/// The attendance screen: the mark form, the employee picker and the
/// filtered, paginated ledger below it.
#[derive(Debug, Clone)]
pub struct SubmissionWorkflow {
    api: ApiClient,
    employees: EmployeeDirectory,
    ledger: AttendanceLedger,
    form: AttendanceForm,
    filter_form: FilterForm,
    submission: SubmissionState<AttendanceRecord>,
    message: Option<String>,
    filter_error: Option<FormError>,
    picker_error: Option<FormError>,
}

impl SubmissionWorkflow {
    pub fn new(api: ApiClient, today: NaiveDate) -> Self {
        Self {
            api,
            employees: EmployeeDirectory::new(),
            ledger: AttendanceLedger::new(),
            form: AttendanceForm::new(today),
            filter_form: FilterForm::default(),
            submission: SubmissionState::Idle,
            message: None,
            filter_error: None,
            picker_error: None,
        }
    }

    /// Loads the employee picker and the first ledger page. A picker failure
    /// is kept in `picker_error` and does not stop the ledger load.
    pub async fn load(&mut self) -> Result<LoadOutcome, ApiError> {
        self.picker_error = match self.employees.load(&self.api, None).await {
            Ok(_) => None,
            Err(err) => {
                log::error!("Error fetching employees: {}", err);
                Some(FormError::from_api(err, PICKER_FAILED))
            }
        };
        let filter = self.ledger.filter().clone();
        self.ledger.load(&self.api, None, filter).await
    }

    pub fn set_employee(&mut self, employee: Option<RecordId>) {
        self.form.employee = employee;
        self.submission.clear_field(NON_FIELD_ERRORS);
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.form.date = date.into();
        self.submission.clear_field(NON_FIELD_ERRORS);
    }

    pub fn set_status(&mut self, status: AttendanceStatus) {
        self.form.status = status;
    }

    /// Runs one mark attempt to a terminal state. The ledger is refreshed
    /// only after the service accepted the record.
    pub async fn submit(&mut self) -> &SubmissionState<AttendanceRecord> {
        self.message = None;
        self.submission = SubmissionState::Idle;

        let payload = match self.form.to_payload() {
            Ok(payload) => payload,
            Err(errors) => {
                self.submission = SubmissionState::Rejected(FormError::FieldErrors(errors));
                return &self.submission;
            }
        };

        self.submission = SubmissionState::Submitting;
        let result = self
            .ledger
            .mark(&self.api, payload.employee, payload.date, payload.status)
            .await;
        self.submission = SubmissionState::from_result(result, MARK_FAILED);

        if self.submission.succeeded().is_some() {
            self.message = Some(MARK_SUCCESS.to_string());
            if let Err(err) = self.ledger.refresh(&self.api).await {
                log::warn!("Attendance refresh after marking failed: {}", err);
            }
        }
        &self.submission
    }

    pub async fn apply_filter(&mut self, form: FilterForm) -> Result<LoadOutcome, FormError> {
        let filter = match form.to_filter() {
            Ok(filter) => filter,
            Err(errors) => {
                let err = FormError::FieldErrors(errors);
                self.filter_error = Some(err.clone());
                return Err(err);
            }
        };
        self.reload(filter, form).await
    }

    pub async fn clear_filter(&mut self) -> Result<LoadOutcome, FormError> {
        self.reload(AttendanceFilter::default(), FilterForm::default())
            .await
    }

    /// `form` replaces the shown filter inputs only when the filtered page
    /// was applied.
    async fn reload(
        &mut self,
        filter: AttendanceFilter,
        form: FilterForm,
    ) -> Result<LoadOutcome, FormError> {
        self.filter_error = None;
        match self.ledger.load(&self.api, None, filter).await {
            Ok(LoadOutcome::Applied) => {
                self.filter_form = form;
                Ok(LoadOutcome::Applied)
            }
            Ok(LoadOutcome::Stale) => Ok(LoadOutcome::Stale),
            Err(err) => {
                let err = FormError::from_api(err, "Failed to load attendance");
                self.filter_error = Some(err.clone());
                Err(err)
            }
        }
    }

    pub async fn next_page(&mut self) -> Option<Result<LoadOutcome, ApiError>> {
        self.ledger.next_page(&self.api).await
    }

    pub async fn previous_page(&mut self) -> Option<Result<LoadOutcome, ApiError>> {
        self.ledger.previous_page(&self.api).await
    }

    pub fn form(&self) -> &AttendanceForm {
        &self.form
    }

    pub fn filter_form(&self) -> &FilterForm {
        &self.filter_form
    }

    pub fn filter_error(&self) -> Option<&FormError> {
        self.filter_error.as_ref()
    }

    pub fn picker_error(&self) -> Option<&FormError> {
        self.picker_error.as_ref()
    }

    pub fn submission(&self) -> &SubmissionState<AttendanceRecord> {
        &self.submission
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn employees(&self) -> &[Employee] {
        self.employees.employees()
    }

    pub fn ledger(&self) -> &AttendanceLedger {
        &self.ledger
    }

    pub fn has_next(&self) -> bool {
        self.ledger.next_cursor().is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.ledger.previous_cursor().is_some()
    }
}
