use crate::api::{ApiError, FieldErrors};

/// What a form shows after the service refused or could not be reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    FieldErrors(FieldErrors),
    General(String),
    TransportFailure(String),
}

impl FormError {
    /// Transport failures are replaced by `failure_message`; everything the
    /// service said is kept verbatim.
    pub fn from_api(err: ApiError, failure_message: &str) -> Self {
        match err {
            ApiError::Validation(errors) => FormError::FieldErrors(errors),
            ApiError::General(message) => FormError::General(message),
            ApiError::NotFound => FormError::General(ApiError::NotFound.to_string()),
            ApiError::Transport(_) | ApiError::Decode(_) => {
                FormError::TransportFailure(failure_message.to_string())
            }
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            FormError::FieldErrors(errors) => Some(errors),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> &[String] {
        self.field_errors().map(|errors| errors.get(name)).unwrap_or(&[])
    }

    pub fn non_field(&self) -> &[String] {
        self.field_errors()
            .map(FieldErrors::non_field)
            .unwrap_or(&[])
    }

    /// The single line shown above the form, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            FormError::FieldErrors(errors) => errors.non_field().first().map(String::as_str),
            FormError::General(message) | FormError::TransportFailure(message) => {
                Some(message.as_str())
            }
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, FormError::TransportFailure(_))
    }
}

/// One submission attempt. `Succeeded`, `Rejected` and `Failed` are
/// terminal; trying again starts over from `Idle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState<T> {
    Idle,
    Submitting,
    Succeeded(T),
    Rejected(FormError),
    Failed(FormError),
}

impl<T> Default for SubmissionState<T> {
    fn default() -> Self {
        SubmissionState::Idle
    }
}

impl<T> SubmissionState<T> {
    pub fn from_result(result: Result<T, ApiError>, failure_message: &str) -> Self {
        match result {
            Ok(value) => SubmissionState::Succeeded(value),
            Err(err) => match FormError::from_api(err, failure_message) {
                failure @ FormError::TransportFailure(_) => SubmissionState::Failed(failure),
                rejection => SubmissionState::Rejected(rejection),
            },
        }
    }

    pub fn error(&self) -> Option<&FormError> {
        match self {
            SubmissionState::Rejected(err) | SubmissionState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn error_mut(&mut self) -> Option<&mut FormError> {
        match self {
            SubmissionState::Rejected(err) | SubmissionState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn succeeded(&self) -> Option<&T> {
        match self {
            SubmissionState::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::Succeeded(_) | SubmissionState::Rejected(_) | SubmissionState::Failed(_)
        )
    }

    /// Drops one field's messages from a rejection, e.g. after the user edits
    /// that field.
    pub fn clear_field(&mut self, field: &str) {
        if let Some(FormError::FieldErrors(errors)) = self.error_mut() {
            errors.clear_field(field);
        }
    }
}
