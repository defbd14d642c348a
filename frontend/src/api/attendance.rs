use super::{
    client::{ApiClient, PageRequest, Resource},
    types::{ApiError, AttendanceRecord, MarkAttendance, Page},
};

impl ApiClient {
    pub async fn list_attendance(
        &self,
        request: &PageRequest,
    ) -> Result<Page<AttendanceRecord>, ApiError> {
        self.fetch_page(Resource::Attendance, request).await
    }

    /// A second mark for the same employee and date comes back as
    /// `ApiError::Validation` with the service's own messages.
    pub async fn mark_attendance(
        &self,
        payload: &MarkAttendance,
    ) -> Result<AttendanceRecord, ApiError> {
        let response = self
            .send(
                self.http_client()
                    .post(self.endpoint(Resource::Attendance.path()))
                    .json(payload),
            )
            .await?;
        self.map_json_response(response).await
    }
}
