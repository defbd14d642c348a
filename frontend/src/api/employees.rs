use super::{
    client::{ApiClient, PageRequest, Resource},
    types::{ApiError, Employee, NewEmployee, Page, RecordId},
};

impl ApiClient {
    pub async fn list_employees(&self, request: &PageRequest) -> Result<Page<Employee>, ApiError> {
        self.fetch_page(Resource::Employees, request).await
    }

    pub async fn create_employee(&self, payload: &NewEmployee) -> Result<Employee, ApiError> {
        let response = self
            .send(
                self.http_client()
                    .post(self.endpoint(Resource::Employees.path()))
                    .json(payload),
            )
            .await?;
        self.map_json_response(response).await
    }

    /// The service cascades the delete to the employee's attendance records.
    pub async fn delete_employee(&self, id: &RecordId) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("{}{}/", Resource::Employees.path(), id));
        let response = self.send(self.http_client().delete(url)).await?;
        self.map_empty_response(response).await
    }
}
