use chrono::NaiveDate;

use crate::{
    api::{ApiClient, ApiError, AttendanceFilter},
    pages::dashboard::metrics::{derive_metrics, DerivedMetrics},
    state::{AttendanceLedger, EmployeeDirectory},
    utils::time::today_in_app_tz,
};

/// Owns the two snapshots the dashboard aggregates over.
#[derive(Debug, Clone)]
pub struct DashboardViewModel {
    api: ApiClient,
    employees: EmployeeDirectory,
    attendance: AttendanceLedger,
}

impl DashboardViewModel {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            employees: EmployeeDirectory::new(),
            attendance: AttendanceLedger::new(),
        }
    }

    /// Loads the first page of both collections. A failure of one does not
    /// keep the other from loading; the first error is returned.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        let (employees, attendance) = (&mut self.employees, &mut self.attendance);
        let employees_ticket = employees.begin_load(None);
        let attendance_ticket = attendance.begin_load(None, AttendanceFilter::default());
        let (employee_page, attendance_page) = futures::join!(
            self.api.list_employees(employees_ticket.request()),
            self.api.list_attendance(attendance_ticket.request())
        );

        let employees_result = employees.apply(&employees_ticket, employee_page);
        let attendance_result = attendance.apply(&attendance_ticket, attendance_page);
        if let Err(err) = &employees_result {
            log::error!("Failed to load employees for dashboard: {}", err);
        }
        if let Err(err) = &attendance_result {
            log::error!("Failed to load attendance for dashboard: {}", err);
        }
        employees_result?;
        attendance_result?;
        Ok(())
    }

    pub fn employees(&self) -> &EmployeeDirectory {
        &self.employees
    }

    pub fn attendance(&self) -> &AttendanceLedger {
        &self.attendance
    }

    pub fn metrics(&self, today: NaiveDate) -> DerivedMetrics {
        derive_metrics(self.employees.employees(), self.attendance.records(), today)
    }

    pub fn metrics_today(&self) -> DerivedMetrics {
        self.metrics(today_in_app_tz())
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::api::{test_support::mock::*, Department};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn day(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn load_then_aggregate() {
        let service = FakeRosterService::start();
        let ada = service.add_employee("EMP001", "Ada Lovelace", "IT");
        service.add_employee("EMP002", "Grace Hopper", "HR");
        let api = ApiClient::new_with_base_url(service.api_url());
        let ledger = AttendanceLedger::new();
        ledger
            .mark(
                &api,
                ada.into(),
                day("2024-01-01"),
                crate::api::AttendanceStatus::Present,
            )
            .await
            .unwrap();

        let mut dashboard = DashboardViewModel::new(api);
        dashboard.load().await.unwrap();
        let metrics = dashboard.metrics(day("2024-01-01"));

        assert_eq!(metrics.total_employees, 2);
        assert_eq!(metrics.today_present, 1);
        assert_eq!(metrics.today_absent, 0);
        assert_eq!(
            metrics.department_presence,
            BTreeMap::from([(Department::Hr, 0), (Department::It, 1)])
        );
    }

    #[tokio::test]
    async fn attendance_still_loads_when_employees_fail() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/employees/");
            then.status(500);
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/attendance/");
            then.status(200).json_body(json!([{
                "id": 1,
                "employee": 1,
                "date": "2024-01-01",
                "status": "Absent"
            }]));
        });
        let mut dashboard = DashboardViewModel::new(ApiClient::new_with_base_url(server.url("/api/")));

        let err = dashboard.load().await.unwrap_err();

        assert!(err.is_transport());
        assert!(dashboard.employees().is_empty());
        assert_eq!(dashboard.attendance().records().len(), 1);
        let metrics = dashboard.metrics(day("2024-01-01"));
        assert_eq!(metrics.today_absent, 1);
        assert!(metrics.department_presence.is_empty());
    }
}
