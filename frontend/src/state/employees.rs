use std::collections::BTreeMap;

use crate::{
    api::{ApiClient, ApiError, Cursor, Department, Employee, Page, PageRequest, RecordId},
    state::window::{LoadOutcome, PageTicket, PageWindow},
};

/// The employee roster page currently held by a view.
#[derive(Debug, Clone, Default)]
pub struct EmployeeDirectory {
    window: PageWindow<Employee>,
}

impl EmployeeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self, cursor: Option<&Cursor>) -> PageTicket {
        let request = match cursor {
            Some(cursor) => PageRequest::cursor(cursor.clone()),
            None => PageRequest::first(),
        };
        self.window.issue(request)
    }

    pub fn apply(
        &mut self,
        ticket: &PageTicket,
        result: Result<Page<Employee>, ApiError>,
    ) -> Result<LoadOutcome, ApiError> {
        self.window.resolve(ticket, result)
    }

    /// Fetches the first page, or the page behind `cursor`, and replaces the
    /// held roster with it.
    pub async fn load(
        &mut self,
        api: &ApiClient,
        cursor: Option<&Cursor>,
    ) -> Result<LoadOutcome, ApiError> {
        let ticket = self.begin_load(cursor);
        let result = api.list_employees(ticket.request()).await;
        self.apply(&ticket, result)
    }

    pub fn employees(&self) -> &[Employee] {
        self.window.items()
    }

    pub fn len(&self) -> usize {
        self.window.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.items().is_empty()
    }

    pub fn next_cursor(&self) -> Option<&Cursor> {
        self.window.next()
    }

    pub fn previous_cursor(&self) -> Option<&Cursor> {
        self.window.previous()
    }

    pub fn lookup_by_id(&self, id: &RecordId) -> Option<&Employee> {
        self.employees().iter().find(|employee| &employee.id == id)
    }

    /// Only departments that occur on the current page get a bucket.
    pub fn group_by_department(&self) -> BTreeMap<Department, Vec<&Employee>> {
        let mut groups: BTreeMap<Department, Vec<&Employee>> = BTreeMap::new();
        for employee in self.employees() {
            groups.entry(employee.department).or_default().push(employee);
        }
        groups
    }

    /// Deletes on the server first; the local page only changes once the
    /// server has confirmed.
    pub async fn remove(&mut self, api: &ApiClient, id: &RecordId) -> Result<(), ApiError> {
        if let Err(err) = api.delete_employee(id).await {
            log::warn!("Failed to delete employee {}: {}", id, err);
            return Err(err);
        }
        self.window.retain(|employee| &employee.id != id);
        Ok(())
    }
}
