use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
    api::{
        ApiClient, ApiError, AttendanceFilter, AttendanceRecord, AttendanceStatus, Cursor,
        MarkAttendance, Page, PageRequest, RecordId,
    },
    state::window::{LoadOutcome, PageTicket, PageWindow},
};

/// The attendance page currently held by a view, plus the filter it was
/// fetched with.
///
/// A filter only becomes active once a page fetched with it is shown; until
/// then it waits in `pending` under its request's sequence number.
#[derive(Debug, Clone, Default)]
pub struct AttendanceLedger {
    window: PageWindow<AttendanceRecord>,
    filter: AttendanceFilter,
    pending: BTreeMap<u64, AttendanceFilter>,
}

impl AttendanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// `filter` becomes the active filter once this request's page is
    /// applied. When following a cursor the filter is not re-sent; the cursor
    /// already carries it.
    pub fn begin_load(&mut self, cursor: Option<&Cursor>, filter: AttendanceFilter) -> PageTicket {
        let request = match cursor {
            Some(cursor) => PageRequest::cursor(cursor.clone()),
            None => PageRequest::filtered(filter.query_params()),
        };
        let ticket = self.window.issue(request);
        self.pending.insert(ticket.sequence(), filter);
        ticket
    }

    pub fn apply(
        &mut self,
        ticket: &PageTicket,
        result: Result<Page<AttendanceRecord>, ApiError>,
    ) -> Result<LoadOutcome, ApiError> {
        let filter = self.pending.remove(&ticket.sequence());
        let outcome = self.window.resolve(ticket, result);
        if outcome == Ok(LoadOutcome::Applied) {
            if let Some(filter) = filter {
                self.filter = filter;
            }
        }
        if outcome != Ok(LoadOutcome::Stale) {
            // Older requests can no longer be applied.
            let newer = self.pending.split_off(&ticket.sequence());
            self.pending = newer;
        }
        outcome
    }

    pub async fn load(
        &mut self,
        api: &ApiClient,
        cursor: Option<&Cursor>,
        filter: AttendanceFilter,
    ) -> Result<LoadOutcome, ApiError> {
        let ticket = self.begin_load(cursor, filter);
        let result = api.list_attendance(ticket.request()).await;
        self.apply(&ticket, result)
    }

    /// Re-fetches the first page with the active filter.
    pub async fn refresh(&mut self, api: &ApiClient) -> Result<LoadOutcome, ApiError> {
        let filter = self.filter.clone();
        self.load(api, None, filter).await
    }

    /// Returns `None` when there is no next page to go to.
    pub async fn next_page(&mut self, api: &ApiClient) -> Option<Result<LoadOutcome, ApiError>> {
        let cursor = self.window.next().cloned()?;
        let filter = self.filter.clone();
        Some(self.load(api, Some(&cursor), filter).await)
    }

    pub async fn previous_page(
        &mut self,
        api: &ApiClient,
    ) -> Option<Result<LoadOutcome, ApiError>> {
        let cursor = self.window.previous().cloned()?;
        let filter = self.filter.clone();
        Some(self.load(api, Some(&cursor), filter).await)
    }

    /// Submits a new record. The held page is not touched: the created
    /// record only shows up after the next load.
    pub async fn mark(
        &self,
        api: &ApiClient,
        employee: RecordId,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> Result<AttendanceRecord, ApiError> {
        let payload = MarkAttendance {
            employee,
            date,
            status,
        };
        match api.mark_attendance(&payload).await {
            Ok(record) => {
                log::info!(
                    "Marked {} as {} on {}",
                    record.employee_code,
                    record.status,
                    record.date
                );
                Ok(record)
            }
            Err(err) => {
                log::warn!(
                    "Marking employee {} on {} failed: {}",
                    payload.employee,
                    payload.date,
                    err
                );
                Err(err)
            }
        }
    }

    pub fn records(&self) -> &[AttendanceRecord] {
        self.window.items()
    }

    /// The filter of the page on screen.
    pub fn filter(&self) -> &AttendanceFilter {
        &self.filter
    }

    pub fn is_pending(&self) -> bool {
        self.window.is_pending()
    }

    pub fn next_cursor(&self) -> Option<&Cursor> {
        self.window.next()
    }

    pub fn previous_cursor(&self) -> Option<&Cursor> {
        self.window.previous()
    }

    pub fn records_for(&self, employee: &RecordId, date: NaiveDate) -> Vec<&AttendanceRecord> {
        self.records()
            .iter()
            .filter(|record| &record.employee == employee && record.date == date)
            .collect()
    }
}
