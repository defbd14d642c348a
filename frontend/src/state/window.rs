use crate::api::{ApiError, Cursor, Page, PageRequest};

/// Whether a resolved fetch replaced the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer request had already resolved; the response was dropped.
    Stale,
}

/// Identifies one issued fetch against a window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTicket {
    sequence: u64,
    request: PageRequest,
}

impl PageTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn request(&self) -> &PageRequest {
        &self.request
    }
}

/// The page currently on screen for one collection.
///
/// Fetched pages replace the held items; nothing accumulates across pages.
/// Every fetch gets a sequence number and a response whose number is not
/// newer than the last resolved one is discarded, so the most recently
/// issued request wins when responses arrive out of order.
#[derive(Debug, Clone)]
pub struct PageWindow<T> {
    items: Vec<T>,
    next: Option<Cursor>,
    previous: Option<Cursor>,
    issued: u64,
    resolved: u64,
}

impl<T> Default for PageWindow<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next: None,
            previous: None,
            issued: 0,
            resolved: 0,
        }
    }
}

impl<T> PageWindow<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, request: PageRequest) -> PageTicket {
        self.issued += 1;
        PageTicket {
            sequence: self.issued,
            request,
        }
    }

    /// Applies a fetch result. Failures of the current request leave the
    /// held page untouched and are returned to the caller.
    pub fn resolve(
        &mut self,
        ticket: &PageTicket,
        result: Result<Page<T>, ApiError>,
    ) -> Result<LoadOutcome, ApiError> {
        if ticket.sequence <= self.resolved {
            log::warn!(
                "Discarding page response #{} (already resolved #{})",
                ticket.sequence,
                self.resolved
            );
            return Ok(LoadOutcome::Stale);
        }
        self.resolved = ticket.sequence;

        let page = result?;
        self.items = page.items;
        self.next = page.next;
        self.previous = page.previous;
        Ok(LoadOutcome::Applied)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn next(&self) -> Option<&Cursor> {
        self.next.as_ref()
    }

    pub fn previous(&self) -> Option<&Cursor> {
        self.previous.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.issued > self.resolved
    }

    pub(crate) fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.items.retain(keep);
    }
}
