//! Pagination state for listing views.
//!
//! `PaginationController` owns the state and is the only thing that mutates
//! it. Every mutation is reported to a single listener as a
//! [`PaginationEvent`] together with a snapshot of the new state, so a view can
//! render purely from the snapshot accessors.

pub mod view;

use serde::{Deserialize, Serialize};

pub use view::{Control, PaginationBar, PaginationView};

/// Notification sent to the listener after each mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaginationEvent {
    /// `current_page` was (re)set by a navigation request.
    PageChanged,
    /// `total_items` was updated after a data fetch.
    TotalItemChanged,
}

/// Snapshot of the pagination of one listing.
/// `current_page` and `max_page` are zero-based; `0 <= current_page <= max_page` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    total_items: u64,
    page_size: u64,
    current_page: u64,
    max_page: u64,
}

impl PaginationState {
    /// A new listing: page 0, no items. A `page_size` of 0 is treated as 1.
    pub fn new(page_size: u64) -> Self {
        PaginationState { total_items: 0, page_size: page_size.max(1), current_page: 0, max_page: 0 }
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn max_page(&self) -> u64 {
        self.max_page
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 0
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.max_page
    }

    /// zero-based index of the first item on the current page
    pub fn offset(&self) -> u64 {
        self.current_page.saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }

    /// 1-based inclusive range of the displayed items, `"21 - 25"`.
    /// An empty listing reads `"0 - 0"`.
    pub fn pagination_range_label(&self) -> String {
        if self.total_items == 0 {
            return "0 - 0".to_string();
        }
        let first = self.offset() + 1;
        let last = self.offset().saturating_add(self.page_size).min(self.total_items);
        format!("{} - {}", first, last)
    }

    /// 1-based current page, the content of the page-number field
    pub fn number_page_text(&self) -> String {
        (self.current_page + 1).to_string()
    }

    /// 1-based last page
    pub fn max_page_number_label(&self) -> String {
        (self.max_page + 1).to_string()
    }

    fn set_total_items(&mut self, total_items: u64) {
        self.total_items = total_items;
        self.max_page = if total_items == 0 { 0 } else { (total_items - 1) / self.page_size };
        if self.current_page > self.max_page {
            self.current_page = self.max_page;
        }
    }

    fn set_current_page(&mut self, requested: i64) {
        self.current_page = if requested <= 0 { 0 } else { (requested as u64).min(self.max_page) };
    }
}

type Listener = Box<dyn FnMut(PaginationEvent, &PaginationState) + Send>;

/// Owns a [`PaginationState`] and answers navigation requests.
///
/// Out-of-range requests are clamped, never rejected.
pub struct PaginationController {
    state: PaginationState,
    listener: Option<Listener>,
}

impl std::fmt::Debug for PaginationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationController")
            .field("state", &self.state)
            .field("listener", &self.listener.as_ref().map(|_| "Some(Fn)"))
            .finish()
    }
}

impl PaginationController {
    pub fn new(page_size: u64) -> Self {
        PaginationController { state: PaginationState::new(page_size), listener: None }
    }

    /// Replace the listener. Only one listener is notified.
    pub fn set_listener<F>(&mut self, listener: F) -> &mut Self
    where
        F: FnMut(PaginationEvent, &PaginationState) + Send + 'static,
    {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn state(&self) -> &PaginationState {
        &self.state
    }

    fn notify(&mut self, event: PaginationEvent) {
        tracing::trace!(?event, state = ?self.state, "pagination");
        if let Some(listener) = self.listener.as_mut() {
            listener(event, &self.state);
        }
    }

    /// Record a new item total, clamping the current page when the listing shrank.
    pub fn compute_max_page(&mut self, total_items: u64) {
        self.state.set_total_items(total_items);
        self.notify(PaginationEvent::TotalItemChanged);
    }

    pub fn go_to_page(&mut self, requested: i64) {
        self.state.set_current_page(requested);
        self.notify(PaginationEvent::PageChanged);
    }

    pub fn first_page(&mut self) {
        self.go_to_page(0);
    }

    pub fn previous_page(&mut self) {
        self.go_to_page(self.current_page_i64().saturating_sub(1));
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.current_page_i64().saturating_add(1));
    }

    pub fn last_page(&mut self) {
        self.go_to_page(i64::try_from(self.state.max_page).unwrap_or(i64::MAX));
    }

    fn current_page_i64(&self) -> i64 {
        i64::try_from(self.state.current_page).unwrap_or(i64::MAX)
    }

    pub fn has_previous(&self) -> bool {
        self.state.has_previous()
    }

    pub fn has_next(&self) -> bool {
        self.state.has_next()
    }

    pub fn pagination_range_label(&self) -> String {
        self.state.pagination_range_label()
    }

    pub fn number_page_text(&self) -> String {
        self.state.number_page_text()
    }

    pub fn max_page_number_label(&self) -> String {
        self.state.max_page_number_label()
    }
}
