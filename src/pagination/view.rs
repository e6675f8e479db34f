use super::{PaginationController, PaginationEvent, PaginationState};
use crate::web::messages::list::PagedList;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Navigation affordances of the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    First,
    Previous,
    Next,
    Last,
    /// editable 1-based page-number field
    PageNumber,
}

/// Render state of the pagination bar.
///
/// Driven only by controller events: `PageChanged` disables everything until
/// the following `TotalItemChanged` reports the fetched total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    item_type_name: String,
    range_label: String,
    page_text: String,
    max_page_label: String,
    first: bool,
    previous: bool,
    next: bool,
    last: bool,
    page_number: bool,
    awaiting_since: Option<Instant>,
}

impl PaginationView {
    pub fn new(item_type_name: &str) -> Self {
        PaginationView {
            item_type_name: item_type_name.to_string(),
            range_label: format!("{} 0 - 0", item_type_name),
            page_text: "0".to_string(),
            max_page_label: "of 0".to_string(),
            first: false,
            previous: false,
            next: false,
            last: false,
            page_number: false,
            awaiting_since: None,
        }
    }

    pub fn on_event(&mut self, event: PaginationEvent, state: &PaginationState, now: Instant) {
        match event {
            PaginationEvent::PageChanged => {
                self.disable_all_controls();
                self.refresh_labels(state);
                self.awaiting_since = Some(now);
            },
            PaginationEvent::TotalItemChanged => {
                self.max_page_label = format!("of {}", state.max_page_number_label());
                self.enable_pagination_controls(state);
            },
        }
    }

    pub fn disable_all_controls(&mut self) {
        self.first = false;
        self.previous = false;
        self.next = false;
        self.last = false;
        self.page_number = false;
    }

    /// enable exactly what the state allows
    pub fn enable_pagination_controls(&mut self, state: &PaginationState) {
        self.first = state.has_previous();
        self.previous = state.has_previous();
        self.next = state.has_next();
        self.last = state.has_next();
        self.page_number = state.total_items() > 0;
        self.awaiting_since = None;
    }

    pub fn refresh_labels(&mut self, state: &PaginationState) {
        self.range_label = format!("{} {}", self.item_type_name, state.pagination_range_label());
        self.page_text = state.number_page_text();
    }

    pub fn is_enabled(&self, control: Control) -> bool {
        match control {
            Control::First => self.first,
            Control::Previous => self.previous,
            Control::Next => self.next,
            Control::Last => self.last,
            Control::PageNumber => self.page_number,
        }
    }

    pub fn all_disabled(&self) -> bool {
        !(self.first || self.previous || self.next || self.last || self.page_number)
    }

    pub fn range_label(&self) -> &str {
        &self.range_label
    }

    pub fn page_text(&self) -> &str {
        &self.page_text
    }

    pub fn max_page_label(&self) -> &str {
        &self.max_page_label
    }

    pub fn awaiting_since(&self) -> Option<Instant> {
        self.awaiting_since
    }
}

/// A controller wired to its view, plus the user interactions of the bar.
pub struct PaginationBar {
    controller: PaginationController,
    view: Arc<Mutex<PaginationView>>,
    fetch_timeout: Duration,
}

impl PaginationBar {
    pub fn new(item_type_name: &str, page_size: u64, fetch_timeout: Duration) -> Self {
        let view = Arc::new(Mutex::new(PaginationView::new(item_type_name)));
        let rendered = Arc::clone(&view);

        let mut controller = PaginationController::new(page_size);
        controller.set_listener(move |event, state| {
            lock(&rendered).on_event(event, state, Instant::now());
        });

        PaginationBar { controller, view, fetch_timeout }
    }

    pub fn from_settings(item_type_name: &str, scheduler: &crate::conf::Scheduler) -> Self {
        Self::new(item_type_name, scheduler.tasks_page_size, scheduler.fetch_timeout())
    }

    pub fn state(&self) -> PaginationState {
        *self.controller.state()
    }

    /// snapshot of the rendered bar
    pub fn view(&self) -> PaginationView {
        lock(&self.view).clone()
    }

    /// Click on a navigation button. Disabled buttons ignore the click.
    /// Returns whether a navigation was issued.
    pub fn click(&mut self, control: Control) -> bool {
        if !lock(&self.view).is_enabled(control) {
            return false;
        }
        match control {
            Control::First => self.controller.first_page(),
            Control::Previous => self.controller.previous_page(),
            Control::Next => self.controller.next_page(),
            Control::Last => self.controller.last_page(),
            Control::PageNumber => return false,
        }
        true
    }

    /// Enter pressed in the page-number field holding `text` (1-based).
    /// Only a plain 32-bit integer navigates; anything else, padding included, is ignored.
    pub fn submit_page_number(&mut self, text: &str) -> bool {
        if !lock(&self.view).is_enabled(Control::PageNumber) {
            return false;
        }
        match text.parse::<i32>() {
            Ok(page) => {
                self.controller.go_to_page(i64::from(page) - 1);
                true
            },
            Err(_) => false,
        }
    }

    /// A data fetch completed with `total_items` items server-side.
    pub fn items_updated(&mut self, total_items: u64) {
        lock(&self.view).disable_all_controls();
        self.controller.compute_max_page(total_items);
        let state = *self.controller.state();
        lock(&self.view).refresh_labels(&state);
    }

    pub fn page_fetched<T>(&mut self, page: &PagedList<T>) {
        self.items_updated(page.total);
    }

    /// Re-enable navigation when the fetch that followed the last page change
    /// has not reported back within the fetch timeout.
    pub fn check_fetch_timeout(&mut self, now: Instant) -> bool {
        let state = *self.controller.state();
        let mut view = lock(&self.view);
        match view.awaiting_since() {
            Some(since) if now.saturating_duration_since(since) >= self.fetch_timeout => {
                tracing::warn!(page = state.current_page(), "no data received after {:?}, re-enabling pagination", self.fetch_timeout);
                view.enable_pagination_controls(&state);
                true
            },
            _ => false,
        }
    }
}

fn lock(view: &Mutex<PaginationView>) -> MutexGuard<'_, PaginationView> {
    view.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar() -> PaginationBar {
        PaginationBar::new("tasks", 10, Duration::from_secs(30))
    }

    #[test]
    fn test_initial_view() {
        let view = bar().view();
        assert_eq!(view.range_label(), "tasks 0 - 0");
        assert_eq!(view.max_page_label(), "of 0");
        assert!(view.all_disabled());
    }

    #[test]
    fn test_first_middle_last_single_states() {
        let mut bar = bar();
        bar.items_updated(25);
        let view = bar.view();
        assert!(!view.is_enabled(Control::First) && !view.is_enabled(Control::Previous));
        assert!(view.is_enabled(Control::Next) && view.is_enabled(Control::Last));
        assert_eq!(view.range_label(), "tasks 1 - 10");
        assert_eq!(view.max_page_label(), "of 3");

        assert!(bar.click(Control::Next));
        bar.items_updated(25);
        let view = bar.view();
        assert!(view.is_enabled(Control::Previous) && view.is_enabled(Control::Next));

        assert!(bar.click(Control::Last));
        bar.items_updated(25);
        let view = bar.view();
        assert!(view.is_enabled(Control::First) && !view.is_enabled(Control::Last));
        assert_eq!(view.range_label(), "tasks 21 - 25");
        assert_eq!(view.page_text(), "3");

        bar.items_updated(7);
        let view = bar.view();
        assert_eq!(bar.state().current_page(), 0);
        assert!(!view.is_enabled(Control::Previous) && !view.is_enabled(Control::Next));
        assert!(view.is_enabled(Control::PageNumber));
    }

    #[test]
    fn test_empty_listing_disables_everything() {
        let mut bar = bar();
        bar.items_updated(0);
        let view = bar.view();
        assert!(view.all_disabled());
        assert_eq!(view.range_label(), "tasks 0 - 0");
    }

    #[test]
    fn test_navigation_waits_for_fetch() {
        let mut bar = bar();
        bar.items_updated(25);
        assert!(bar.click(Control::Next));
        assert!(bar.view().all_disabled());
        assert!(!bar.click(Control::Next));
        assert_eq!(bar.state().current_page(), 1);
        assert_eq!(bar.view().range_label(), "tasks 11 - 20");

        bar.page_fetched(&PagedList::new(25, 1, 10, vec![(); 10]));
        assert!(bar.click(Control::Next));
        assert_eq!(bar.state().current_page(), 2);
    }

    #[test]
    fn test_page_number_field() {
        let mut bar = bar();
        bar.items_updated(25);
        assert!(!bar.submit_page_number("abc"));
        assert!(!bar.submit_page_number(" 2 "));
        assert!(!bar.submit_page_number("2147483648"));
        assert_eq!(bar.state().current_page(), 0);
        assert!(bar.submit_page_number("+2"));
        assert_eq!(bar.state().current_page(), 1);
        bar.items_updated(25);
        assert!(bar.submit_page_number("99"));
        assert_eq!(bar.state().current_page(), 2);
        bar.items_updated(25);
        assert!(bar.submit_page_number("-4"));
        assert_eq!(bar.state().current_page(), 0);
    }

    #[test]
    fn test_fetch_timeout_reenables_controls() {
        let mut bar = bar();
        bar.items_updated(25);
        assert!(bar.click(Control::Next));
        let since = bar.view().awaiting_since().unwrap();

        assert!(!bar.check_fetch_timeout(since + Duration::from_secs(29)));
        assert!(bar.view().all_disabled());

        assert!(bar.check_fetch_timeout(since + Duration::from_secs(30)));
        let view = bar.view();
        assert!(view.is_enabled(Control::Previous) && view.is_enabled(Control::Next));
        assert!(view.awaiting_since().is_none());
        assert!(!bar.check_fetch_timeout(since + Duration::from_secs(60)));
    }
}
