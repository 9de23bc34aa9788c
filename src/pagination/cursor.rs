//! Cursor paginator

use super::types::{check_stop_condition, NextPage, PageSummary, PaginationState, StopCondition};
use tracing::debug;

/// Follows `nextCursor` from page to page
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorPaginator {
    /// Stop condition
    pub stop_condition: StopCondition,
}

impl CursorPaginator {
    /// Create a new cursor paginator
    pub fn new(stop_condition: StopCondition) -> Self {
        Self { stop_condition }
    }

    /// Record a fetched page and decide where the next one starts
    pub fn process_page(&self, page: &PageSummary<'_>, state: &mut PaginationState) -> NextPage {
        state.add_page(page.records as u64);

        if check_stop_condition(self.stop_condition, page, state).should_stop() {
            state.mark_done();
            return NextPage::Done;
        }

        match page.next_cursor {
            // A repeated cursor would loop forever
            Some(cursor) if !cursor.is_empty() && cursor != state.cursor => {
                debug!(
                    "Page {} done ({} records so far), continuing",
                    state.pages_fetched, state.total_fetched
                );
                state.set_cursor(cursor.to_string());
                NextPage::at(cursor)
            }
            _ => {
                state.mark_done();
                NextPage::Done
            }
        }
    }
}
