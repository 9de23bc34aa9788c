//! Pagination types
//!
//! State and stop conditions shared by the cursor paginator.

/// Cursor that requests the first page of a listing
pub const INITIAL_CURSOR: &str = "*";

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available at this cursor
    Continue {
        /// Value for the `nextCursor` query parameter
        cursor: String,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Create a continuation at `cursor`
    pub fn at(cursor: impl Into<String>) -> Self {
        Self::Continue {
            cursor: cursor.into(),
        }
    }

    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Caller-imposed limits on how far to page.
///
/// An empty page, a missing cursor, or reaching `totalItems` always stops
/// the listing regardless of the condition chosen here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StopCondition {
    /// Page until the listing runs out
    #[default]
    Exhausted,

    /// Stop once at least this many records were fetched
    MaxRecords(u64),

    /// Stop after this many pages
    MaxPages(u32),
}

/// Result of checking a stop condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopResult {
    /// Continue pagination
    Continue,
    /// Stop pagination
    Stop,
}

impl StopResult {
    /// Check if we should stop
    pub fn should_stop(&self) -> bool {
        matches!(self, Self::Stop)
    }
}

/// What a fetched page says about the listing
#[derive(Debug, Clone, Copy, Default)]
pub struct PageSummary<'a> {
    /// Records on this page
    pub records: usize,
    /// Cursor for the following page
    pub next_cursor: Option<&'a str>,
    /// Size of the whole listing, when reported
    pub total_items: Option<u64>,
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    /// Cursor for the next request
    pub cursor: String,
    /// Pages fetched so far
    pub pages_fetched: u32,
    /// Total records fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::starting_at(INITIAL_CURSOR)
    }
}

impl PaginationState {
    /// Create a state positioned at the first page
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state resuming at `cursor`
    pub fn starting_at(cursor: impl Into<String>) -> Self {
        Self {
            cursor: cursor.into(),
            pages_fetched: 0,
            total_fetched: 0,
            done: false,
        }
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Set cursor
    pub fn set_cursor(&mut self, cursor: String) {
        self.cursor = cursor;
    }

    /// Record a fetched page
    pub fn add_page(&mut self, records: u64) {
        self.pages_fetched += 1;
        self.total_fetched += records;
    }
}

/// Check a stop condition after a page was recorded in `state`
pub fn check_stop_condition(
    condition: StopCondition,
    page: &PageSummary<'_>,
    state: &PaginationState,
) -> StopResult {
    if page.records == 0 {
        return StopResult::Stop;
    }

    if let Some(total) = page.total_items {
        if state.total_fetched >= total {
            return StopResult::Stop;
        }
    }

    let limit_reached = match condition {
        StopCondition::Exhausted => false,
        StopCondition::MaxRecords(max) => state.total_fetched >= max,
        StopCondition::MaxPages(max) => state.pages_fetched >= max,
    };

    if limit_reached {
        StopResult::Stop
    } else {
        StopResult::Continue
    }
}
