//! Pagination module
//!
//! Item listings are paged with an opaque `nextCursor`. The first page is
//! requested with the cursor `*`, each response hands back the cursor for the
//! page after it, and the listing ends when no cursor comes back.

mod cursor;
mod types;

pub use cursor::CursorPaginator;
pub use types::{
    check_stop_condition, NextPage, PageSummary, PaginationState, StopCondition, StopResult,
    INITIAL_CURSOR,
};
