//! Status evaluation for the request dispatcher

use reqwest::StatusCode;

/// What the dispatcher does with a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// 2xx: decode the body and return it
    Done,
    /// 404: terminal, but not an error
    NotFound,
    /// 520/521: sleep, then resend with the same token
    Retry,
    /// 401: replace the token, then resend
    Refresh,
    /// Anything else: surface status and body to the caller
    Fatal,
}

/// Map a response status onto the dispatcher's next step
pub fn decide(status: StatusCode) -> Decision {
    match status.as_u16() {
        200..=299 => Decision::Done,
        401 => Decision::Refresh,
        404 => Decision::NotFound,
        520 | 521 => Decision::Retry,
        _ => Decision::Fatal,
    }
}
