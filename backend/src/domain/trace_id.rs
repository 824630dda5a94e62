//! Correlation identifier for the request being served.
//!
//! Stored in a Tokio task local, so it is visible to everything awaited
//! inside [`TraceId::scope`] and invisible to tasks spawned from it.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use uuid::Uuid;

/// Header echoing the identifier back to clients.
pub const TRACE_ID_HEADER: &str = "trace-id";

tokio::task_local! {
    static CURRENT: TraceId;
}

/// A UUID naming one HTTP request in logs and error bodies.
///
/// # Examples
/// ```
/// use revision_tracker::domain::TraceId;
///
/// assert!(TraceId::from_client(" not a uuid ").is_none());
/// let echoed = TraceId::from_client("6f1c0a52-9a0e-4a43-8c3c-3b2c5c1d7e90");
/// assert_eq!(
///     echoed.map(|id| id.to_string()).as_deref(),
///     Some("6f1c0a52-9a0e-4a43-8c3c-3b2c5c1d7e90"),
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Accept an identifier supplied by the caller, if it is a plain UUID.
    pub fn from_client(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }

    /// The identifier in scope, `None` outside a request.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Await `fut` with `self` as the current identifier.
    pub async fn scope<F: Future>(self, fut: F) -> F::Output {
        CURRENT.scope(self, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::try_parse(s).map(Self)
    }
}
