//! Interview question revision tracker.
//!
//! The crate is laid out as a hexagon: [`domain`] holds the rules and the
//! ports, [`inbound`] drives it over HTTP and [`outbound`] supplies storage
//! and password hashing.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
