//! Quillpost backend library: domain core, inbound HTTP adapter, and
//! outbound persistence/security adapters for a multi-user blog.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request trace middleware, re-exported for server assembly.
pub use middleware::trace::Trace;
