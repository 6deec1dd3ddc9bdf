//! FootballVoice backend library: domain model, HTTP adapter, storage
//! adapters and the dashboard client.

pub mod client;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
