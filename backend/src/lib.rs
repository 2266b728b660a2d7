//! User registry service library.
//!
//! Hexagonal layout: [`domain`] holds the user model, validation, ports, and
//! the CRUD service; [`inbound`] adapts HTTP onto the driving ports;
//! [`outbound`] implements the repository and metrics ports; [`settings`]
//! loads runtime configuration.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use inbound::http::trace::Trace;
