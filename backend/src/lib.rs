//! Linkfolio backend library.
//!
//! A link-in-bio service: authenticated users manage a public profile page
//! listing links; visitors view the page and click links. The crate follows
//! a hexagonal layout — `domain` holds entities, ports, and services;
//! `inbound` maps HTTP onto the driving ports; `outbound` implements the
//! driven ports against MongoDB.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Request tracing middleware, re-exported for server wiring.
pub use middleware::trace::Trace;
