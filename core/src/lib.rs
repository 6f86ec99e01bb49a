//! Recurring-card automation for a Kanban board service.
//!
//! # Overview
//! Lists can name a target list and an interval in a JSON directive embedded
//! in their own name. Each pass re-creates, in the target, every card the
//! source has and the target lacks (matched by name), due `interval` days
//! from now. A second pass moves completed cards into the "Done" list.
//!
//! # Design
//! - `BoardClient` is sans-IO: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse`.
//! - `Transport` executes requests; `UreqTransport` is the blocking
//!   production implementation, tests substitute their own.
//! - `Remote` pairs the two and is what the reconciler and mover talk to.
//! - Nothing is persisted; every pass rebuilds its view from the service.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod mapping;
pub mod mover;
pub mod reconcile;
pub mod remote;
pub mod sync;
pub mod transport;
pub mod types;

pub use client::BoardClient;
pub use config::AppConfig;
pub use error::{ApiError, ConfigError, DirectiveError, Severity};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use mapping::{parse_directive, parse_mappings, Directive};
pub use mover::{move_completed, DONE_LIST_NAME};
pub use reconcile::{due_date, missing_cards, reconcile};
pub use remote::Remote;
pub use sync::{done_all, redo_all, DoneSummary, RedoSummary};
pub use transport::{Transport, UreqTransport};
pub use types::{Board, BoardList, Card, Credentials, ListMapping};
