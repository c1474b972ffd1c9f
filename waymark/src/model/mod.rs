//! Data model for requests and result documents
//!
//! Requests are created by the caller and are read-only to the orchestration
//! core; result documents are produced by runners and accumulated by the
//! per-kind aggregators.

mod document;
mod placemark;
mod request;
mod route;

pub use document::{DocumentRole, ParsedDocument};
pub use placemark::Placemark;
pub use request::{ParseQuery, RouteQuery, SearchQuery};
pub use route::RouteDocument;
