//! Resource accessor catalog.
//!
//! # Data Flow
//! ```text
//! caller (CLI / UI)
//!     → accessor.rs (list/get/create/update, positions for documents)
//!     → search.rs (fan-out over kinds, joined)
//!     → client::AuthenticatedClient
//! ```
//!
//! # Design Decisions
//! - Filters are forwarded verbatim, never interpreted locally
//! - Typed entities keep unknown upstream fields in a flattened map
//! - Search swallows per-kind failures into empty results

pub mod accessor;
pub mod entities;
pub mod search;
pub mod types;

pub use accessor::Catalog;
pub use entities::{
    Counterparty, Demand, Document, Organization, Position, Product, Resource, Store, Supply,
};
pub use search::{KindResults, SEARCH_LIMIT};
pub use types::{EntityKind, Meta, MetaRef, Page, QueryFilters, UnknownEntityKind};
