//! Row-to-graph reconstruction.
//!
//! A multi-entity SQL projection returns flat, denormalized rows: each row is
//! an ordered list of decoded sub-objects ("fragments"), one per declared
//! split point, and the same entity can show up in any number of rows. This
//! crate walks those rows back into the nested object graph a selection tree
//! (normally derived from a GraphQL query) asked for, with correct identity:
//! every fragment carrying a given primary key resolves to one canonical
//! instance, and relation collections accumulate onto that instance across
//! rows without duplicating children.
//!
//! The pieces, leaf first:
//!
//! * [`SelectionNode`] — which fields and relations the caller wants.
//! * [`SplitMarkers`] — the per-query declaration of which entity type each
//!   split point carries.
//! * [`MappingCursor`] — the single point of advancement over one row's
//!   `(fragments, markers)` pair.
//! * [`DedupCache`] — primary key to canonical [`Shared`] instance, scoped to
//!   one query execution.
//! * [`EntityMapper`] — the per-entity-shape mapping logic, recursing through
//!   [`MappingContext::map_child`] for nested (including self-referential)
//!   relations.
//! * [`MapperDriver`] — invokes the root mapper once per row and yields the
//!   results lazily.

#![warn(unreachable_pub)]

pub mod context;
pub mod cursor;
pub mod dedup;
pub mod driver;
pub mod error;
pub mod mapper;
pub mod selection;
pub mod split;

pub use context::MappingContext;
pub use cursor::MappingCursor;
pub use dedup::DedupCache;
pub use dedup::Shared;
pub use dedup::shared;
pub use driver::MappedRows;
pub use driver::MapperDriver;
pub use driver::distinct_by_identity;
pub use error::Error;
pub use mapper::EntityMapper;
pub use mapper::attach_unique;
pub use selection::SelectionNode;
pub use split::SplitMarkers;
pub use split::TypeMarker;
