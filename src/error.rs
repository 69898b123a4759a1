//! Mapping errors.

use serde::Serialize;
use thiserror::Error;

use crate::split::TypeMarker;

/// Error types for row-to-graph mapping.
///
/// Every variant is fatal for the current mapping run. Mapping is a pure,
/// deterministic transformation of already-fetched rows, so nothing here is
/// retried: either the query's split declaration does not match what the
/// mappers consume (a contract violation), or an entity cannot be identified
/// for deduplication. Absent data is never an error — a null fragment maps to
/// an absent entity through the normal code path.
#[derive(Error, Debug, Clone, Serialize, Eq, PartialEq)]
pub enum Error {
    /// A row's fragment list does not line up with the split declaration.
    #[error("row carries {fragments} fragments but the split declaration lists {markers} types")]
    RowShapeMismatch {
        /// Number of fragments in the offending row.
        fragments: usize,
        /// Number of declared split points.
        markers: usize,
    },

    /// A mapper asked for a fragment of one type but the split declaration
    /// carries another at that position.
    #[error("expected a '{expected}' fragment at split point {index}, found '{found}'")]
    MarkerMismatch {
        expected: TypeMarker,
        found: TypeMarker,
        /// Position in the split declaration where the disagreement happened.
        index: usize,
    },

    /// A mapper asked for a fragment past the end of the split declaration.
    #[error("no split points left while looking for a '{expected}' fragment")]
    SplitExhausted { expected: TypeMarker },

    /// A nested mapping run was requested before the invocation consumed its
    /// own root fragment.
    #[error("child mapping requested before the root fragment was taken")]
    CursorNotStarted,

    /// A non-null fragment did not decode into the mapper's entity type.
    #[error("could not decode the '{kind}' fragment at split point {index}: {reason}")]
    FragmentDecode {
        kind: TypeMarker,
        index: usize,
        /// The reason the deserialization failed.
        reason: String,
    },

    /// The key extractor returned nothing for an entity that must be
    /// deduplicated.
    #[error("'{kind}' entity has a null primary key and cannot be deduplicated")]
    NullPrimaryKey { kind: TypeMarker },
}
