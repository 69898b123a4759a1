//! Split-point declarations.
//!
//! When the query was built, every join that contributes a sub-object to the
//! flat projection declared a "split point" tagged with the entity type it
//! carries. The resulting ordered tag list mirrors the SELECT clause, not any
//! row's data: it is established once and shared read-only by every row.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use serde_json_bytes::ByteString;

/// The declared entity type of one split point.
///
/// Cheap to clone; compared exactly (case-sensitive), since markers come from
/// the same query-builder bookkeeping on both sides of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeMarker(ByteString);

impl TypeMarker {
    pub fn new(name: impl Into<ByteString>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TypeMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<&str> for TypeMarker {
    fn from(name: &str) -> Self {
        Self(name.into())
    }
}

impl From<String> for TypeMarker {
    fn from(name: String) -> Self {
        Self(name.into())
    }
}

/// The ordered list of split-point types for one query.
///
/// Parallel in length and position to every row's fragment list:
/// `markers.get(i)` states the declared type of `fragments[i]` whether or not
/// that fragment is null for a given row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitMarkers {
    markers: Arc<[TypeMarker]>,
}

impl SplitMarkers {
    pub fn new<I, T>(markers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeMarker>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TypeMarker> {
        self.markers.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeMarker> {
        self.markers.iter()
    }
}

impl FromIterator<TypeMarker> for SplitMarkers {
    fn from_iter<I: IntoIterator<Item = TypeMarker>>(iter: I) -> Self {
        Self {
            markers: iter.into_iter().collect(),
        }
    }
}
