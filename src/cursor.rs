//! The mapping cursor.
//!
//! One cursor owns the walk over a row's `(fragments, markers)` pair for one
//! mapping invocation, as a single integer position starting at the
//! invocation's offset. All advancement goes through [`take_next`]; no raw
//! iteration primitive ever leaves this module, so a caller cannot
//! double-advance or drift out of step with the split declaration.
//!
//! [`take_next`]: MappingCursor::take_next

use serde_json_bytes::Value;

use crate::error::Error;
use crate::split::SplitMarkers;
use crate::split::TypeMarker;

#[derive(Debug)]
pub struct MappingCursor<'a> {
    fragments: &'a [Value],
    markers: &'a SplitMarkers,
    /// First split point this invocation may consume.
    offset: usize,
    /// Index of the last fragment taken; `None` until the first `take_next`.
    position: Option<usize>,
}

impl<'a> MappingCursor<'a> {
    pub fn new(
        fragments: &'a [Value],
        markers: &'a SplitMarkers,
        offset: usize,
    ) -> Result<Self, Error> {
        if fragments.len() != markers.len() {
            return Err(Error::RowShapeMismatch {
                fragments: fragments.len(),
                markers: markers.len(),
            });
        }
        Ok(Self {
            fragments,
            markers,
            offset,
            position: None,
        })
    }

    /// A child window over the same row, starting at `offset`. The row shape
    /// was validated when the root cursor was built.
    pub(crate) fn windowed(
        fragments: &'a [Value],
        markers: &'a SplitMarkers,
        offset: usize,
    ) -> Self {
        Self {
            fragments,
            markers,
            offset,
            position: None,
        }
    }

    /// Advances by exactly one position and returns the fragment there.
    ///
    /// The returned fragment may be `Value::Null`: the row had no data at that
    /// split point (an outer-joined miss), which still occupies its position.
    ///
    /// A marker mismatch means the split declaration does not agree with what
    /// the mapper expects to consume next. The cursor does not advance in that
    /// case, so "did anything advance" stays observable to the caller.
    pub fn take_next(&mut self, expected: &TypeMarker) -> Result<&'a Value, Error> {
        self.take_indexed(expected).map(|(_, fragment)| fragment)
    }

    pub(crate) fn take_indexed(
        &mut self,
        expected: &TypeMarker,
    ) -> Result<(usize, &'a Value), Error> {
        let index = self.position.map_or(self.offset, |taken| taken + 1);
        let Some(found) = self.markers.get(index) else {
            return Err(Error::SplitExhausted {
                expected: expected.clone(),
            });
        };
        if found != expected {
            return Err(Error::MarkerMismatch {
                expected: expected.clone(),
                found: found.clone(),
                index,
            });
        }
        self.position = Some(index);
        Ok((index, &self.fragments[index]))
    }

    /// Number of fragments this invocation has consumed so far.
    pub fn fragments_consumed(&self) -> usize {
        self.position.map_or(0, |taken| taken + 1 - self.offset)
    }

    /// Index the next `take_next` would read.
    ///
    /// Fails fast when nothing has been taken yet: a child window cannot be
    /// placed before the invocation consumed its own root fragment.
    pub(crate) fn next_index(&self) -> Result<usize, Error> {
        match self.position {
            Some(taken) => Ok(taken + 1),
            None => Err(Error::CursorNotStarted),
        }
    }

    pub(crate) fn fragments(&self) -> &'a [Value] {
        self.fragments
    }

    pub(crate) fn markers(&self) -> &'a SplitMarkers {
        self.markers
    }

    /// Bulk advancement after a child mapping run, relative to the last taken
    /// position.
    pub(crate) fn skip(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        self.position = Some(match self.position {
            Some(taken) => taken + count,
            None => self.offset + count - 1,
        });
    }
}
