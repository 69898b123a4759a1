//! Mapping contexts.
//!
//! A context is one mapping invocation's view of the row: a cursor over the
//! shared `(fragments, markers)` pair plus the selection node driving which
//! relations get consumed. The driver creates a fresh context per row at the
//! first split point; [`map_child`] creates the narrower sub-context — current
//! offset onward, child selection node — for each nested relation, and owns
//! the parent/child fragment accounting when the child returns.
//!
//! [`map_child`]: MappingContext::map_child

use serde::de::DeserializeOwned;
use serde_json_bytes::Value;

use crate::cursor::MappingCursor;
use crate::error::Error;
use crate::mapper::EntityMapper;
use crate::selection::SelectionNode;
use crate::split::SplitMarkers;
use crate::split::TypeMarker;

#[derive(Debug)]
pub struct MappingContext<'a> {
    cursor: MappingCursor<'a>,
    selection: &'a SelectionNode,
}

impl<'a> MappingContext<'a> {
    /// A root context over one row, starting at the first split point.
    pub fn new(
        fragments: &'a [Value],
        markers: &'a SplitMarkers,
        selection: &'a SelectionNode,
    ) -> Result<Self, Error> {
        Ok(Self {
            cursor: MappingCursor::new(fragments, markers, 0)?,
            selection,
        })
    }

    /// The selection node this invocation maps against.
    pub fn selection(&self) -> &'a SelectionNode {
        self.selection
    }

    /// Whether the caller selected `field` at this level.
    pub fn is_selected(&self, field: &str) -> bool {
        self.selection.is_selected(field)
    }

    /// The subtree for a selected relation, if any.
    pub fn subselection(&self, field: &str) -> Option<&'a SelectionNode> {
        self.selection.field(field)
    }

    /// Pulls the next fragment, which must be declared as `kind`, and decodes
    /// it into the mapper's entity type.
    ///
    /// A null fragment yields `Ok(None)` but still consumes its position,
    /// keeping the walk aligned with the split declaration.
    pub fn take<T: DeserializeOwned>(&mut self, kind: &TypeMarker) -> Result<Option<T>, Error> {
        let (index, fragment) = self.cursor.take_indexed(kind)?;
        if fragment.is_null() {
            return Ok(None);
        }
        serde_json_bytes::from_value(fragment.clone())
            .map(Some)
            .map_err(|err| Error::FragmentDecode {
                kind: kind.clone(),
                index,
                reason: err.to_string(),
            })
    }

    /// Pulls this invocation's root fragment.
    ///
    /// Same cursor discipline as [`take`](Self::take); the separate name keeps
    /// a mapper's step 1 visible at its call site.
    pub fn take_root<T: DeserializeOwned>(&mut self, kind: &TypeMarker) -> Result<Option<T>, Error> {
        self.take(kind)
    }

    /// Pulls the next fragment of `kind` without decoding it. `Value::Null`
    /// means the row had no data at that split point.
    pub fn take_raw(&mut self, kind: &TypeMarker) -> Result<&'a Value, Error> {
        self.cursor.take_next(kind)
    }

    /// Runs `mapper` over a narrower window starting at the next unread split
    /// point, under `selection`, then advances this context past everything
    /// the child consumed.
    ///
    /// All parent/child fragment accounting lives here. The child's window
    /// starts at this cursor's next unread index and the skip below is
    /// relative to its last taken index, so the child's consumed count applies
    /// verbatim: under- or over-skipping cannot be expressed by a caller.
    /// Requesting a child before this invocation took its own root fails fast
    /// with [`Error::CursorNotStarted`].
    pub fn map_child<M: EntityMapper>(
        &mut self,
        mapper: &M,
        selection: &'a SelectionNode,
    ) -> Result<Option<M::Entity>, Error> {
        let offset = self.cursor.next_index()?;
        let mut child = Self {
            cursor: MappingCursor::windowed(self.cursor.fragments(), self.cursor.markers(), offset),
            selection,
        };
        let mapped = mapper.map(&mut child)?;
        let consumed = child.cursor.fragments_consumed();
        tracing::trace!(
            relation = selection.name(),
            consumed,
            "nested mapping run finished"
        );
        self.cursor.skip(consumed);
        Ok(mapped)
    }

    /// Fragments consumed by this invocation so far, child runs included.
    pub fn fragments_consumed(&self) -> usize {
        self.cursor.fragments_consumed()
    }
}
