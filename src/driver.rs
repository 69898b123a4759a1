//! The top-level mapping driver.

use std::sync::Arc;

use serde_json_bytes::Value;

use crate::context::MappingContext;
use crate::dedup::Shared;
use crate::error::Error;
use crate::mapper::EntityMapper;
use crate::selection::SelectionNode;
use crate::split::SplitMarkers;

/// Drives the root mapper once per logical row.
///
/// The returned sequence is lazy, forward-only and single-pass: the row source
/// ceasing to produce rows ends it naturally, and restarting means
/// re-supplying the rows. One item per row, absent roots included, and the
/// same canonical instance may be yielded for many rows — collapsing those
/// repeats is the caller's job (see [`distinct_by_identity`]).
///
/// An error aborts the whole run: a contract violation means the query's
/// split declaration does not match its SELECT clause, so every later row
/// would misalign the same way while mutating the dedup caches on top of the
/// failed row's partially-mapped state. The iterator yields the error and
/// then nothing further.
pub struct MapperDriver<'a, M> {
    markers: &'a SplitMarkers,
    selection: &'a SelectionNode,
    mapper: &'a M,
}

impl<M> Clone for MapperDriver<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for MapperDriver<'_, M> {}

impl<'a, M: EntityMapper> MapperDriver<'a, M> {
    pub fn new(markers: &'a SplitMarkers, selection: &'a SelectionNode, mapper: &'a M) -> Self {
        Self {
            markers,
            selection,
            mapper,
        }
    }

    pub fn run<R>(self, rows: R) -> MappedRows<'a, M, R::IntoIter>
    where
        R: IntoIterator<Item = Vec<Value>>,
    {
        MappedRows {
            driver: self,
            rows: rows.into_iter(),
            done: false,
        }
    }

    #[tracing::instrument(skip_all, level = "trace")]
    fn map_row(&self, row: &[Value]) -> Result<Option<M::Entity>, Error> {
        let mut ctx = MappingContext::new(row, self.markers, self.selection)?;
        self.mapper.map(&mut ctx)
    }
}

/// The lazy sequence yielded by [`MapperDriver::run`].
pub struct MappedRows<'a, M, R> {
    driver: MapperDriver<'a, M>,
    rows: R,
    done: bool,
}

impl<'a, M, R> Iterator for MappedRows<'a, M, R>
where
    M: EntityMapper,
    R: Iterator<Item = Vec<Value>>,
{
    type Item = Result<Option<M::Entity>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let row = self.rows.next()?;
        let mapped = self.driver.map_row(&row);
        if mapped.is_err() {
            self.done = true;
        }
        Some(mapped)
    }
}

/// Collapses repeated canonical handles, keeping first occurrences in order.
///
/// Identity is `Arc::ptr_eq`, not value equality: two distinct entities that
/// happen to compare equal stay distinct, while the same instance yielded for
/// many rows collapses to one entry.
pub fn distinct_by_identity<E>(handles: impl IntoIterator<Item = Shared<E>>) -> Vec<Shared<E>> {
    let mut distinct: Vec<Shared<E>> = Vec::new();
    for handle in handles {
        if !distinct.iter().any(|seen| Arc::ptr_eq(seen, &handle)) {
            distinct.push(handle);
        }
    }
    distinct
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json_bytes::json;

    use super::*;
    use crate::dedup::shared;
    use crate::split::TypeMarker;

    #[derive(Debug, PartialEq, Deserialize)]
    struct AuditRow {
        id: u64,
        action: String,
    }

    /// Pass-through shape: no dedup, legitimately-repeated rows map to
    /// separate values.
    struct AuditMapper {
        kind: TypeMarker,
    }

    impl EntityMapper for AuditMapper {
        type Entity = AuditRow;

        fn map(&self, ctx: &mut MappingContext<'_>) -> Result<Option<AuditRow>, Error> {
            ctx.take_root(&self.kind)
        }
    }

    #[test_log::test]
    fn yields_one_item_per_row_including_absent_roots() {
        let markers = SplitMarkers::new(["audit"]);
        let selection = SelectionNode::leaf("audit").with_fields(["id", "action"]);
        let mapper = AuditMapper {
            kind: "audit".into(),
        };
        let rows = vec![
            vec![json!({"id": 1, "action": "login"})],
            vec![Value::Null],
            vec![json!({"id": 1, "action": "login"})],
        ];

        let mapped: Vec<_> = MapperDriver::new(&markers, &selection, &mapper)
            .run(rows)
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(
            mapped,
            [
                Some(AuditRow {
                    id: 1,
                    action: "login".into(),
                }),
                None,
                // A pass-through mapper keeps repeated rows as encountered.
                Some(AuditRow {
                    id: 1,
                    action: "login".into(),
                }),
            ],
        );
    }

    #[test_log::test]
    fn misshapen_row_aborts_that_mapping_run() {
        let markers = SplitMarkers::new(["audit"]);
        let selection = SelectionNode::leaf("audit");
        let mapper = AuditMapper {
            kind: "audit".into(),
        };
        let rows = vec![
            vec![json!({"id": 1, "action": "login"}), Value::Null],
            vec![json!({"id": 2, "action": "logout"})],
        ];

        let mut mapped = MapperDriver::new(&markers, &selection, &mapper).run(rows);
        assert_eq!(
            mapped.next().unwrap().unwrap_err(),
            Error::RowShapeMismatch {
                fragments: 2,
                markers: 1,
            },
        );
        // The run is over: the well-formed row behind the misshapen one is
        // never mapped.
        assert!(mapped.next().is_none());
        assert!(mapped.next().is_none());
    }

    #[test]
    fn distinct_by_identity_collapses_repeats_only() {
        let first = shared(1u64);
        let second = shared(1u64);

        let distinct = distinct_by_identity([
            first.clone(),
            second.clone(),
            first.clone(),
            second.clone(),
        ]);

        assert_eq!(distinct.len(), 2);
        assert!(Arc::ptr_eq(&distinct[0], &first));
        assert!(Arc::ptr_eq(&distinct[1], &second));
    }
}
