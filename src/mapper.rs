//! The per-entity-shape mapping seam.

use crate::context::MappingContext;
use crate::error::Error;

/// Maps one entity, and recursively its selected relations, out of the
/// current cursor window.
///
/// One implementation per concrete entity shape. The set of shapes is closed
/// at build time, so nested relations are ordinary function calls into the
/// child mapper — including a mapper recursing into itself for
/// self-referential relations (a person's supervisor is a person). Recursion
/// terminates naturally: every child window starts strictly after the parent's
/// last taken position, so depth is bounded by the number of split points.
///
/// An implementation must:
///
/// 1. Pull exactly one fragment of its own type first (its root), even when
///    that fragment is null — downstream consumers rely on one-position
///    consumption for an absent root to keep column alignment with the split
///    declaration. On a null root, return `Ok(None)` without touching any
///    relation.
/// 2. Resolve the root through its [`DedupCache`] if it deduplicates;
///    pass-through mappers return the fragment as encountered.
/// 3. Walk its relations in the order they were declared when the query was
///    built (the split order, not the selection tree's order), consuming a
///    fragment only for relations the current selection node actually selects:
///    flat relations via [`MappingContext::take`] plus [`attach_unique`],
///    nested ones via [`MappingContext::map_child`].
///
/// [`DedupCache`]: crate::DedupCache
pub trait EntityMapper {
    /// What a successful mapping yields. Deduplicating mappers return
    /// [`Shared`](crate::Shared) handles; pass-through mappers may return
    /// plain values.
    type Entity;

    fn map(&self, ctx: &mut MappingContext<'_>) -> Result<Option<Self::Entity>, Error>;
}

/// Appends `item` unless `same` says an equivalent child is already attached.
///
/// Relation collections accumulate onto one canonical parent across many rows,
/// and the same child row can repeat; comparing by the child's natural key
/// (say, an email's address) keeps the collection free of structural
/// duplicates. Returns whether the item was appended.
pub fn attach_unique<E>(children: &mut Vec<E>, item: E, same: impl Fn(&E, &E) -> bool) -> bool {
    if children.iter().any(|existing| same(existing, &item)) {
        return false;
    }
    children.push(item);
    true
}
