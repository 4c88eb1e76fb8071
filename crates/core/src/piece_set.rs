//! Ordered, duplicate-free collection of piece handles.
//!
//! Match results, moved-piece lists and pending waves are all `PieceSet`s.
//! Insertion order is kept so that iteration (and therefore the order of
//! visual requests) is deterministic for a given seed.

use std::collections::HashSet;

use crate::types::PieceId;

#[derive(Debug, Clone, Default)]
pub struct PieceSet {
    order: Vec<PieceId>,
    members: HashSet<PieceId>,
}

impl PieceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `id`; returns false if it was already present.
    pub fn insert(&mut self, id: PieceId) -> bool {
        if self.members.insert(id) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, id: PieceId) -> bool {
        self.members.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PieceId> {
        self.order.iter()
    }

    pub fn as_slice(&self) -> &[PieceId] {
        &self.order
    }

    /// Append every member of `other` not already present.
    pub fn union_with(&mut self, other: &PieceSet) {
        for &id in other.iter() {
            self.insert(id);
        }
    }

    /// Union that coalesces "no match" (`None`) with the empty set.
    pub fn union_opt(&mut self, other: Option<&PieceSet>) {
        if let Some(other) = other {
            self.union_with(other);
        }
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }
}

/// Equality is order-sensitive, matching the ordered-set semantics.
impl PartialEq for PieceSet {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for PieceSet {}

impl FromIterator<PieceId> for PieceSet {
    fn from_iter<I: IntoIterator<Item = PieceId>>(iter: I) -> Self {
        let mut set = PieceSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<PieceId> for PieceSet {
    fn extend<I: IntoIterator<Item = PieceId>>(&mut self, iter: I) {
        for id in iter {
            self.insert(id);
        }
    }
}

impl<'a> IntoIterator for &'a PieceSet {
    type Item = &'a PieceId;
    type IntoIter = std::slice::Iter<'a, PieceId>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_rejects_duplicates_and_keeps_order() {
        let mut set = PieceSet::new();
        assert!(set.insert(PieceId(3)));
        assert!(set.insert(PieceId(1)));
        assert!(!set.insert(PieceId(3)));
        assert_eq!(set.as_slice(), &[PieceId(3), PieceId(1)]);
    }

    #[test]
    fn union_appends_only_new_members() {
        let mut a: PieceSet = [PieceId(1), PieceId(2)].into_iter().collect();
        let b: PieceSet = [PieceId(2), PieceId(5)].into_iter().collect();
        a.union_with(&b);
        assert_eq!(a.as_slice(), &[PieceId(1), PieceId(2), PieceId(5)]);
    }

    #[test]
    fn union_opt_treats_none_as_empty() {
        let mut a: PieceSet = [PieceId(1)].into_iter().collect();
        a.union_opt(None);
        assert_eq!(a.len(), 1);
    }
}
