use smallvec::SmallVec;

use crate::basic_types::{AllocatedClauseReference, Literal};

/// A single watch registration. Binary and ternary clauses carry their
/// other literal(s) inline so propagation never touches the clause arena for
/// them; generic clauses reference the arena and are identified by which of
/// their two watched positions this entry backs.
#[derive(Debug, Clone, Copy)]
pub(crate) enum WatchEntry {
    Binary { other: Literal },
    Ternary { other_a: Literal, other_b: Literal },
    Clause { reference: AllocatedClauseReference },
}

/// Per-literal watch lists, indexed by [`Literal::index`]. A clause
/// containing literal `l` as one of its watches is registered under
/// `l`'s own list: when `l` is falsified, every entry on `l`'s list names a
/// clause that must be examined (see `PropagationEngine`'s
/// clausal step).
#[derive(Debug, Default)]
pub(crate) struct WatchList {
    watches: Vec<SmallVec<[WatchEntry; 4]>>,
}

impl WatchList {
    pub(crate) fn new() -> Self {
        WatchList { watches: Vec::new() }
    }

    fn ensure_capacity(&mut self, index: usize) {
        if index >= self.watches.len() {
            self.watches.resize_with(index + 1, SmallVec::new);
        }
    }

    pub(crate) fn add_watch(&mut self, watched_literal: Literal, entry: WatchEntry) {
        let index = watched_literal.index();
        self.ensure_capacity(index);
        self.watches[index].push(entry);
    }

    pub(crate) fn watches_for(&self, watched_literal: Literal) -> &[WatchEntry] {
        self.watches
            .get(watched_literal.index())
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Takes ownership of the watch list for `watched_literal`, leaving an
    /// empty list in its place; the propagation loop refills it with the
    /// entries that are still watching this literal after the scan.
    pub(crate) fn take_watches_for(&mut self, watched_literal: Literal) -> SmallVec<[WatchEntry; 4]> {
        let index = watched_literal.index();
        self.ensure_capacity(index);
        std::mem::take(&mut self.watches[index])
    }

    pub(crate) fn set_watches_for(
        &mut self,
        watched_literal: Literal,
        entries: SmallVec<[WatchEntry; 4]>,
    ) {
        let index = watched_literal.index();
        self.ensure_capacity(index);
        self.watches[index] = entries;
    }

    pub(crate) fn remove_clause_watch(
        &mut self,
        watched_literal: Literal,
        reference: AllocatedClauseReference,
    ) {
        let index = watched_literal.index();
        if let Some(list) = self.watches.get_mut(index) {
            list.retain(|entry| !matches!(entry, WatchEntry::Clause { reference: r } if *r == reference));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::PropositionalVariable;

    fn lit(index: u32, positive: bool) -> Literal {
        Literal::new(PropositionalVariable::new(index), positive)
    }

    #[test]
    fn add_and_query_binary_watch() {
        let mut watch_list = WatchList::new();
        let a = lit(1, true);
        let b = lit(2, true);
        watch_list.add_watch(a, WatchEntry::Binary { other: b });
        assert_eq!(watch_list.watches_for(a).len(), 1);
        assert_eq!(watch_list.watches_for(!a).len(), 0);
    }
}
