use std::collections::{HashSet, VecDeque};

use super::store::TaxonomyStore;

/// Insertion-ordered set of taxon names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameSet {
    order: Vec<String>,
    members: HashSet<String>,
}

impl NameSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the name was already present.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.members.contains(name) {
            return false;
        }

        self.members.insert(name.to_owned());
        self.order.push(name.to_owned());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.contains(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        let members = &mut self.members;
        self.order.retain(|name| {
            let kept = keep(name);
            if !kept {
                members.remove(name);
            }
            kept
        });
    }
}

impl<'a> FromIterator<&'a str> for NameSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

/// Every taxon reachable from `root` through the relation mapping, in
/// breadth-first order. `root` itself is only included when a cycle leads back to it.
pub fn descendants(store: &TaxonomyStore, root: &str) -> NameSet {
    let mut found = NameSet::new();
    let mut queue = VecDeque::from([root]);

    while let Some(current) = queue.pop_front() {
        for child in store.children(current) {
            if found.insert(child) {
                queue.push_back(child.as_str());
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use eframe::egui::Color32;
    use proptest::prelude::*;

    use super::*;
    use crate::taxonomy::store::{GroupHierarchy, Palette, Relation};
    use crate::taxonomy::testing::sample_store;

    fn names(set: &NameSet) -> Vec<&str> {
        set.iter().collect()
    }

    #[test]
    fn collects_full_closure_in_breadth_first_order() {
        let store = sample_store();
        assert_eq!(
            names(&descendants(&store, "LUCA")),
            [
                "Bacteria",
                "Archaea",
                "Eukaryota",
                "Proteobacteria",
                "Fungi",
                "Animalia"
            ]
        );
    }

    #[test]
    fn inner_node_and_unknown_root() {
        let store = sample_store();
        assert_eq!(names(&descendants(&store, "Bacteria")), ["Proteobacteria"]);
        assert!(descendants(&store, "Unknown").is_empty());
        assert!(descendants(&store, "Archaea").is_empty());
    }

    #[test]
    fn shared_children_are_added_once() {
        let store = store_from_edges(&[(0, 1), (0, 2), (1, 3), (2, 3)], 4);
        let found = descendants(&store, "t0");
        assert_eq!(names(&found), ["t1", "t2", "t3"]);
    }

    #[test]
    fn cycles_terminate() {
        let store = store_from_edges(&[(0, 1), (1, 2), (2, 1)], 3);
        assert_eq!(names(&descendants(&store, "t0")), ["t1", "t2"]);
    }

    #[test]
    fn name_set_retain_keeps_membership_in_sync() {
        let mut set = ["a", "b", "c"].into_iter().collect::<NameSet>();
        set.retain(|name| name != "b");
        assert_eq!(names(&set), ["a", "c"]);
        assert!(!set.contains("b"));
        assert!(set.insert("b"));
        assert_eq!(names(&set), ["a", "c", "b"]);
    }

    fn store_from_edges(edges: &[(usize, usize)], node_count: usize) -> TaxonomyStore {
        let mut children: Vec<Vec<String>> = vec![Vec::new(); node_count];
        for &(from, to) in edges {
            let name = format!("t{to}");
            if !children[from].contains(&name) {
                children[from].push(name);
            }
        }

        let relations = children
            .into_iter()
            .enumerate()
            .filter(|(_, children)| !children.is_empty())
            .map(|(index, children)| Relation {
                parent: format!("t{index}"),
                children,
            })
            .collect();

        let palette = Palette::new(HashMap::new(), Color32::WHITE);
        TaxonomyStore::new(
            "t0".to_owned(),
            Vec::new(),
            relations,
            GroupHierarchy::default(),
            palette.clone(),
            palette,
        )
    }

    fn reachable(store: &TaxonomyStore, root: &str) -> HashSet<String> {
        let mut seen = HashSet::new();
        let mut stack = vec![root.to_owned()];
        while let Some(current) = stack.pop() {
            for child in store.children(&current) {
                if seen.insert(child.clone()) {
                    stack.push(child.clone());
                }
            }
        }
        seen
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn acyclic_closure_matches_reachability(
            raw_edges in proptest::collection::vec((0usize..12, 0usize..12), 0..40)
        ) {
            // Orient every edge from lower to higher index so the graph is a DAG.
            let edges = raw_edges
                .into_iter()
                .filter(|(a, b)| a != b)
                .map(|(a, b)| (a.min(b), a.max(b)))
                .collect::<Vec<_>>();
            let store = store_from_edges(&edges, 12);

            let first = descendants(&store, "t0");
            let second = descendants(&store, "t0");

            prop_assert!(!first.contains("t0"));
            prop_assert_eq!(&first, &second);

            let expected = reachable(&store, "t0");
            prop_assert_eq!(first.len(), expected.len());
            for name in first.iter() {
                prop_assert!(expected.contains(name));
            }
        }
    }
}
