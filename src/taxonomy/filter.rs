use std::collections::BTreeSet;

use super::closure::{NameSet, descendants};
use super::project::{ExplorerGraph, project};
use super::store::{GroupHierarchy, TaxonGroup, TaxonomyStore};

/// Selected groups widened by one level of the hierarchy rules.
pub fn expand_groups(
    hierarchy: &GroupHierarchy,
    selected: &BTreeSet<TaxonGroup>,
) -> BTreeSet<TaxonGroup> {
    let mut expanded = selected.clone();
    for (group, subgroups) in hierarchy.rules() {
        if selected.contains(&group) {
            expanded.extend(subgroups.iter().copied());
        }
    }
    expanded
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FilterParams {
    pub root: String,
    pub groups: BTreeSet<TaxonGroup>,
    pub search: String,
}

impl FilterParams {
    pub fn rooted_at(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

pub fn filter_nodes(store: &TaxonomyStore, params: &FilterParams) -> NameSet {
    let root = params.root.as_str();

    let mut visible = descendants(store, root);
    visible.insert(root);

    if !params.groups.is_empty() {
        let groups = expand_groups(store.hierarchy(), &params.groups);
        visible.retain(|name| groups.contains(&store.group_of(name)));
    }

    if !params.search.is_empty() {
        let needle = params.search.to_lowercase();
        visible.retain(|name| name.to_lowercase().contains(&needle));
    }

    // The root survives every filter.
    visible.insert(root);

    log::debug!(
        "filter root={root} groups={:?} search={:?} -> {} nodes",
        params.groups,
        params.search,
        visible.len()
    );
    visible
}

/// Filter inputs as currently edited in the panel, not yet applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterDraft {
    pub root: String,
    pub groups: BTreeSet<TaxonGroup>,
    pub search: String,
}

impl FilterDraft {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            groups: BTreeSet::new(),
            search: String::new(),
        }
    }

    pub fn toggle_group(&mut self, group: TaxonGroup, enabled: bool) {
        if enabled {
            self.groups.insert(group);
        } else {
            self.groups.remove(&group);
        }
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn set_root(&mut self, root: impl Into<String>) {
        self.root = root.into();
    }

    pub fn to_params(&self) -> FilterParams {
        FilterParams {
            groups: self.groups.clone(),
            search: self.search.clone(),
            ..FilterParams::rooted_at(self.root.as_str())
        }
    }
}

/// Editing and applied filter state of the explorer. `applied` is `None`
/// until the first apply and again after a reset; no graph is shown then.
#[derive(Clone, Debug)]
pub struct ExplorerFilters {
    default_root: String,
    pub draft: FilterDraft,
    pub applied: Option<FilterParams>,
}

impl ExplorerFilters {
    pub fn new(default_root: impl Into<String>) -> Self {
        let default_root = default_root.into();
        Self {
            draft: FilterDraft::new(default_root.clone()),
            default_root,
            applied: None,
        }
    }

    pub fn apply(&mut self) -> &FilterParams {
        self.applied.insert(self.draft.to_params())
    }

    pub fn reset(&mut self) {
        self.draft = FilterDraft::new(self.default_root.clone());
        self.applied = None;
    }

    pub fn is_dirty(&self) -> bool {
        self.applied
            .as_ref()
            .is_none_or(|applied| *applied != self.draft.to_params())
    }
}

/// Last projected graph, keyed on the full filter tuple.
#[derive(Debug, Default)]
pub struct FilterCache {
    entry: Option<(FilterParams, ExplorerGraph)>,
}

impl FilterCache {
    pub fn graph(&mut self, store: &TaxonomyStore, params: &FilterParams) -> &ExplorerGraph {
        let stale = self
            .entry
            .as_ref()
            .is_none_or(|(cached, _)| cached != params);
        if stale {
            self.entry = None;
        } else {
            log::debug!("filter cache hit for root {}", params.root);
        }

        let (_, graph) = self.entry.get_or_insert_with(|| {
            let visible = filter_nodes(store, params);
            (
                params.clone(),
                project(store, store.explorer_palette(), &visible),
            )
        });
        graph
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}
