use std::collections::{HashMap, HashSet};

use eframe::egui::Color32;
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub enum TaxonGroup {
    #[default]
    #[serde(rename = "LUCA")]
    Luca,
    Bacteria,
    Archaea,
    Eukaryota,
    Protista,
    Fungi,
    Plantae,
    Animalia,
}

impl TaxonGroup {
    pub fn label(self) -> &'static str {
        match self {
            Self::Luca => "LUCA",
            Self::Bacteria => "Bacteria",
            Self::Archaea => "Archaea",
            Self::Eukaryota => "Eukaryota",
            Self::Protista => "Protista",
            Self::Fungi => "Fungi",
            Self::Plantae => "Plantae",
            Self::Animalia => "Animalia",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TaxonRecord {
    pub key: String,
    pub display_name: String,
    pub group: TaxonGroup,
    pub period: i32,
}

/// Hover record surfaced to the overlay panels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaxonInfo {
    pub name: String,
    pub display_name: String,
    pub group: TaxonGroup,
    pub period: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relation {
    pub parent: String,
    pub children: Vec<String>,
}

/// Group → display colour lookup. Groups without an entry resolve to `fallback`.
#[derive(Clone, Debug)]
pub struct Palette {
    colors: HashMap<TaxonGroup, Color32>,
    fallback: Color32,
}

impl Palette {
    pub fn new(colors: HashMap<TaxonGroup, Color32>, fallback: Color32) -> Self {
        Self { colors, fallback }
    }

    pub fn color(&self, group: TaxonGroup) -> Color32 {
        self.colors.get(&group).copied().unwrap_or(self.fallback)
    }
}

/// Filter-time containment rules: a parent group subsumes its listed sub-groups.
#[derive(Clone, Debug, Default)]
pub struct GroupHierarchy {
    rules: Vec<(TaxonGroup, Vec<TaxonGroup>)>,
}

impl GroupHierarchy {
    pub fn new(rules: Vec<(TaxonGroup, Vec<TaxonGroup>)>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> impl Iterator<Item = (TaxonGroup, &[TaxonGroup])> {
        self.rules
            .iter()
            .map(|(group, subgroups)| (*group, subgroups.as_slice()))
    }
}

#[derive(Clone, Debug)]
pub struct TaxonomyStore {
    root: String,
    root_group: TaxonGroup,
    records: HashMap<String, TaxonRecord>,
    taxon_order: Vec<String>,
    relations: Vec<Relation>,
    relation_index: HashMap<String, usize>,
    hierarchy: GroupHierarchy,
    palette: Palette,
    explorer_palette: Palette,
}

impl TaxonomyStore {
    /// Callers are expected to pass unique taxon keys and unique relation parents;
    /// later duplicates shadow earlier ones in lookups.
    pub fn new(
        root: String,
        taxa: Vec<TaxonRecord>,
        relations: Vec<Relation>,
        hierarchy: GroupHierarchy,
        palette: Palette,
        explorer_palette: Palette,
    ) -> Self {
        let taxon_order = taxa.iter().map(|record| record.key.clone()).collect();
        let records = taxa
            .into_iter()
            .map(|record| (record.key.clone(), record))
            .collect::<HashMap<_, _>>();
        let root_group = records
            .get(&root)
            .map(|record| record.group)
            .unwrap_or_default();
        let relation_index = relations
            .iter()
            .enumerate()
            .map(|(index, relation)| (relation.parent.clone(), index))
            .collect();

        Self {
            root,
            root_group,
            records,
            taxon_order,
            relations,
            relation_index,
            hierarchy,
            palette,
            explorer_palette,
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn root_group(&self) -> TaxonGroup {
        self.root_group
    }

    pub fn hierarchy(&self) -> &GroupHierarchy {
        &self.hierarchy
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn explorer_palette(&self) -> &Palette {
        &self.explorer_palette
    }

    pub fn taxon_count(&self) -> usize {
        self.records.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relations
            .iter()
            .map(|relation| relation.children.len())
            .sum()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name) || self.relation_index.contains_key(name)
    }

    pub fn record(&self, name: &str) -> Option<&TaxonRecord> {
        self.records.get(name)
    }

    pub fn group_of(&self, name: &str) -> TaxonGroup {
        self.record(name)
            .map(|record| record.group)
            .unwrap_or(self.root_group)
    }

    pub fn period_of(&self, name: &str) -> i32 {
        self.record(name).map(|record| record.period).unwrap_or(0)
    }

    /// Children in dataset order; unknown names are leaves.
    pub fn children(&self, name: &str) -> &[String] {
        self.relation_index
            .get(name)
            .and_then(|&index| self.relations.get(index))
            .map(|relation| relation.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_relations(&self, name: &str) -> bool {
        self.relation_index.contains_key(name)
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn taxon_color(&self, name: &str, palette: &Palette) -> Color32 {
        palette.color(self.group_of(name))
    }

    pub fn info(&self, name: &str) -> TaxonInfo {
        TaxonInfo {
            name: name.to_owned(),
            display_name: self
                .record(name)
                .map(|record| record.display_name.clone())
                .unwrap_or_else(|| name.to_owned()),
            group: self.group_of(name),
            period: self.period_of(name),
        }
    }

    /// Known taxon keys in dataset order, followed by relation-only names.
    pub fn taxon_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut names = Vec::with_capacity(self.taxon_order.len());
        let relation_names = self.relations.iter().flat_map(|relation| {
            std::iter::once(relation.parent.as_str())
                .chain(relation.children.iter().map(String::as_str))
        });

        for name in self
            .taxon_order
            .iter()
            .map(String::as_str)
            .chain(relation_names)
        {
            if seen.insert(name) {
                names.push(name);
            }
        }
        names
    }

    /// Distinct groups carried by the dataset's taxa, in first-seen order.
    pub fn groups_in_use(&self) -> Vec<TaxonGroup> {
        let mut groups = Vec::new();
        for key in &self.taxon_order {
            if let Some(record) = self.records.get(key)
                && !groups.contains(&record.group)
            {
                groups.push(record.group);
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::testing::sample_store;

    #[test]
    fn unknown_taxa_default_to_root_group_and_zero_period() {
        let store = sample_store();
        assert_eq!(store.group_of("Unknown"), TaxonGroup::Luca);
        assert_eq!(store.period_of("Unknown"), 0);

        let info = store.info("Unknown");
        assert_eq!(info.display_name, "Unknown");
        assert_eq!(info.group, TaxonGroup::Luca);
    }

    #[test]
    fn records_exist_only_for_dataset_keys() {
        let store = sample_store();
        let luca = store.record("LUCA").expect("LUCA is a dataset key");
        assert_eq!(luca.display_name, "Last Universal Common Ancestor");
        assert_eq!(luca.group, TaxonGroup::Luca);

        // Relation-only names are known taxa but carry no record.
        assert!(store.contains("Proteobacteria"));
        assert!(store.record("Proteobacteria").is_none());
        assert!(store.record("Unknown").is_none());
    }

    #[test]
    fn unknown_taxa_are_leaves() {
        let store = sample_store();
        assert!(store.children("Archaea").is_empty());
        assert!(store.children("Unknown").is_empty());
        assert_eq!(store.children("Eukaryota"), ["Fungi", "Animalia"]);
    }

    #[test]
    fn palette_falls_back_for_missing_groups() {
        let store = sample_store();
        let explorer = store.explorer_palette();
        assert_eq!(
            explorer.color(TaxonGroup::Fungi),
            explorer.color(TaxonGroup::Luca)
        );
        assert_ne!(
            store.palette().color(TaxonGroup::Fungi),
            store.palette().color(TaxonGroup::Luca)
        );
    }

    #[test]
    fn hover_info_uses_key_as_name() {
        let store = sample_store();
        let info = store.info("LUCA");
        assert_eq!(info.name, "LUCA");
        assert_eq!(info.display_name, "Last Universal Common Ancestor");
        assert_eq!(info.period, -3800);
    }

    #[test]
    fn groups_in_use_follow_dataset_order() {
        let store = sample_store();
        assert_eq!(
            store.groups_in_use(),
            vec![
                TaxonGroup::Luca,
                TaxonGroup::Bacteria,
                TaxonGroup::Archaea,
                TaxonGroup::Eukaryota,
                TaxonGroup::Fungi,
                TaxonGroup::Animalia,
            ]
        );
    }

    #[test]
    fn taxon_names_include_relation_only_children() {
        let store = sample_store();
        let names = store.taxon_names();
        assert_eq!(names.first(), Some(&"LUCA"));
        assert!(names.contains(&"Proteobacteria"));
        assert_eq!(
            names.iter().filter(|name| **name == "Bacteria").count(),
            1
        );
    }
}
