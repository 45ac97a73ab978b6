use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result, anyhow, bail};
use eframe::egui::Color32;
use serde::Deserialize;

use super::store::{
    GroupHierarchy, Palette, Relation, TaxonGroup, TaxonRecord, TaxonomyStore,
};

const BUILTIN_TAXONOMY: &str = include_str!("../../data/taxonomy.json");
const BUILTIN_RADIAL_SCHEME: &str = include_str!("../../data/radial_scheme.json");

#[derive(Debug, Deserialize)]
struct RawTaxonomy {
    root: String,
    palette: HashMap<TaxonGroup, String>,
    #[serde(default)]
    explorer_palette: Option<HashMap<TaxonGroup, String>>,
    #[serde(default)]
    group_hierarchy: Vec<RawHierarchyRule>,
    taxa: Vec<RawTaxon>,
    #[serde(default)]
    relations: Vec<RawRelation>,
}

#[derive(Debug, Deserialize)]
struct RawHierarchyRule {
    group: TaxonGroup,
    subgroups: Vec<TaxonGroup>,
}

#[derive(Debug, Deserialize)]
struct RawTaxon {
    key: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    group: Option<TaxonGroup>,
    #[serde(default)]
    period: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct RawRelation {
    parent: String,
    children: Vec<String>,
}

/// Curated three-level display subset used by the radial tree.
///
/// Independent of the full relation mapping: the same parent may list
/// different children here.
#[derive(Clone, Debug, Deserialize)]
pub struct RadialScheme {
    pub root: String,
    pub main_groups: Vec<String>,
    #[serde(default)]
    pub sub_levels: Vec<HashMap<String, Vec<String>>>,
}

impl RadialScheme {
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_RADIAL_SCHEME).context("failed to decode built-in radial scheme")
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let mut scheme: RadialScheme =
            serde_json::from_str(raw).context("invalid radial scheme JSON")?;
        if scheme.root.is_empty() {
            bail!("radial scheme root is empty");
        }

        let root = scheme.root.clone();
        scheme.main_groups.retain(|group| group != &root);
        Ok(scheme)
    }

    /// Children configured for `name` at `level` (0 = the first level below the main groups).
    pub fn children_at(&self, level: usize, name: &str) -> &[String] {
        self.sub_levels
            .get(level)
            .and_then(|table| table.get(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl TaxonomyStore {
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_TAXONOMY).context("failed to decode built-in taxonomy")
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let parsed: RawTaxonomy = serde_json::from_str(raw).context("invalid taxonomy JSON")?;

        let mut seen = HashSet::with_capacity(parsed.taxa.len());
        let mut taxa = Vec::with_capacity(parsed.taxa.len());
        let root_group = parsed
            .taxa
            .iter()
            .find(|taxon| taxon.key == parsed.root)
            .and_then(|taxon| taxon.group)
            .unwrap_or_default();

        let palette =
            build_palette(&parsed.palette).context("invalid palette in taxonomy data")?;
        let root_color = palette.get(&root_group).copied().ok_or_else(|| {
            anyhow!("palette has no colour for root group {}", root_group.label())
        })?;
        let explorer_palette = match &parsed.explorer_palette {
            Some(colors) => {
                build_palette(colors).context("invalid explorer palette in taxonomy data")?
            }
            None => palette.clone(),
        };

        for taxon in parsed.taxa {
            if taxon.key.is_empty() {
                bail!("taxon with an empty key");
            }
            if !seen.insert(taxon.key.clone()) {
                bail!("duplicate taxon key {}", taxon.key);
            }

            taxa.push(TaxonRecord {
                display_name: taxon.name.unwrap_or_else(|| taxon.key.clone()),
                group: taxon.group.unwrap_or(root_group),
                period: taxon.period.unwrap_or(0),
                key: taxon.key,
            });
        }

        let mut parents = HashSet::with_capacity(parsed.relations.len());
        let mut relations = Vec::with_capacity(parsed.relations.len());
        for relation in parsed.relations {
            if !parents.insert(relation.parent.clone()) {
                bail!("relation parent {} is listed twice", relation.parent);
            }

            let mut children_seen = HashSet::with_capacity(relation.children.len());
            let children = relation
                .children
                .into_iter()
                .filter(|child| children_seen.insert(child.clone()))
                .collect();
            relations.push(Relation {
                parent: relation.parent,
                children,
            });
        }

        let hierarchy = GroupHierarchy::new(
            parsed
                .group_hierarchy
                .into_iter()
                .map(|rule| (rule.group, rule.subgroups))
                .collect(),
        );

        Ok(TaxonomyStore::new(
            parsed.root,
            taxa,
            relations,
            hierarchy,
            Palette::new(palette, root_color),
            Palette::new(explorer_palette, root_color),
        ))
    }
}

fn build_palette(raw: &HashMap<TaxonGroup, String>) -> Result<HashMap<TaxonGroup, Color32>> {
    let mut colors = HashMap::with_capacity(raw.len());
    for (group, hex) in raw {
        let color = parse_hex_color(hex)
            .with_context(|| format!("bad colour for group {}", group.label()))?;
        colors.insert(*group, color);
    }
    Ok(colors)
}

fn parse_hex_color(value: &str) -> Result<Color32> {
    let digits = value
        .strip_prefix('#')
        .ok_or_else(|| anyhow!("colour {value:?} does not start with '#'"))?;
    if digits.len() != 6 || !digits.is_ascii() {
        bail!("colour {value:?} is not in #RRGGBB form");
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .with_context(|| format!("colour {value:?} has a non-hex channel"))
    };

    Ok(Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_taxonomy_decodes() {
        let store = TaxonomyStore::builtin().expect("built-in taxonomy");
        assert_eq!(store.root(), "LUCA");
        assert_eq!(store.root_group(), TaxonGroup::Luca);
        assert_eq!(
            store.children("LUCA"),
            ["Bacteria", "Archaea", "Eukaryota"]
        );
        assert_eq!(store.period_of("Chordata"), -520);
        assert_eq!(store.group_of("Vertebrata"), TaxonGroup::Animalia);
    }

    #[test]
    fn builtin_relations_keep_dataset_order() {
        let store = TaxonomyStore::builtin().expect("built-in taxonomy");
        let parents = store
            .relations()
            .iter()
            .take(4)
            .map(|relation| relation.parent.as_str())
            .collect::<Vec<_>>();
        assert_eq!(parents, ["LUCA", "Bacteria", "Archaea", "Eukaryota"]);
    }

    #[test]
    fn builtin_radial_scheme_skips_root_in_main_groups() {
        let scheme = RadialScheme::builtin().expect("built-in scheme");
        assert_eq!(scheme.main_groups, ["Bacteria", "Archaea", "Eukaryota"]);
        assert_eq!(scheme.sub_levels.len(), 2);
        assert_eq!(scheme.children_at(0, "Eukaryota").len(), 4);
        assert!(scheme.children_at(1, "Alpha").is_empty());
        assert!(scheme.children_at(5, "Bacteria").is_empty());
    }

    #[test]
    fn explorer_palette_falls_back_to_root_colour() {
        let store = TaxonomyStore::builtin().expect("built-in taxonomy");
        assert_eq!(
            store.explorer_palette().color(TaxonGroup::Plantae),
            Color32::from_rgb(0x64, 0x95, 0xED)
        );
        assert_eq!(
            store.palette().color(TaxonGroup::Plantae),
            Color32::from_rgb(0x88, 0xD8, 0xB0)
        );
    }

    #[test]
    fn missing_group_and_period_take_defaults() {
        let raw = r##"{
            "root": "LUCA",
            "palette": { "LUCA": "#6495ED" },
            "taxa": [ { "key": "LUCA" }, { "key": "Orphan" } ],
            "relations": [ { "parent": "LUCA", "children": ["Orphan", "Orphan"] } ]
        }"##;
        let store = TaxonomyStore::from_json(raw).expect("decode");
        let orphan = store.record("Orphan").expect("orphan record");
        assert_eq!(orphan.group, TaxonGroup::Luca);
        assert_eq!(orphan.period, 0);
        assert_eq!(orphan.display_name, "Orphan");
        assert_eq!(store.children("LUCA"), ["Orphan"]);
    }

    #[test]
    fn rejects_duplicate_keys_and_bad_colours() {
        let duplicate = r##"{
            "root": "LUCA",
            "palette": { "LUCA": "#6495ED" },
            "taxa": [ { "key": "LUCA" }, { "key": "LUCA" } ]
        }"##;
        assert!(TaxonomyStore::from_json(duplicate).is_err());

        let bad_colour = r##"{
            "root": "LUCA",
            "palette": { "LUCA": "6495ED" },
            "taxa": [ { "key": "LUCA" } ]
        }"##;
        assert!(TaxonomyStore::from_json(bad_colour).is_err());

        let unknown_group = r##"{
            "root": "LUCA",
            "palette": { "LUCA": "#6495ED" },
            "taxa": [ { "key": "LUCA", "group": "Viruses" } ]
        }"##;
        assert!(TaxonomyStore::from_json(unknown_group).is_err());
    }

    #[test]
    fn parses_hex_colours() {
        assert_eq!(
            parse_hex_color("#FF6B6B").expect("colour"),
            Color32::from_rgb(255, 107, 107)
        );
        assert!(parse_hex_color("#FF6B").is_err());
        assert!(parse_hex_color("#GG0000").is_err());
    }
}
