use super::store::TaxonomyStore;

pub(crate) const SAMPLE_TAXONOMY: &str = r##"{
    "root": "LUCA",
    "palette": {
        "LUCA": "#6495ED",
        "Bacteria": "#FF6B6B",
        "Archaea": "#4ECDC4",
        "Eukaryota": "#45B7D1",
        "Protista": "#96CEB4",
        "Fungi": "#FFEEAD",
        "Plantae": "#88D8B0",
        "Animalia": "#FF9999"
    },
    "explorer_palette": {
        "LUCA": "#6495ED",
        "Bacteria": "#FF6B6B",
        "Archaea": "#4ECDC4",
        "Eukaryota": "#45B7D1"
    },
    "group_hierarchy": [
        { "group": "Eukaryota", "subgroups": ["Protista", "Fungi", "Plantae", "Animalia"] }
    ],
    "taxa": [
        { "key": "LUCA", "name": "Last Universal Common Ancestor", "group": "LUCA", "period": -3800 },
        { "key": "Bacteria", "group": "Bacteria", "period": -3500 },
        { "key": "Archaea", "group": "Archaea", "period": -3500 },
        { "key": "Eukaryota", "group": "Eukaryota", "period": -2100 },
        { "key": "Fungi", "group": "Fungi", "period": -1500 },
        { "key": "Animalia", "group": "Animalia", "period": -600 }
    ],
    "relations": [
        { "parent": "LUCA", "children": ["Bacteria", "Archaea", "Eukaryota"] },
        { "parent": "Bacteria", "children": ["Proteobacteria"] },
        { "parent": "Eukaryota", "children": ["Fungi", "Animalia"] }
    ]
}"##;

pub(crate) fn sample_store() -> TaxonomyStore {
    TaxonomyStore::from_json(SAMPLE_TAXONOMY).expect("sample taxonomy decodes")
}
