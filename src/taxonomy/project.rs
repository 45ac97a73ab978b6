use eframe::egui::Color32;

use super::closure::NameSet;
use super::store::{Palette, TaxonGroup, TaxonomyStore};

const DEFAULT_SIZE_HINT: f32 = 1.0;

#[derive(Clone, Debug, PartialEq)]
pub struct RenderedNode {
    pub id: String,
    pub label: String,
    pub group: TaxonGroup,
    pub color: Color32,
    pub size_hint: f32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedLink {
    pub source: String,
    pub target: String,
    pub color: Color32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExplorerGraph {
    pub nodes: Vec<RenderedNode>,
    pub links: Vec<RenderedLink>,
}

impl ExplorerGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }
}

/// Renderable graph over `visible`: one node per member, one link per relation
/// edge whose endpoints are both visible.
pub fn project(store: &TaxonomyStore, palette: &Palette, visible: &NameSet) -> ExplorerGraph {
    if visible.is_empty() {
        return ExplorerGraph::default();
    }

    let nodes = visible
        .iter()
        .map(|name| {
            let group = store.group_of(name);
            RenderedNode {
                id: name.to_owned(),
                label: name.to_owned(),
                group,
                color: palette.color(group),
                size_hint: DEFAULT_SIZE_HINT,
            }
        })
        .collect::<Vec<_>>();

    let mut links = Vec::new();
    for relation in store.relations() {
        if !visible.contains(&relation.parent) {
            continue;
        }

        let color = store.taxon_color(&relation.parent, palette);
        for child in &relation.children {
            if visible.contains(child) {
                links.push(RenderedLink {
                    source: relation.parent.clone(),
                    target: child.clone(),
                    color,
                });
            }
        }
    }

    let graph = ExplorerGraph { nodes, links };
    log::debug!(
        "projected {} nodes and {} links",
        graph.node_count(),
        graph.link_count()
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::filter::{FilterParams, filter_nodes};
    use crate::taxonomy::testing::sample_store;

    fn edges(graph: &ExplorerGraph) -> Vec<(&str, &str)> {
        graph
            .links
            .iter()
            .map(|link| (link.source.as_str(), link.target.as_str()))
            .collect()
    }

    #[test]
    fn keeps_only_edges_inside_the_visible_set() {
        let store = sample_store();
        let visible = ["LUCA", "Bacteria"].into_iter().collect::<NameSet>();
        let graph = project(&store, store.explorer_palette(), &visible);

        assert_eq!(edges(&graph), [("LUCA", "Bacteria")]);
        assert_eq!(graph.links[0].color, Color32::from_rgb(0x64, 0x95, 0xED));
    }

    #[test]
    fn nodes_follow_visible_order_and_palette() {
        let store = sample_store();
        let visible = ["Fungi", "Proteobacteria", "Eukaryota"]
            .into_iter()
            .collect::<NameSet>();
        let graph = project(&store, store.explorer_palette(), &visible);

        let ids = graph
            .nodes
            .iter()
            .map(|node| node.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["Fungi", "Proteobacteria", "Eukaryota"]);

        let root_color = store.explorer_palette().color(TaxonGroup::Luca);
        assert_eq!(graph.nodes[0].group, TaxonGroup::Fungi);
        assert_eq!(graph.nodes[0].color, root_color);
        assert_eq!(graph.nodes[1].group, TaxonGroup::Luca);
        assert_eq!(graph.nodes[2].color, Color32::from_rgb(0x45, 0xB7, 0xD1));
        assert!(graph.nodes.iter().all(|node| node.size_hint == 1.0));

        assert_eq!(edges(&graph), [("Eukaryota", "Fungi")]);
    }

    #[test]
    fn full_view_links_follow_relation_order() {
        let store = sample_store();
        let visible = filter_nodes(&store, &FilterParams::rooted_at("LUCA"));
        let graph = project(&store, store.explorer_palette(), &visible);

        assert_eq!(graph.node_count(), 7);
        assert_eq!(
            edges(&graph),
            [
                ("LUCA", "Bacteria"),
                ("LUCA", "Archaea"),
                ("LUCA", "Eukaryota"),
                ("Bacteria", "Proteobacteria"),
                ("Eukaryota", "Fungi"),
                ("Eukaryota", "Animalia"),
            ]
        );
        for link in &graph.links {
            assert!(visible.contains(&link.source));
            assert!(visible.contains(&link.target));
        }
    }

    #[test]
    fn lone_root_has_no_links() {
        let store = sample_store();
        let visible = filter_nodes(&store, &FilterParams::rooted_at("Archaea"));
        let graph = project(&store, store.explorer_palette(), &visible);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.link_count(), 0);
    }

    #[test]
    fn empty_visible_set_projects_nothing() {
        let store = sample_store();
        let graph = project(&store, store.explorer_palette(), &NameSet::new());
        assert_eq!(graph, ExplorerGraph::default());
        assert_eq!((graph.node_count(), graph.link_count()), (0, 0));
    }
}
