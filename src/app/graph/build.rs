use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

use crate::taxonomy::{ExplorerGraph, RenderedNode};
use crate::util::stable_pair;

use super::super::{RenderEdge, RenderGraph, RenderNode, ViewModel};

const NODE_RADIUS: f32 = 8.0;
const SEED_SPREAD: f32 = 160.0;

fn make_render_node(node: &RenderedNode, index: usize, is_root: bool) -> RenderNode {
    let (jx, jy) = stable_pair(&node.id);
    let mut direction = vec2(jx, jy);
    if direction.length_sq() <= 0.0001 {
        let angle = ((index as f32) * 0.618_034 + 0.11) * std::f32::consts::TAU;
        direction = vec2(angle.cos(), angle.sin());
    }

    RenderNode {
        id: node.id.clone(),
        label: node.label.clone(),
        color: node.color,
        world_pos: if is_root {
            Vec2::ZERO
        } else {
            direction * SEED_SPREAD
        },
        velocity: Vec2::ZERO,
        base_radius: NODE_RADIUS * node.size_hint,
    }
}

/// Render graph for `projected`. Nodes already laid out in `prior` keep their
/// position and velocity.
fn render_graph(projected: &ExplorerGraph, root: &str, prior: Option<RenderGraph>) -> RenderGraph {
    let mut prior_nodes = prior
        .map(|cache| {
            cache
                .nodes
                .into_iter()
                .map(|node| (node.id.clone(), node))
                .collect::<HashMap<_, _>>()
        })
        .unwrap_or_default();

    let mut index_by_id = HashMap::with_capacity(projected.nodes.len());
    let nodes = projected
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            index_by_id.insert(node.id.clone(), index);
            match prior_nodes.remove(&node.id) {
                Some(mut kept) => {
                    kept.label = node.label.clone();
                    kept.color = node.color;
                    kept.base_radius = NODE_RADIUS * node.size_hint;
                    kept
                }
                None => make_render_node(node, index, node.id == root),
            }
        })
        .collect::<Vec<_>>();

    let edges = projected
        .links
        .iter()
        .filter_map(|link| {
            let source = *index_by_id.get(&link.source)?;
            let target = *index_by_id.get(&link.target)?;
            (source != target).then_some(RenderEdge {
                source,
                target,
                color: link.color,
            })
        })
        .collect::<Vec<_>>();

    let root_index = index_by_id.get(root).copied();
    RenderGraph {
        nodes,
        edges,
        root_index,
    }
}

impl ViewModel {
    pub(in crate::app) fn rebuild_render_graph(&mut self) {
        self.graph_dirty = false;

        let Some(params) = self.filters.applied.as_ref() else {
            self.graph_cache = None;
            return;
        };

        let projected = self.filter_cache.graph(&self.store, params);
        log::debug!(
            "explorer graph rebuilt: {} nodes, {} links",
            projected.node_count(),
            projected.link_count()
        );
        let prior = self.graph_cache.take();
        self.graph_cache = Some(render_graph(projected, &params.root, prior));
    }
}
