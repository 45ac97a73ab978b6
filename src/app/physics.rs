use eframe::egui::{Vec2, vec2};

use super::{PhysicsConfig, RenderGraph};

const SOFTENING: f32 = 400.0;
const ROOT_PULL: f32 = 0.02;
const MAX_FORCE: f32 = 220.0;
const MAX_SPEED: f32 = 18.0;

/// One integration step of the explorer layout. Returns whether anything moved.
pub(super) fn step_physics(cache: &mut RenderGraph, config: PhysicsConfig) -> bool {
    let node_count = cache.nodes.len();
    if node_count == 0 {
        return false;
    }

    let mut forces = vec![Vec2::ZERO; node_count];

    for i in 0..node_count {
        for j in (i + 1)..node_count {
            let delta = cache.nodes[i].world_pos - cache.nodes[j].world_pos;
            let distance_sq = delta.length_sq();
            let distance = distance_sq.sqrt();
            let direction = if distance > 0.0001 {
                delta / distance
            } else {
                let angle =
                    ((i as f32) * 0.618_034 + (j as f32) * 0.414_214) * std::f32::consts::TAU;
                vec2(angle.cos(), angle.sin())
            };

            let repulsion = config.repulsion / (distance_sq + SOFTENING);
            forces[i] += direction * repulsion;
            forces[j] -= direction * repulsion;

            let min_distance = (cache.nodes[i].base_radius + cache.nodes[j].base_radius) * 1.6;
            if distance < min_distance {
                let overlap_push = (min_distance - distance) * 0.8;
                forces[i] += direction * overlap_push;
                forces[j] -= direction * overlap_push;
            }
        }
    }

    for edge in &cache.edges {
        let (from, to) = (edge.source, edge.target);
        if from >= node_count || to >= node_count || from == to {
            continue;
        }

        let delta = cache.nodes[from].world_pos - cache.nodes[to].world_pos;
        let distance = delta.length();
        if distance <= 0.0001 {
            continue;
        }

        let correction = delta / distance * (distance - config.spring_length) * config.spring_strength;
        forces[from] -= correction;
        forces[to] += correction;
    }

    for (index, node) in cache.nodes.iter().enumerate() {
        forces[index] -= node.world_pos * config.center_pull;
    }

    if let Some(root_index) = cache.root_index.filter(|index| *index < node_count) {
        forces[root_index] -= cache.nodes[root_index].world_pos * ROOT_PULL;
    }

    let mut moving = false;
    for (node, mut force) in cache.nodes.iter_mut().zip(forces) {
        let force_magnitude = force.length();
        if force_magnitude > MAX_FORCE {
            force = force / force_magnitude * MAX_FORCE;
        }

        let mut velocity = (node.velocity + force * 0.055) * config.damping;
        let speed = velocity.length();
        if speed > MAX_SPEED {
            velocity = velocity / speed * MAX_SPEED;
        }
        if speed < 0.02 && force_magnitude < 0.08 {
            velocity = Vec2::ZERO;
        }

        moving |= velocity != Vec2::ZERO;
        node.velocity = velocity;
        node.world_pos += velocity;
    }
    moving
}

#[cfg(test)]
mod tests {
    use eframe::egui::Color32;

    use super::super::{RenderEdge, RenderNode};
    use super::*;

    fn node(id: &str, x: f32, y: f32) -> RenderNode {
        RenderNode {
            id: id.to_owned(),
            label: id.to_owned(),
            color: Color32::WHITE,
            world_pos: vec2(x, y),
            velocity: Vec2::ZERO,
            base_radius: 8.0,
        }
    }

    fn graph(nodes: Vec<RenderNode>, edges: &[(usize, usize)]) -> RenderGraph {
        RenderGraph {
            nodes,
            edges: edges
                .iter()
                .map(|&(source, target)| RenderEdge {
                    source,
                    target,
                    color: Color32::WHITE,
                })
                .collect(),
            root_index: Some(0),
        }
    }

    #[test]
    fn unlinked_nodes_push_apart() {
        let mut cache = graph(vec![node("a", -5.0, 0.0), node("b", 5.0, 0.0)], &[]);
        assert!(step_physics(&mut cache, PhysicsConfig::default()));
        assert!(cache.nodes[0].world_pos.x < -5.0);
        assert!(cache.nodes[1].world_pos.x > 5.0);
    }

    #[test]
    fn stretched_links_pull_together() {
        let config = PhysicsConfig {
            repulsion: 0.0,
            center_pull: 0.0,
            ..PhysicsConfig::default()
        };
        let mut cache = graph(vec![node("a", 0.0, 0.0), node("b", 400.0, 0.0)], &[(0, 1)]);
        for _ in 0..10 {
            step_physics(&mut cache, config);
        }
        let distance = (cache.nodes[1].world_pos - cache.nodes[0].world_pos).length();
        assert!(distance < 400.0);
    }

    #[test]
    fn coincident_nodes_still_separate() {
        let mut cache = graph(vec![node("a", 0.0, 0.0), node("b", 0.0, 0.0)], &[]);
        step_physics(&mut cache, PhysicsConfig::default());
        assert!(cache.nodes[0].world_pos != cache.nodes[1].world_pos);
    }

    #[test]
    fn empty_graph_is_at_rest() {
        let mut cache = graph(Vec::new(), &[]);
        assert!(!step_physics(&mut cache, PhysicsConfig::default()));
    }
}
