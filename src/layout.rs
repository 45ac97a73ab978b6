use std::collections::HashMap;
use std::ops::{Add, Div, Mul, Sub};

use eframe::egui::Color32;

use crate::taxonomy::{RadialScheme, TaxonomyStore};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Point3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }
}

impl Add for Point3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Point3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Point3 {
    type Output = Self;

    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

/// Placement parameters for one ring of the radial tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelSpec {
    pub radius: f32,
    pub vertical_offset: f32,
    pub fan_degrees: f32,
    /// Centre the fan on the parent's angle instead of starting at it.
    pub centered: bool,
}

pub const ROOT_ORIGIN: Point3 = Point3::new(0.0, -5.0, 0.0);

pub const MAIN_LEVEL: LevelSpec = LevelSpec {
    radius: 2.0,
    vertical_offset: 1.5,
    fan_degrees: 360.0,
    centered: false,
};

pub const SECOND_LEVEL: LevelSpec = LevelSpec {
    radius: 1.0,
    vertical_offset: 1.0,
    fan_degrees: 360.0,
    centered: true,
};

pub const THIRD_LEVEL: LevelSpec = LevelSpec {
    radius: 0.3,
    vertical_offset: 0.5,
    fan_degrees: 360.0,
    centered: true,
};

pub const LEVELS: [LevelSpec; 3] = [MAIN_LEVEL, SECOND_LEVEL, THIRD_LEVEL];

pub const RELAXATION_STRENGTH: f32 = 0.15;
pub const RELAXATION_MIN_DISTANCE: f32 = 2.0;

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    pub name: String,
    pub position: Point3,
    pub depth: usize,
    pub period: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutBranch {
    pub start: Point3,
    pub end: Point3,
    pub parent: String,
    pub child: String,
    pub color: Color32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RadialLayout {
    pub nodes: Vec<LayoutNode>,
    pub branches: Vec<LayoutBranch>,
}

/// An already placed node whose children are about to be fanned out.
#[derive(Clone, Copy, Debug)]
pub struct Anchor<'a> {
    pub name: &'a str,
    pub position: Point3,
    pub angle_degrees: f32,
    pub depth: usize,
}

fn child_angle(level: &LevelSpec, parent_angle: f32, index: usize, count: usize) -> f32 {
    let step = level.fan_degrees / count as f32;
    if level.centered {
        parent_angle + (index as f32 - (count as f32 - 1.0) / 2.0) * step
    } else {
        parent_angle + index as f32 * step
    }
}

fn child_position(parent: Point3, level: &LevelSpec, angle_degrees: f32) -> Point3 {
    let radians = angle_degrees.to_radians();
    Point3::new(
        parent.x + level.radius * radians.cos(),
        parent.y + level.vertical_offset,
        parent.z + level.radius * radians.sin(),
    )
}

/// Places `children` around `parent` and recurses into the scheme's deeper
/// levels. Output is pre-order: each child is followed by its own subtree.
pub fn place_level(
    store: &TaxonomyStore,
    scheme: &RadialScheme,
    parent: Anchor<'_>,
    children: &[String],
) -> (Vec<LayoutNode>, Vec<LayoutBranch>) {
    let Some(level) = LEVELS.get(parent.depth) else {
        return (Vec::new(), Vec::new());
    };

    let mut nodes = Vec::new();
    let mut branches = Vec::new();
    let branch_color = store.taxon_color(parent.name, store.palette());
    let depth = parent.depth + 1;

    for (index, child) in children.iter().enumerate() {
        let angle_degrees = child_angle(level, parent.angle_degrees, index, children.len());
        let position = child_position(parent.position, level, angle_degrees);

        nodes.push(LayoutNode {
            name: child.clone(),
            position,
            depth,
            period: store.period_of(child),
        });
        branches.push(LayoutBranch {
            start: parent.position,
            end: position,
            parent: parent.name.to_owned(),
            child: child.clone(),
            color: branch_color,
        });

        let anchor = Anchor {
            name: child,
            position,
            angle_degrees,
            depth,
        };
        let (sub_nodes, sub_branches) =
            place_level(store, scheme, anchor, scheme.children_at(depth - 1, child));
        nodes.extend(sub_nodes);
        branches.extend(sub_branches);
    }

    (nodes, branches)
}

/// One sweep of pairwise repulsion in the horizontal plane. Pairs closer than
/// `min_distance` are pushed apart by `(min_distance - distance) * strength`;
/// the vertical coordinate is never touched.
pub fn relax(nodes: &mut [LayoutNode], strength: f32, min_distance: f32) {
    let n = nodes.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let delta = nodes[i].position - nodes[j].position;
            let distance = delta.length();
            if distance <= 0.0 || distance >= min_distance {
                continue;
            }

            let push = delta / distance * ((min_distance - distance) * strength);
            nodes[i].position.x += push.x;
            nodes[i].position.z += push.z;
            nodes[j].position.x -= push.x;
            nodes[j].position.z -= push.z;
        }
    }
}

/// Re-points every branch at its endpoints' final positions, dropping branches
/// that name an unplaced node.
pub fn resolve_branches(nodes: &[LayoutNode], branches: Vec<LayoutBranch>) -> Vec<LayoutBranch> {
    let positions = nodes
        .iter()
        .map(|node| (node.name.as_str(), node.position))
        .collect::<HashMap<_, _>>();

    branches
        .into_iter()
        .filter_map(|mut branch| {
            let (Some(&start), Some(&end)) = (
                positions.get(branch.parent.as_str()),
                positions.get(branch.child.as_str()),
            ) else {
                log::warn!(
                    "dropping branch {} -> {}: endpoint not laid out",
                    branch.parent,
                    branch.child
                );
                return None;
            };

            branch.start = start;
            branch.end = end;
            Some(branch)
        })
        .collect()
}

pub fn build_layout(store: &TaxonomyStore, scheme: &RadialScheme) -> RadialLayout {
    let root = Anchor {
        name: &scheme.root,
        position: ROOT_ORIGIN,
        angle_degrees: 0.0,
        depth: 0,
    };

    let mut nodes = vec![LayoutNode {
        name: scheme.root.clone(),
        position: ROOT_ORIGIN,
        depth: 0,
        period: store.period_of(&scheme.root),
    }];
    let (placed, branches) = place_level(store, scheme, root, &scheme.main_groups);
    nodes.extend(placed);

    relax(&mut nodes, RELAXATION_STRENGTH, RELAXATION_MIN_DISTANCE);
    let branches = resolve_branches(&nodes, branches);

    log::info!(
        "radial layout: {} nodes, {} branches",
        nodes.len(),
        branches.len()
    );
    RadialLayout { nodes, branches }
}
