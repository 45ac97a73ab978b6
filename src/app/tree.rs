use std::f32::consts::FRAC_PI_2;

use eframe::egui::{self, Align2, Color32, Painter, Pos2, Rect, RichText, Sense, Stroke, Ui, vec2};

use crate::layout::{Point3, RadialLayout};

use super::render_utils::{highlight, mix, with_alpha};
use super::{TreeView, ViewModel};

const INTRO_SECONDS: f64 = 3.0;
const HINT_DELAY_SECONDS: f64 = 2.5;
const INTRO_START_PITCH: f32 = FRAC_PI_2;
const INTRO_START_YAW: f32 = 0.0;
const REST_PITCH: f32 = 0.0;
const REST_YAW: f32 = -FRAC_PI_2;
const MIN_ZOOM: f32 = 0.6;
const MAX_ZOOM: f32 = 1.5;
const NODE_RADIUS: f32 = 0.15;
const HOVER_GROWTH: f32 = 1.2;
const BACKDROP_RINGS: usize = 6;

fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Sphere radius in layout units, smaller for deeper taxa.
fn node_world_radius(depth: usize) -> f32 {
    let scale = (0.4 + (8.0 - depth as f32) * 0.03).max(0.3);
    NODE_RADIUS * scale
}

impl TreeView {
    pub(in crate::app) fn new(layout: RadialLayout, auto_rotate_speed: f32) -> Self {
        let (center, extent) = bounds(&layout);
        Self {
            layout,
            center,
            extent,
            intro_started_at: None,
            intro_done: false,
            hint_dismissed: false,
            yaw: INTRO_START_YAW,
            pitch: INTRO_START_PITCH,
            zoom: 1.0,
            auto_rotate_speed,
        }
    }

    /// Moves the camera for this frame. Returns whether another frame is needed.
    fn advance(&mut self, now: f64, delta_seconds: f32) -> bool {
        if !self.intro_done {
            let started_at = *self.intro_started_at.get_or_insert(now);
            let progress = ((now - started_at) / INTRO_SECONDS) as f32;
            let eased = ease_out_cubic(progress);
            self.pitch = lerp(INTRO_START_PITCH, REST_PITCH, eased);
            self.yaw = lerp(INTRO_START_YAW, REST_YAW, eased);
            if progress >= 1.0 {
                self.intro_done = true;
                log::debug!("tree intro finished");
            }
            return true;
        }

        if self.auto_rotate_speed.abs() > f32::EPSILON {
            self.yaw += self.auto_rotate_speed.to_radians() * delta_seconds;
            return true;
        }
        false
    }

    fn scale(&self, rect: Rect) -> f32 {
        self.zoom * rect.width().min(rect.height()) * 0.45 / self.extent
    }

    /// Orthographic projection. The second value grows away from the viewer.
    fn project(&self, rect: Rect, point: Point3) -> (Pos2, f32) {
        let local = point - self.center;
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();

        let x = local.x * cos_yaw + local.z * sin_yaw;
        let z = local.z * cos_yaw - local.x * sin_yaw;
        let y = local.y * cos_pitch - z * sin_pitch;
        let depth = -(local.y * sin_pitch + z * cos_pitch);

        (rect.center() + vec2(x, -y) * self.scale(rect), depth)
    }

    /// The usage hint shows once the view has been open for a while, until dismissed.
    fn hint_visible(&self, now: f64) -> bool {
        !self.hint_dismissed
            && self
                .intro_started_at
                .is_some_and(|started_at| now - started_at >= HINT_DELAY_SECONDS)
    }

    fn rotate_by_drag(&mut self, delta: egui::Vec2, now: f64) {
        self.intro_started_at.get_or_insert(now);
        self.intro_done = true;
        self.yaw += delta.x * 0.005;
        self.pitch = (self.pitch + delta.y * 0.005).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    fn zoom_by_scroll(&mut self, scroll: f32) {
        let factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }
}

/// Dark fill with faint rings around the tree's axis.
fn draw_backdrop(painter: &Painter, rect: Rect, scale: f32, extent: f32) {
    let inner = Color32::from_rgb(22, 27, 36);
    let outer = Color32::from_rgb(12, 14, 19);
    painter.rect_filled(rect, 0.0, outer);

    let max_radius = extent * scale;
    for ring in (1..=BACKDROP_RINGS).rev() {
        let t = ring as f32 / BACKDROP_RINGS as f32;
        painter.circle_filled(rect.center(), max_radius * t, mix(inner, outer, t));
        painter.circle_stroke(
            rect.center(),
            max_radius * t,
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(80, 96, 120, 40)),
        );
    }
}

/// Center of the bounding box and the largest distance from it.
fn bounds(layout: &RadialLayout) -> (Point3, f32) {
    let Some(first) = layout.nodes.first() else {
        return (Point3::default(), 1.0);
    };

    let (mut min, mut max) = (first.position, first.position);
    for node in &layout.nodes {
        min.x = min.x.min(node.position.x);
        min.y = min.y.min(node.position.y);
        min.z = min.z.min(node.position.z);
        max.x = max.x.max(node.position.x);
        max.y = max.y.max(node.position.y);
        max.z = max.z.max(node.position.z);
    }

    let center = (min + max) / 2.0;
    let extent = layout
        .nodes
        .iter()
        .map(|node| node.position.distance(center))
        .fold(0.0_f32, f32::max);
    (center, extent.max(1.0))
}

impl ViewModel {
    pub(in crate::app) fn draw_tree(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::drag());
        let painter = ui.painter_at(rect);
        draw_backdrop(&painter, rect, self.tree.scale(rect), self.tree.extent);

        let (now, delta_seconds) = ui.input(|input| (input.time, input.stable_dt.min(0.1)));
        if response.dragged() {
            self.tree.rotate_by_drag(response.drag_delta(), now);
        }
        if response.hovered() {
            let scroll = ui.input(|input| input.raw_scroll_delta.y);
            if scroll.abs() > f32::EPSILON {
                self.tree.zoom_by_scroll(scroll);
            }
        }

        if self.tree.advance(now, delta_seconds) || response.dragged() {
            ui.ctx().request_repaint();
        }

        let tree = &self.tree;
        let scale = tree.scale(rect);

        for branch in &tree.layout.branches {
            let (start, _) = tree.project(rect, branch.start);
            let (end, _) = tree.project(rect, branch.end);
            painter.line_segment([start, end], Stroke::new(1.2, with_alpha(branch.color, 190)));
        }

        let mut projected = tree
            .layout
            .nodes
            .iter()
            .map(|node| {
                let (position, depth) = tree.project(rect, node.position);
                let radius = (node_world_radius(node.depth) * scale).max(2.0);
                (node, position, depth, radius)
            })
            .collect::<Vec<_>>();
        projected.sort_by(|a, b| b.2.total_cmp(&a.2));

        let pointer = ui.input(|input| input.pointer.hover_pos());
        let hovered = pointer.and_then(|pointer| {
            projected
                .iter()
                .filter(|(_, position, _, radius)| position.distance(pointer) <= radius + 3.0)
                .min_by(|a, b| a.2.total_cmp(&b.2))
                .map(|(node, ..)| node.name.as_str())
        });

        for (node, position, _, radius) in &projected {
            let base = self.store.taxon_color(&node.name, self.store.palette());
            let is_hovered = hovered == Some(node.name.as_str());
            let (radius, color) = if is_hovered {
                (radius * HOVER_GROWTH, highlight(base, 0.3))
            } else {
                (*radius, base)
            };
            painter.circle_filled(*position, radius, color);
            painter.circle_stroke(
                *position,
                radius,
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 160)),
            );
        }

        if hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }
        self.hovered = hovered.map(|name| self.store.info(name));

        if self.tree.hint_visible(now) {
            self.draw_hint(ui.ctx());
        } else if !self.tree.hint_dismissed {
            ui.ctx().request_repaint();
        }
    }

    fn draw_hint(&mut self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("tree_hint"))
            .anchor(Align2::CENTER_BOTTOM, vec2(0.0, -24.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new("Drag to rotate, scroll to zoom, hover a taxon for details")
                                .color(Color32::from_gray(210)),
                        );
                        if ui.button("Start exploring").clicked() {
                            log::debug!("tree hint dismissed");
                            self.tree.hint_dismissed = true;
                        }
                    });
                });
            });
    }
}
