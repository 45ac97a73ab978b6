use eframe::egui::{self, Align2, Color32, FontId, Painter, Pos2, Sense, Stroke, Ui, vec2};

use super::super::physics::step_physics;
use super::super::render_utils::{highlight, with_alpha};
use super::super::{PhysicsConfig, ViewModel};
use super::Viewport;

const GRID_SPACING: f32 = 80.0;
const MIN_GRID_PIXELS: f32 = 24.0;

/// World spacing of the grid at `zoom`, doubled until lines are far enough apart.
fn grid_spacing(zoom: f32) -> f32 {
    let mut spacing = GRID_SPACING;
    while spacing * zoom < MIN_GRID_PIXELS {
        spacing *= 2.0;
    }
    spacing
}

/// Grid anchored to world coordinates, with the axes through the origin drawn stronger.
fn draw_grid(painter: &Painter, viewport: Viewport) {
    let rect = viewport.rect;
    painter.rect_filled(rect, 0.0, Color32::from_rgb(17, 21, 27));

    let step = grid_spacing(viewport.zoom) * viewport.zoom;
    let origin = viewport.origin();
    let line = |k: i64| {
        if k == 0 {
            Stroke::new(1.2, Color32::from_rgba_unmultiplied(90, 104, 120, 110))
        } else {
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(58, 68, 80, 60))
        }
    };

    let first = ((rect.left() - origin.x) / step).ceil() as i64;
    let last = ((rect.right() - origin.x) / step).floor() as i64;
    for k in first..=last {
        let x = origin.x + k as f32 * step;
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], line(k));
    }

    let first = ((rect.top() - origin.y) / step).ceil() as i64;
    let last = ((rect.bottom() - origin.y) / step).floor() as i64;
    for k in first..=last {
        let y = origin.y + k as f32 * step;
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], line(k));
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        if self.graph_dirty {
            self.rebuild_render_graph();
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        let viewport = Viewport::new(rect, self.pan, self.zoom);
        let zoom = self.zoom;
        draw_grid(&painter, viewport);

        let live_physics = self.live_physics;

        let Some(cache) = self.graph_cache.as_mut() else {
            self.hovered = None;
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Choose filters and press \"Generate graph\".",
                FontId::proportional(15.0),
                Color32::from_gray(200),
            );
            return;
        };

        if live_physics && step_physics(cache, PhysicsConfig::default()) {
            ui.ctx().request_repaint();
        }
        if response.dragged() {
            ui.ctx().request_repaint();
        }

        let screen_positions = cache
            .nodes
            .iter()
            .map(|node| viewport.to_screen(node.world_pos))
            .collect::<Vec<_>>();
        let screen_radii = cache
            .nodes
            .iter()
            .map(|node| (node.base_radius * zoom.powf(0.5)).clamp(3.0, 28.0))
            .collect::<Vec<_>>();
        let visible_indices = (0..cache.nodes.len())
            .filter(|&index| viewport.shows_disc(screen_positions[index], screen_radii[index]))
            .collect::<Vec<_>>();

        let hovered = Self::hovered_index(ui, &visible_indices, &screen_positions, &screen_radii);
        if hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        let line_width = (1.2 * zoom.sqrt()).clamp(0.6, 3.0);
        for edge in &cache.edges {
            let start = screen_positions[edge.source];
            let end = screen_positions[edge.target];
            if !viewport.shows_segment(start, end, 2.5) {
                continue;
            }

            let touches_hovered = hovered.is_some_and(|index| index == edge.source || index == edge.target);
            let (width, color) = if touches_hovered {
                (line_width * 2.0, edge.color)
            } else {
                (line_width, with_alpha(edge.color, 150))
            };
            painter.line_segment([start, end], Stroke::new(width, color));
        }

        for &index in &visible_indices {
            let node = &cache.nodes[index];
            let position = screen_positions[index];
            let radius = screen_radii[index];
            let is_hovered = hovered == Some(index);
            let is_root = cache.root_index == Some(index);

            let color = if is_hovered {
                highlight(node.color, 0.35)
            } else {
                node.color
            };
            painter.circle_filled(position, radius, color);
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(
                    if is_root { 2.0 } else { 1.0 },
                    Color32::from_rgba_unmultiplied(15, 15, 15, 190),
                ),
            );

            if is_hovered || is_root || zoom > 1.2 {
                painter.text(
                    position + vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    &node.label,
                    FontId::proportional(12.0),
                    Color32::from_gray(238),
                );
            }
        }

        self.hovered = hovered.map(|index| self.store.info(&cache.nodes[index].id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_lines_never_crowd_together() {
        assert_eq!(grid_spacing(1.0), GRID_SPACING);
        assert_eq!(grid_spacing(0.25), GRID_SPACING * 2.0);
        assert_eq!(grid_spacing(0.1), GRID_SPACING * 4.0);
        for zoom in [0.1, 0.2, 0.5, 1.0, 3.0, 6.0] {
            assert!(grid_spacing(zoom) * zoom >= MIN_GRID_PIXELS);
        }
    }
}
