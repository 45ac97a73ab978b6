use eframe::egui::{Pos2, Rect, Vec2};

mod build;
mod interaction;
mod view;

/// Mapping between explorer world space and the canvas. World origin sits at
/// the canvas centre shifted by `pan`.
#[derive(Clone, Copy, Debug)]
struct Viewport {
    rect: Rect,
    pan: Vec2,
    zoom: f32,
}

impl Viewport {
    fn new(rect: Rect, pan: Vec2, zoom: f32) -> Self {
        Self { rect, pan, zoom }
    }

    fn origin(&self) -> Pos2 {
        self.rect.center() + self.pan
    }

    fn to_screen(&self, world: Vec2) -> Pos2 {
        self.origin() + world * self.zoom
    }

    fn to_world(&self, screen: Pos2) -> Vec2 {
        (screen - self.origin()) / self.zoom
    }

    fn shows_disc(&self, center: Pos2, radius: f32) -> bool {
        self.rect.expand(radius).contains(center)
    }

    /// Whether any part of the segment, thickened by `padding`, lands on the canvas.
    fn shows_segment(&self, start: Pos2, end: Pos2, padding: f32) -> bool {
        let area = self.rect.expand(padding);
        if !area.intersects(Rect::from_two_pos(start, end)) {
            return false;
        }
        if area.contains(start) || area.contains(end) {
            return true;
        }

        let corners = [
            area.left_top(),
            area.right_top(),
            area.right_bottom(),
            area.left_bottom(),
        ];
        (0..4).any(|side| crosses(start, end, corners[side], corners[(side + 1) % 4]))
    }
}

fn turn(a: Pos2, b: Pos2, c: Pos2) -> f32 {
    (b - a).x * (c - a).y - (b - a).y * (c - a).x
}

/// Proper or touching intersection of segments `ab` and `cd`.
fn crosses(a: Pos2, b: Pos2, c: Pos2, d: Pos2) -> bool {
    let (d1, d2) = (turn(c, d, a), turn(c, d, b));
    let (d3, d4) = (turn(a, b, c), turn(a, b, d));
    d1 * d2 <= 0.0 && d3 * d4 <= 0.0
}
