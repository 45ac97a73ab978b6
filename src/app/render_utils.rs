use eframe::egui::Color32;

/// Per-channel linear mix from `base` toward `target`, alpha included.
pub(super) fn mix(base: Color32, target: Color32, amount: f32) -> Color32 {
    let t = amount.clamp(0.0, 1.0);
    let channel = |from: u8, to: u8| (from as f32 + (to as f32 - from as f32) * t).round() as u8;

    Color32::from_rgba_unmultiplied(
        channel(base.r(), target.r()),
        channel(base.g(), target.g()),
        channel(base.b(), target.b()),
        channel(base.a(), target.a()),
    )
}

/// Hovered nodes are drawn lighter in both views.
pub(super) fn highlight(color: Color32, amount: f32) -> Color32 {
    mix(color, Color32::WHITE, amount)
}

pub(super) fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}
