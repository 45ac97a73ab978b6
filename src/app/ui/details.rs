use eframe::egui::{self, Align2, Context, RichText, vec2};

use crate::taxonomy::TaxonInfo;

use super::super::ViewModel;

/// Period of appearance, in millions of years relative to the present.
fn format_period(period: i32) -> String {
    match period {
        0 => "present".to_owned(),
        period if period < 0 => format!("{} Ma ago", -period),
        period => format!("+{period} Ma"),
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_taxon_info(ctx: &Context, info: &TaxonInfo) {
        egui::Area::new(egui::Id::new("taxon_info"))
            .anchor(Align2::LEFT_TOP, vec2(16.0, 48.0))
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_max_width(280.0);
                    ui.label(RichText::new(info.name.as_str()).strong());
                    if info.display_name != info.name {
                        ui.label(info.display_name.as_str());
                    }
                    ui.separator();
                    ui.label(format!("Group: {}", info.group.label()));
                    ui.label(format!("Appeared: {}", format_period(info.period)));
                });
            });
    }
}
