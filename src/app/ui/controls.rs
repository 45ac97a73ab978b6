use eframe::egui::{self, Color32, RichText, Sense, Ui, vec2};

use crate::util::rank_fuzzy;

use super::super::ViewModel;

const ROOT_SUGGESTIONS: usize = 8;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Filters");
        ui.add_space(6.0);

        ui.label(RichText::new("Groups").strong());
        for group in self.store.groups_in_use() {
            ui.horizontal(|ui| {
                let swatch = self.store.explorer_palette().color(group);
                let (rect, _) = ui.allocate_exact_size(vec2(10.0, 10.0), Sense::hover());
                ui.painter().circle_filled(rect.center(), 5.0, swatch);

                let mut enabled = self.filters.draft.groups.contains(&group);
                let mut checkbox = ui.checkbox(&mut enabled, group.label());
                if group == self.store.root_group() {
                    checkbox = checkbox.on_hover_text("Also matches taxa without a group");
                }
                if checkbox.changed() {
                    self.filters.draft.toggle_group(group, enabled);
                }
            });
        }

        ui.separator();
        ui.label(RichText::new("Search").strong());
        let mut search = self.filters.draft.search.clone();
        let edited = ui.add(egui::TextEdit::singleline(&mut search).hint_text("Search a taxon..."));
        if edited.changed() {
            self.filters.draft.set_search(search);
        }

        ui.separator();
        self.draw_root_picker(ui);

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button("Reset").clicked() {
                self.reset_filters();
            }
            let generate = ui.add_enabled(
                self.filters.is_dirty(),
                egui::Button::new("Generate graph"),
            );
            if generate.clicked() {
                self.apply_filters();
            }
        });

        ui.checkbox(&mut self.live_physics, "Live physics");

        if let Some(cache) = &self.graph_cache {
            ui.add_space(8.0);
            ui.label(format!("Nodes shown: {}", cache.nodes.len()));
            ui.label(format!("Links shown: {}", cache.edges.len()));
        }
    }

    fn draw_root_picker(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("Root").strong());
        ui.label(format!("Current: {}", self.filters.draft.root));
        ui.add(
            egui::TextEdit::singleline(&mut self.root_query).hint_text("Find a root taxon..."),
        );

        let mut picked = None;
        for name in rank_fuzzy(self.store.taxon_names(), &self.root_query, ROOT_SUGGESTIONS) {
            let is_current = name == self.filters.draft.root;
            let text = if self.store.has_relations(name) {
                RichText::new(name)
            } else {
                RichText::new(name).color(Color32::from_gray(150))
            };
            if ui.selectable_label(is_current, text).clicked() {
                picked = Some(name.to_owned());
            }
        }

        if let Some(name) = picked {
            log::debug!("explorer root set to {name}");
            self.filters.draft.set_root(name);
            self.root_query.clear();
        }
    }

    fn apply_filters(&mut self) {
        let params = self.filters.apply();
        log::info!(
            "generating graph from {} with {} groups, search {:?}",
            params.root,
            params.groups.len(),
            params.search
        );
        self.graph_dirty = true;
    }

    fn reset_filters(&mut self) {
        self.filters.reset();
        self.filter_cache.invalidate();
        self.root_query.clear();
        self.graph_cache = None;
        self.graph_dirty = false;
        self.hovered = None;
    }
}
