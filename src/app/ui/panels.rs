use eframe::egui::{self, Align, Context, Layout, Vec2};

use crate::layout::RadialLayout;
use crate::taxonomy::{ExplorerFilters, FilterCache, TaxonomyStore};

use super::super::{LaunchOptions, TreeView, ViewMode, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(
        store: TaxonomyStore,
        layout: RadialLayout,
        options: &LaunchOptions,
    ) -> Self {
        let mut filters = ExplorerFilters::new(store.root());
        let mut graph_dirty = false;
        if let Some(root) = &options.root {
            if !store.contains(root) {
                log::warn!("unknown explorer root {root:?}; it will be shown on its own");
            }
            filters.draft.set_root(root.as_str());
            if options.view == ViewMode::Explorer {
                filters.apply();
                graph_dirty = true;
            }
        }

        Self {
            tree: TreeView::new(layout, options.auto_rotate_speed),
            mode: options.view,
            filters,
            filter_cache: FilterCache::default(),
            root_query: String::new(),
            pan: Vec2::ZERO,
            zoom: 1.0,
            live_physics: true,
            show_filters: true,
            graph_dirty,
            graph_cache: None,
            hovered: None,
            store,
        }
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("phylo-atlas");
                    ui.separator();
                    ui.label(format!("root: {}", self.store.root()));
                    ui.label(format!("taxa: {}", self.store.taxon_count()));
                    ui.label(format!("relations: {}", self.store.relation_count()));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let (label, target) = match self.mode {
                            ViewMode::Tree => ("Explore", ViewMode::Explorer),
                            ViewMode::Explorer => ("Back to tree", ViewMode::Tree),
                        };
                        if ui.button(label).clicked() {
                            self.set_mode(target);
                        }
                        if self.mode == ViewMode::Explorer {
                            let toggle = if self.show_filters {
                                "Hide filters"
                            } else {
                                "Show filters"
                            };
                            if ui.button(toggle).clicked() {
                                self.show_filters = !self.show_filters;
                            }
                        }
                    });
                });
            });

        match self.mode {
            ViewMode::Tree => {
                egui::CentralPanel::default().show(ctx, |ui| self.draw_tree(ui));
            }
            ViewMode::Explorer => {
                egui::SidePanel::left("controls")
                    .resizable(true)
                    .default_width(300.0)
                    .show_animated(ctx, self.show_filters, |ui| self.draw_controls(ui));
                egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));
            }
        }

        if let Some(info) = &self.hovered {
            Self::draw_taxon_info(ctx, info);
        }
    }

    fn set_mode(&mut self, mode: ViewMode) {
        if self.mode == mode {
            return;
        }

        log::debug!("switching view to {mode:?}");
        self.mode = mode;
        self.hovered = None;
    }
}
