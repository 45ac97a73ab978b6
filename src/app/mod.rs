use clap::ValueEnum;
use eframe::egui::{self, Color32, Context, Vec2};

use crate::layout::{Point3, RadialLayout, build_layout};
use crate::taxonomy::{ExplorerFilters, FilterCache, RadialScheme, TaxonInfo, TaxonomyStore};

mod graph;
mod physics;
mod render_utils;
mod tree;
mod ui;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ViewMode {
    #[default]
    Tree,
    Explorer,
}

#[derive(Clone, Debug)]
pub struct LaunchOptions {
    pub view: ViewMode,
    pub root: Option<String>,
    pub auto_rotate_speed: f32,
}

pub struct PhyloApp {
    options: LaunchOptions,
    state: AppState,
}

enum AppState {
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    store: TaxonomyStore,
    mode: ViewMode,
    tree: TreeView,
    filters: ExplorerFilters,
    filter_cache: FilterCache,
    root_query: String,
    pan: Vec2,
    zoom: f32,
    live_physics: bool,
    show_filters: bool,
    graph_dirty: bool,
    graph_cache: Option<RenderGraph>,
    hovered: Option<TaxonInfo>,
}

/// Camera and animation state of the radial tree view.
struct TreeView {
    layout: RadialLayout,
    center: Point3,
    extent: f32,
    intro_started_at: Option<f64>,
    intro_done: bool,
    hint_dismissed: bool,
    yaw: f32,
    pitch: f32,
    zoom: f32,
    auto_rotate_speed: f32,
}

struct RenderGraph {
    nodes: Vec<RenderNode>,
    edges: Vec<RenderEdge>,
    root_index: Option<usize>,
}

struct RenderNode {
    id: String,
    label: String,
    color: Color32,
    world_pos: Vec2,
    velocity: Vec2,
    base_radius: f32,
}

#[derive(Clone, Copy)]
struct RenderEdge {
    source: usize,
    target: usize,
    color: Color32,
}

#[derive(Clone, Copy)]
struct PhysicsConfig {
    repulsion: f32,
    spring_length: f32,
    spring_strength: f32,
    center_pull: f32,
    damping: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            repulsion: 42_000.0,
            spring_length: 70.0,
            spring_strength: 0.02,
            center_pull: 0.0012,
            damping: 0.86,
        }
    }
}

impl PhyloApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, options: LaunchOptions) -> Self {
        let state = Self::load(&options);
        Self { options, state }
    }

    fn load(options: &LaunchOptions) -> AppState {
        match Self::build_view_model(options) {
            Ok(model) => AppState::Ready(Box::new(model)),
            Err(error) => {
                log::error!("failed to load taxonomy: {error:#}");
                AppState::Error(format!("{error:#}"))
            }
        }
    }

    fn build_view_model(options: &LaunchOptions) -> anyhow::Result<ViewModel> {
        let store = TaxonomyStore::builtin()?;
        let scheme = RadialScheme::builtin()?;
        log::info!(
            "loaded taxonomy rooted at {}: {} taxa, {} relations",
            store.root(),
            store.taxon_count(),
            store.relation_count()
        );

        let layout = build_layout(&store, &scheme);
        Ok(ViewModel::new(store, layout, options))
    }
}

impl eframe::App for PhyloApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Ready(model) => model.show(ctx),
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the taxonomy dataset");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::load(&self.options));
                    }
                });
            }
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
