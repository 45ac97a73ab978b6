mod app;
mod layout;
mod taxonomy;
mod util;

use clap::Parser;

use app::{LaunchOptions, ViewMode};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// View shown at startup.
    #[arg(long, value_enum, default_value_t = ViewMode::Tree)]
    view: ViewMode,

    /// Initial explorer root. Defaults to the dataset root.
    #[arg(long)]
    root: Option<String>,

    /// Tree view auto-rotation in degrees per second.
    #[arg(long, default_value_t = 1.2)]
    auto_rotate_speed: f32,
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let launch = LaunchOptions {
        view: args.view,
        root: args.root,
        auto_rotate_speed: args.auto_rotate_speed,
    };
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "phylo-atlas",
        options,
        Box::new(move |cc| Ok(Box::new(app::PhyloApp::new(cc, launch)))),
    )
}
