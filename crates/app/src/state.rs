use anyhow::Context;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::path::Path;

use salesmap_core::loader::{LoadMsg, Loader, Source, DEFAULT_DATASET_URL};
use salesmap_core::model::Tree;
use salesmap_core::scene::{Scene, Tooltip};
use salesmap_core::viewport::Surfaces;
use salesmap_core::{color, export, treemap};

// Intrinsic coordinate space; layout always runs at this size, only the
// displayed scale tracks the window.
pub const CHART_W: f64 = 960.0;
pub const CHART_H: f64 = 600.0;
pub const LEGEND_W: f64 = 960.0;
pub const LEGEND_H: f64 = 200.0;

pub const CHART_SURFACE: &str = "treemap";
pub const LEGEND_SURFACE: &str = "legend";

pub struct AppState {
    pub source_label: Option<String>,
    pub url_input: String,
    pub load_rx: Option<Receiver<LoadMsg>>,
    pub load_error: Option<String>,
    pub tree: Option<Tree>,
    pub scene: Option<Scene>,
    pub surfaces: Surfaces,
    pub search: String,
    pub tooltip: Option<Tooltip>,
}

impl AppState {
    pub fn new() -> Self {
        let mut surfaces = Surfaces::default();
        surfaces.attach(CHART_SURFACE, CHART_W, CHART_H);
        surfaces.attach(LEGEND_SURFACE, LEGEND_W, LEGEND_H);
        Self {
            source_label: None,
            url_input: DEFAULT_DATASET_URL.to_string(),
            load_rx: None,
            load_error: None,
            tree: None,
            scene: None,
            surfaces,
            search: String::new(),
            tooltip: None,
        }
    }

    pub fn start_load(&mut self, source: Source) {
        self.source_label = Some(source.to_string());
        self.load_error = None;
        self.tree = None;
        self.scene = None;
        self.tooltip = None;

        let (tx, rx): (Sender<LoadMsg>, Receiver<LoadMsg>) = unbounded();
        self.load_rx = Some(rx);

        std::thread::spawn(move || {
            Loader::new(source).run(tx);
        });
    }

    /// Run the full pipeline once for a freshly built tree. The scene is
    /// kept in intrinsic coordinates, so window resizes never require a
    /// recompute.
    pub fn set_tree(&mut self, tree: Tree) {
        match treemap::layout(&tree, CHART_W, CHART_H) {
            Ok(layout) => {
                let colors = color::assign(&tree.branches);
                self.scene = Some(Scene::compose(&tree, &layout, &colors));
                self.tree = Some(tree);
            }
            Err(e) => self.load_error = Some(e.to_string()),
        }
    }

    pub fn export_svg(&self, path: &Path) -> anyhow::Result<()> {
        let scene = self
            .scene
            .as_ref()
            .context("nothing rendered yet")?;
        std::fs::write(path, export::to_svg(scene))
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}
