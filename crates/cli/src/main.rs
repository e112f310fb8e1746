use clap::Parser;
use std::path::PathBuf;

use salesmap_core::human::human_millions;
use salesmap_core::loader::{LoadMsg, Loader, Source};
use salesmap_core::scene::Scene;
use salesmap_core::{color, export, hierarchy, treemap};

#[derive(Parser, Debug)]
#[command(name = "salesmap-cli", about = "Treemap renderer for hierarchical sales datasets")]
struct Args {
    /// Dataset JSON path or http(s) URL
    dataset: String,
    /// Layout width in pixels
    #[arg(long, default_value_t = 960.0)]
    width: f64,
    /// Layout height in pixels
    #[arg(long, default_value_t = 600.0)]
    height: f64,
    /// Write the rendered scene as SVG
    #[arg(long)]
    svg: Option<PathBuf>,
    /// Write the tile table as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Write the scene as JSON
    #[arg(long)]
    json: Option<PathBuf>,
    /// Write a one-page PDF report
    #[arg(long)]
    pdf: Option<PathBuf>,
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("salesmap-cli: {msg}");
    std::process::exit(1);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let args = Args::parse();

    let (tx, rx) = crossbeam_channel::unbounded::<LoadMsg>();
    let loader = Loader::new(Source::parse(&args.dataset));
    std::thread::spawn(move || loader.run(tx));

    let dataset = match rx.recv() {
        Ok(LoadMsg::Done(dataset)) => dataset,
        Ok(LoadMsg::Error(e)) => fail(e),
        Err(_) => fail("loader exited without a result"),
    };

    let tree = hierarchy::build(dataset).unwrap_or_else(|e| fail(e));
    let layout = treemap::layout(&tree, args.width, args.height).unwrap_or_else(|e| fail(e));
    let colors = color::assign(&tree.branches);
    let scene = Scene::compose(&tree, &layout, &colors);

    if let Some(path) = &args.svg {
        if let Err(e) = std::fs::write(path, export::to_svg(&scene)) {
            fail(format!("writing {}: {e}", path.display()));
        }
    }
    if let Some(path) = &args.csv {
        match std::fs::File::create(path) {
            Ok(file) => {
                if let Err(e) = export::to_csv(&scene, file) {
                    fail(format!("writing {}: {e}", path.display()));
                }
            }
            Err(e) => fail(format!("creating {}: {e}", path.display())),
        }
    }
    if let Some(path) = &args.json {
        let json = export::to_json(&scene);
        let pretty = serde_json::to_string_pretty(&json).unwrap_or_else(|e| fail(e));
        if let Err(e) = std::fs::write(path, pretty) {
            fail(format!("writing {}: {e}", path.display()));
        }
    }
    if let Some(path) = &args.pdf {
        if let Err(e) = export::to_pdf(&scene, path) {
            fail(format!("writing {}: {e}", path.display()));
        }
    }

    println!(
        "{}: {} platforms, {} games, {} total sales",
        tree.name,
        tree.branches.len(),
        tree.leaf_count(),
        human_millions(tree.total)
    );
}
