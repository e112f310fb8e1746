use eframe::egui::{
    self, Align2, Color32, FontId, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2,
};

use salesmap_core::hierarchy;
use salesmap_core::human::human_millions;
use salesmap_core::loader::{LoadMsg, Source};
use salesmap_core::scene::{
    Tooltip, LEGEND_ICON, LEGEND_TEXT_X, LEGEND_TEXT_Y, TOOLTIP_OPACITY,
};
use salesmap_core::search::fuzzy_score;

use crate::state::{AppState, CHART_SURFACE, LEGEND_SURFACE};

pub fn draw(app: &mut AppState, ctx: &egui::Context) {
    poll_load(app, ctx);

    // Keep repainting while a load is in flight.
    if app.load_rx.is_some() {
        ctx.request_repaint();
    }

    egui::TopBottomPanel::top("top").show(ctx, |ui| {
        top_bar(ui, app);
    });

    let mut hovering = false;
    egui::CentralPanel::default().show(ctx, |ui| {
        if let Some(err) = &app.load_error {
            ui.colored_label(Color32::LIGHT_RED, err.as_str());
            return;
        }
        if app.scene.is_none() {
            if app.load_rx.is_some() {
                ui.label("Loading dataset…");
            } else {
                ui.label("Open a dataset file or fetch the default URL to render.");
            }
            return;
        }

        if let Some(tree) = &app.tree {
            ui.heading(&tree.name);
            ui.label(format!(
                "{} platforms · {} games · {} total sales",
                tree.branches.len(),
                tree.leaf_count(),
                human_millions(tree.total)
            ));
            ui.separator();
        }

        // Both surfaces track the panel width, each through its own entry
        // so their resize handling stays independent.
        let avail = ui.available_width() as f64;
        app.surfaces.resize(CHART_SURFACE, avail);
        app.surfaces.resize(LEGEND_SURFACE, avail);

        egui::ScrollArea::vertical().show(ui, |ui| {
            hovering = draw_treemap(app, ui);
            ui.add_space(8.0);
            draw_legend(app, ui);
        });
    });

    draw_tooltip(app, ctx, hovering);
}

fn top_bar(ui: &mut Ui, app: &mut AppState) {
    ui.horizontal(|ui| {
        if ui.button("Open JSON…").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("JSON", &["json"])
                .pick_file()
            {
                app.start_load(Source::File(path));
            }
        }
        ui.separator();
        ui.label("URL:");
        ui.add(egui::TextEdit::singleline(&mut app.url_input).desired_width(280.0));
        if ui.button("Fetch").clicked() && !app.url_input.trim().is_empty() {
            app.start_load(Source::parse(&app.url_input));
        }
        if ui.button("Data source").clicked() {
            let _ = open::that(app.url_input.trim());
        }
        ui.separator();
        ui.label("Search:");
        ui.text_edit_singleline(&mut app.search);
        ui.separator();
        if ui.button("Export SVG…").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("SVG", &["svg"])
                .save_file()
            {
                if let Err(e) = app.export_svg(&path) {
                    tracing::warn!("SVG export failed: {e:#}");
                }
            }
        }
    });
}

fn poll_load(app: &mut AppState, ctx: &egui::Context) {
    // Take the receiver so we can reassign state while draining it.
    let Some(rx) = app.load_rx.take() else {
        return;
    };
    let mut finished = false;
    while let Ok(msg) = rx.try_recv() {
        match msg {
            LoadMsg::Done(dataset) => {
                match hierarchy::build(dataset) {
                    Ok(tree) => app.set_tree(tree),
                    Err(e) => app.load_error = Some(e.to_string()),
                }
                finished = true;
                break;
            }
            LoadMsg::Error(e) => {
                app.load_error = Some(e);
                finished = true;
                break;
            }
        }
    }
    if !finished {
        app.load_rx = Some(rx);
    } else {
        ctx.request_repaint();
    }
}

/// Paint the tile mosaic through the chart surface's display scale and
/// resolve hover against the intrinsic-space scene. Returns whether a tile
/// is hovered this frame.
fn draw_treemap(app: &mut AppState, ui: &mut Ui) -> bool {
    let Some(scene) = &app.scene else {
        return false;
    };
    let Some(surface) = app.surfaces.get(CHART_SURFACE) else {
        return false;
    };
    let (w, h) = surface.rendered();
    let s = surface.scale() as f32;

    let (response, painter) =
        ui.allocate_painter(Vec2::new(w as f32, h as f32), Sense::hover());
    let origin = response.rect.min;

    let hover_pos = response.hover_pos();
    let hovered = hover_pos.and_then(|p| {
        scene.hit(
            ((p.x - origin.x) / s) as f64,
            ((p.y - origin.y) / s) as f64,
        )
    });

    let searching = !app.search.trim().is_empty();
    for item in &scene.items {
        let r = &item.rect;
        if r.area() <= 0.0 {
            continue;
        }
        let rect = Rect::from_min_max(
            origin + Vec2::new(r.x0 as f32 * s, r.y0 as f32 * s),
            origin + Vec2::new(r.x1 as f32 * s, r.y1 as f32 * s),
        );

        let is_hovered = hovered.map(|h| h.id == item.id).unwrap_or(false);
        let matches = !searching || fuzzy_score(app.search.trim(), &item.name).is_some();
        let mut fill = Color32::from_rgb(item.color.r, item.color.g, item.color.b);
        if is_hovered {
            fill = Color32::from_rgb(
                fill.r().saturating_add(30),
                fill.g().saturating_add(30),
                fill.b().saturating_add(30),
            );
        }
        if !matches {
            fill = fill.linear_multiply(0.25);
        }

        painter.rect_filled(rect, Rounding::ZERO, fill);
        let stroke = if searching && matches {
            Stroke::new(1.5, Color32::WHITE)
        } else {
            Stroke::new(1.0, Color32::from_gray(230))
        };
        painter.rect_stroke(rect, Rounding::ZERO, stroke);

        let text_color = if matches {
            Color32::WHITE
        } else {
            Color32::from_gray(180)
        };
        for line in &item.lines {
            painter.text(
                origin
                    + Vec2::new(
                        (r.x0 + line.x) as f32 * s,
                        (r.y0 + line.y) as f32 * s,
                    ),
                Align2::LEFT_BOTTOM,
                &line.text,
                FontId::proportional(10.0 * s),
                text_color,
            );
        }
    }

    match (hovered, hover_pos) {
        (Some(item), Some(p)) => {
            app.tooltip = Some(Tooltip::for_item(item, p.x as f64, p.y as f64));
            true
        }
        _ => false,
    }
}

fn draw_legend(app: &AppState, ui: &mut Ui) {
    let Some(scene) = &app.scene else {
        return;
    };
    let Some(surface) = app.surfaces.get(LEGEND_SURFACE) else {
        return;
    };
    let (w, h) = surface.rendered();
    let s = surface.scale() as f32;

    let (response, painter) =
        ui.allocate_painter(Vec2::new(w as f32, h as f32), Sense::hover());
    let origin = response.rect.min;

    for item in &scene.legend {
        let icon = Rect::from_min_size(
            origin + Vec2::new(item.x as f32 * s, item.y as f32 * s),
            Vec2::splat(LEGEND_ICON as f32 * s),
        );
        painter.rect_filled(
            icon,
            Rounding::ZERO,
            Color32::from_rgb(item.color.r, item.color.g, item.color.b),
        );
        painter.text(
            origin
                + Vec2::new(
                    (item.x + LEGEND_ICON + LEGEND_TEXT_X) as f32 * s,
                    (item.y + LEGEND_ICON + LEGEND_TEXT_Y) as f32 * s,
                ),
            Align2::LEFT_BOTTOM,
            &item.name,
            FontId::proportional(11.0 * s),
            ui.visuals().text_color(),
        );
    }
}

/// Fade the tooltip in near the pointer while a tile is hovered and back
/// out to zero when the pointer leaves every tile; the opacity animation
/// is the only state that outlives a hover session.
fn draw_tooltip(app: &AppState, ctx: &egui::Context, hovering: bool) {
    let target = if hovering { TOOLTIP_OPACITY } else { 0.0 };
    let opacity = ctx.animate_value_with_time(
        egui::Id::new("tooltip-opacity"),
        target,
        0.15,
    );
    if opacity <= 0.01 {
        return;
    }
    let Some(tip) = &app.tooltip else {
        return;
    };

    let alpha = (opacity * 255.0) as u8;
    let fill = Color32::from_rgba_unmultiplied(tip.color.r, tip.color.g, tip.color.b, alpha);
    let text = Color32::from_rgba_unmultiplied(255, 255, 255, alpha);

    egui::Area::new(egui::Id::new("tooltip"))
        .order(egui::Order::Tooltip)
        .fixed_pos(Pos2::new(tip.x as f32, tip.y as f32))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(fill)
                .rounding(3.0)
                .inner_margin(6.0)
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(format!("Name: {}", tip.name)).color(text));
                    ui.label(
                        egui::RichText::new(format!("Category: {}", tip.category)).color(text),
                    );
                    ui.label(egui::RichText::new(format!("Value: {}", tip.value)).color(text));
                });
        });
}
