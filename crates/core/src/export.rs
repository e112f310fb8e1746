use crate::scene::{
    LegendItem, Scene, LEGEND_ICON, LEGEND_TEXT_X, LEGEND_TEXT_Y, LEGEND_TOP, LEGEND_V_SPACING,
};

pub fn to_csv(scene: &Scene, mut w: impl std::io::Write) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(&mut w);
    writer
        .write_record(["id", "name", "category", "value", "x0", "y0", "x1", "y1"])
        .ok();
    for item in &scene.items {
        writer.write_record([
            item.id.clone(),
            item.name.clone(),
            item.category.clone(),
            item.value.to_string(),
            item.rect.x0.to_string(),
            item.rect.y0.to_string(),
            item.rect.x1.to_string(),
            item.rect.y1.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_json(scene: &Scene) -> serde_json::Value {
    serde_json::json!({
        "width": scene.width,
        "height": scene.height,
        "tiles": scene.items.iter().map(|item| serde_json::json!({
            "id": item.id,
            "name": item.name,
            "category": item.category,
            "value": item.value,
            "color": item.color.hex(),
            "x0": item.rect.x0,
            "y0": item.rect.y0,
            "x1": item.rect.x1,
            "y1": item.rect.y1,
        })).collect::<Vec<_>>(),
        "legend": scene.legend.iter().map(|l| serde_json::json!({
            "name": l.name,
            "color": l.color.hex(),
        })).collect::<Vec<_>>(),
    })
}

fn legend_height(legend: &[LegendItem]) -> f64 {
    legend
        .iter()
        .map(|l| l.y + LEGEND_ICON + LEGEND_V_SPACING)
        .fold(LEGEND_TOP, f64::max)
}

/// Standalone SVG document: the tiles with their stacked labels, then the
/// legend grid below the chart. Output is deterministic for a given scene.
pub fn to_svg(scene: &Scene) -> String {
    use svg::node::element::{Group, Rectangle, Text};
    use svg::Document;

    let total_height = scene.height + legend_height(&scene.legend);
    let mut document = Document::new()
        .set("width", scene.width)
        .set("height", total_height)
        .set("viewBox", (0, 0, scene.width as i32, total_height as i32))
        .set("preserveAspectRatio", "xMinYMid");

    for item in &scene.items {
        let r = &item.rect;
        let mut cell = Group::new().set("transform", format!("translate({},{})", r.x0, r.y0));
        cell = cell.add(
            Rectangle::new()
                .set("id", item.id.clone())
                .set("class", "tile")
                .set("data-name", item.name.clone())
                .set("data-category", item.category.clone())
                .set("data-value", item.value)
                .set("width", r.width())
                .set("height", r.height())
                .set("fill", item.color.hex()),
        );
        for line in &item.lines {
            let text = Text::new("")
                .set("x", line.x)
                .set("y", line.y)
                .set("font-size", "0.65em")
                .set("fill", "white")
                .add(svg::node::Text::new(line.text.clone()));
            cell = cell.add(text);
        }
        document = document.add(cell);
    }

    let mut legend = Group::new()
        .set("id", "legend")
        .set("class", "legend")
        .set("transform", format!("translate(0,{})", scene.height));
    for item in &scene.legend {
        let mut entry = Group::new().set("transform", format!("translate({},{})", item.x, item.y));
        entry = entry.add(
            Rectangle::new()
                .set("class", "legend-item")
                .set("width", LEGEND_ICON)
                .set("height", LEGEND_ICON)
                .set("fill", item.color.hex()),
        );
        entry = entry.add(
            Text::new("")
                .set("x", LEGEND_ICON + LEGEND_TEXT_X)
                .set("y", LEGEND_ICON + LEGEND_TEXT_Y)
                .add(svg::node::Text::new(item.name.clone())),
        );
        legend = legend.add(entry);
    }
    document = document.add(legend);

    document.to_string()
}

/// One-page PDF report: title line, the tile mosaic scaled to fit, legend
/// swatches underneath.
pub fn to_pdf(scene: &Scene, out: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    use printpdf::path::PaintMode;
    use printpdf::*;

    let (page_w, page_h) = (Mm(297.0), Mm(210.0));
    let (doc, page1, layer1) = PdfDocument::new("Salesmap Report", page_w, page_h, "Layer 1");
    let layer = doc.get_page(page1).get_layer(layer1);
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    layer.use_text("Salesmap Report", 14.0, Mm(15.0), Mm(195.0), &font);

    // Fit the scene into the page below the title, preserving aspect.
    let margin = 15.0_f64;
    let avail_w = page_w.0 as f64 - 2.0 * margin;
    let avail_h = 125.0_f64;
    let s = (avail_w / scene.width).min(avail_h / scene.height);
    let top = 185.0_f64;

    for item in &scene.items {
        let r = &item.rect;
        if r.area() <= 0.0 {
            continue;
        }
        layer.set_fill_color(Color::Rgb(Rgb::new(
            item.color.r as f32 / 255.0,
            item.color.g as f32 / 255.0,
            item.color.b as f32 / 255.0,
            None,
        )));
        let rect = Rect::new(
            Mm((margin + r.x0 * s) as f32),
            Mm((top - r.y1 * s) as f32),
            Mm((margin + r.x1 * s) as f32),
            Mm((top - r.y0 * s) as f32),
        )
        .with_mode(PaintMode::Fill);
        layer.add_rect(rect);
    }

    let legend_top = top - scene.height * s - 8.0;
    let mut ly = legend_top;
    let mut lx = margin;
    for (i, item) in scene.legend.iter().enumerate() {
        if i > 0 && i % 4 == 0 {
            lx = margin;
            ly -= 7.0;
        }
        layer.set_fill_color(Color::Rgb(Rgb::new(
            item.color.r as f32 / 255.0,
            item.color.g as f32 / 255.0,
            item.color.b as f32 / 255.0,
            None,
        )));
        layer.add_rect(
            Rect::new(
                Mm(lx as f32),
                Mm((ly - 4.0) as f32),
                Mm((lx + 4.0) as f32),
                Mm(ly as f32),
            )
            .with_mode(PaintMode::Fill),
        );
        layer.use_text(item.name.clone(), 9.0, Mm((lx + 6.0) as f32), Mm((ly - 3.5) as f32), &font);
        lx += 45.0;
    }

    let file = std::fs::File::create(out)?;
    let mut buf = std::io::BufWriter::new(file);
    doc.save(&mut buf)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Branch, Leaf, Tree};
    use crate::scene::Scene;
    use crate::{color, treemap};

    fn scene() -> Scene {
        let tree = Tree {
            name: "games".into(),
            total: 3.0,
            branches: vec![Branch {
                name: "Wii".into(),
                weight: 3.0,
                leaves: vec![
                    Leaf {
                        id: "ws".into(),
                        name: "Wii Sports".into(),
                        category: "Wii".into(),
                        value: 2.0,
                    },
                    Leaf {
                        id: "mk".into(),
                        name: "Mario Kart Wii".into(),
                        category: "Wii".into(),
                        value: 1.0,
                    },
                ],
            }],
        };
        let layout = treemap::layout(&tree, 960.0, 600.0).unwrap();
        let colors = color::assign(&tree.branches);
        Scene::compose(&tree, &layout, &colors)
    }

    #[test]
    fn csv_lists_every_tile() {
        let mut buf = Vec::new();
        to_csv(&scene(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,name,category,value,x0,y0,x1,y1"
        );
        assert_eq!(lines.count(), 2);
        assert!(text.contains("ws,Wii Sports,Wii,2"));
    }

    #[test]
    fn json_carries_geometry_and_colors() {
        let v = to_json(&scene());
        assert_eq!(v["width"], 960.0);
        assert_eq!(v["tiles"].as_array().unwrap().len(), 2);
        assert_eq!(v["tiles"][0]["id"], "ws");
        assert_eq!(v["legend"][0]["color"], "#440154");
    }

    #[test]
    fn svg_keeps_the_dom_contract() {
        let s = to_svg(&scene());
        assert!(s.contains("class=\"tile\""));
        assert!(s.contains("data-name=\"Wii Sports\""));
        assert!(s.contains("data-category=\"Wii\""));
        assert!(s.contains("data-value=\"2\""));
        assert!(s.contains("id=\"legend\""));
        assert!(s.contains("preserveAspectRatio"));
    }

    #[test]
    fn svg_output_is_deterministic() {
        assert_eq!(to_svg(&scene()), to_svg(&scene()));
    }
}
