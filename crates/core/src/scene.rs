use crate::color::Rgb;
use crate::model::Tree;
use crate::treemap::{Layout, Rect};

// Label geometry, relative to each tile's origin.
pub const LABEL_X: f64 = 4.0;
pub const LABEL_Y: f64 = 10.0;
pub const LABEL_LEADING: f64 = 12.0;

// Legend grid.
pub const LEGEND_ICON: f64 = 15.0;
pub const LEGEND_H_SPACING: f64 = 120.0;
pub const LEGEND_V_SPACING: f64 = 10.0;
pub const LEGEND_TEXT_X: f64 = 5.0;
pub const LEGEND_TEXT_Y: f64 = -2.0;
pub const LEGEND_PER_ROW: usize = 3;
pub const LEGEND_TOP: f64 = 40.0;

// Tooltip placement relative to the pointer.
pub const TOOLTIP_DX: f64 = 10.0;
pub const TOOLTIP_DY: f64 = -28.0;
pub const TOOLTIP_OPACITY: f32 = 0.9;

#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Everything a drawing surface needs for one tile.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub value: f64,
    pub rect: Rect,
    pub color: Rgb,
    pub lines: Vec<TextLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub name: String,
    pub color: Rgb,
    /// Icon origin on the legend surface.
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub items: Vec<RenderItem>,
    pub legend: Vec<LegendItem>,
}

impl Scene {
    /// Merge geometry, branch colors and leaf metadata into one render
    /// item per leaf, plus the legend grid. Pure; identical input produces
    /// a bit-identical scene.
    pub fn compose(tree: &Tree, layout: &Layout, colors: &[Rgb]) -> Scene {
        let items = layout
            .rects
            .iter()
            .map(|lr| {
                let leaf = &tree.branches[lr.branch].leaves[lr.leaf];
                let lines = split_label(&leaf.name)
                    .into_iter()
                    .enumerate()
                    .map(|(i, text)| TextLine {
                        text,
                        x: LABEL_X,
                        y: LABEL_Y + LABEL_LEADING * i as f64,
                    })
                    .collect();
                RenderItem {
                    id: leaf.id.clone(),
                    name: leaf.name.clone(),
                    category: leaf.category.clone(),
                    value: leaf.value,
                    rect: lr.rect,
                    color: colors[lr.branch],
                    lines,
                }
            })
            .collect();

        let legend = tree
            .branches
            .iter()
            .enumerate()
            .map(|(i, b)| {
                let col = i % LEGEND_PER_ROW;
                let row = i / LEGEND_PER_ROW;
                LegendItem {
                    name: b.name.clone(),
                    color: colors[i],
                    x: col as f64 * LEGEND_H_SPACING,
                    y: LEGEND_TOP + row as f64 * (LEGEND_ICON + LEGEND_V_SPACING),
                }
            })
            .collect();

        Scene {
            width: layout.width,
            height: layout.height,
            items,
            legend,
        }
    }

    /// Tile under the given point in scene coordinates, if any.
    pub fn hit(&self, x: f64, y: f64) -> Option<&RenderItem> {
        self.items.iter().find(|item| item.rect.contains(x, y))
    }
}

/// Split a display name into stacked label lines at word-start boundaries.
///
/// Boundary rule: a new line opens before an ASCII uppercase letter that is
/// not at the start of the name and whose preceding character is not itself
/// uppercase. Uppercase runs ("NES", "XIII") stay together; digits and
/// non-ASCII letters never open a line. Fragments are trimmed and empty
/// ones dropped.
pub fn split_label(name: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for ch in name.chars() {
        let boundary = ch.is_ascii_uppercase() && prev.is_some_and(|p| !p.is_ascii_uppercase());
        if boundary {
            let t = current.trim();
            if !t.is_empty() {
                fragments.push(t.to_string());
            }
            current.clear();
        }
        current.push(ch);
        prev = Some(ch);
    }
    let t = current.trim();
    if !t.is_empty() {
        fragments.push(t.to_string());
    }
    fragments
}

/// Hover tooltip model: content, pointer-relative position and the hovered
/// branch's color. Pure function of (pointer, hovered leaf); the only
/// mutable state downstream is the tooltip element's opacity.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub x: f64,
    pub y: f64,
    pub color: Rgb,
    pub name: String,
    pub category: String,
    pub value: f64,
}

impl Tooltip {
    pub fn for_item(item: &RenderItem, pointer_x: f64, pointer_y: f64) -> Tooltip {
        Tooltip {
            x: pointer_x + TOOLTIP_DX,
            y: pointer_y + TOOLTIP_DY,
            color: item.color,
            name: item.name.clone(),
            category: item.category.clone(),
            value: item.value,
        }
    }

    /// Markup fragment for HTML-ish consumers.
    pub fn html(&self) -> String {
        format!(
            "Name: {} <br /> Category: {} <br /> Value: {}",
            self.name, self.category, self.value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Branch, Leaf, Tree};
    use crate::{color, treemap};

    fn sample_tree() -> Tree {
        let branches = vec![
            Branch {
                name: "PS2".into(),
                weight: 3.0,
                leaves: vec![
                    Leaf {
                        id: "gta".into(),
                        name: "GrandTheftAutoV".into(),
                        category: "PS2".into(),
                        value: 2.0,
                    },
                    Leaf {
                        id: "gt3".into(),
                        name: "Gran Turismo 3".into(),
                        category: "PS2".into(),
                        value: 1.0,
                    },
                ],
            },
            Branch {
                name: "Wii".into(),
                weight: 5.0,
                leaves: vec![Leaf {
                    id: "ws".into(),
                    name: "Wii Sports".into(),
                    category: "Wii".into(),
                    value: 5.0,
                }],
            },
        ];
        Tree {
            name: "games".into(),
            total: 8.0,
            branches,
        }
    }

    fn sample_scene() -> Scene {
        let tree = sample_tree();
        let layout = treemap::layout(&tree, 960.0, 600.0).unwrap();
        let colors = color::assign(&tree.branches);
        Scene::compose(&tree, &layout, &colors)
    }

    #[test]
    fn splits_before_each_new_capitalized_word() {
        assert_eq!(
            split_label("GrandTheftAutoV"),
            ["Grand", "Theft", "Auto", "V"]
        );
    }

    #[test]
    fn uppercase_runs_stay_together() {
        assert_eq!(split_label("NES"), ["NES"]);
        assert_eq!(split_label("FinalFantasyXIII"), ["Final", "Fantasy", "XIII"]);
    }

    #[test]
    fn spaced_names_split_at_words() {
        assert_eq!(split_label("Wii Sports"), ["Wii", "Sports"]);
        assert_eq!(split_label("Gran Turismo 3"), ["Gran", "Turismo 3"]);
    }

    #[test]
    fn lowercase_and_empty_names() {
        assert_eq!(split_label("minecraft"), ["minecraft"]);
        assert!(split_label("").is_empty());
    }

    #[test]
    fn label_lines_stack_with_fixed_leading() {
        let scene = sample_scene();
        let item = scene.items.iter().find(|i| i.id == "gta").unwrap();
        assert_eq!(item.lines.len(), 4);
        for (i, line) in item.lines.iter().enumerate() {
            assert_eq!(line.x, 4.0);
            assert_eq!(line.y, 10.0 + 12.0 * i as f64);
        }
    }

    #[test]
    fn items_carry_branch_colors_and_metadata() {
        let scene = sample_scene();
        let colors = color::assign(&sample_tree().branches);
        for item in &scene.items {
            let expected = if item.category == "PS2" { colors[0] } else { colors[1] };
            assert_eq!(item.color, expected);
        }
        assert_eq!(scene.items.len(), 3);
    }

    #[test]
    fn legend_fills_a_three_column_grid() {
        let tree = sample_tree();
        let mut branches = tree.branches.clone();
        branches.extend(branches.clone());
        let tree = Tree {
            name: "games".into(),
            total: 16.0,
            branches,
        };
        let layout = treemap::layout(&tree, 960.0, 600.0).unwrap();
        let colors = color::assign(&tree.branches);
        let scene = Scene::compose(&tree, &layout, &colors);

        assert_eq!(scene.legend.len(), 4);
        assert_eq!((scene.legend[0].x, scene.legend[0].y), (0.0, 40.0));
        assert_eq!((scene.legend[1].x, scene.legend[1].y), (120.0, 40.0));
        assert_eq!((scene.legend[2].x, scene.legend[2].y), (240.0, 40.0));
        // Second row drops by icon size + vertical spacing.
        assert_eq!((scene.legend[3].x, scene.legend[3].y), (0.0, 65.0));
    }

    #[test]
    fn hit_resolves_shared_edges_to_one_tile() {
        let scene = sample_scene();
        for item in &scene.items {
            let cx = (item.rect.x0 + item.rect.x1) / 2.0;
            let cy = (item.rect.y0 + item.rect.y1) / 2.0;
            assert_eq!(scene.hit(cx, cy).map(|i| i.id.as_str()), Some(item.id.as_str()));
        }
        assert!(scene.hit(-1.0, -1.0).is_none());
        assert!(scene.hit(960.0, 300.0).is_none());
    }

    #[test]
    fn tooltip_sits_near_the_pointer_with_branch_color() {
        let scene = sample_scene();
        let item = &scene.items[0];
        let tip = Tooltip::for_item(item, 100.0, 200.0);
        assert_eq!((tip.x, tip.y), (110.0, 172.0));
        assert_eq!(tip.color, item.color);
        assert_eq!(
            Tooltip::for_item(item, 0.0, 0.0).html(),
            format!(
                "Name: {} <br /> Category: {} <br /> Value: {}",
                item.name, item.category, item.value
            )
        );
    }

    #[test]
    fn full_pipeline_is_idempotent() {
        let a = sample_scene();
        let b = sample_scene();
        assert_eq!(a, b);
    }
}
