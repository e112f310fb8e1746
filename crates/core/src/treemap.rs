use std::collections::HashMap;

use crate::error::LayoutError;
use crate::model::Tree;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Half-open containment, so a point on a shared edge resolves to
    /// exactly one rectangle. Zero-area rects contain nothing.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// One laid-out leaf, addressed by branch/leaf index into the source tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafRect {
    pub branch: usize,
    pub leaf: usize,
    pub rect: Rect,
}

/// The full layout result (rects + id lookup).
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    /// One entry per leaf, in branch-then-leaf order.
    pub rects: Vec<LeafRect>,
    /// leaf id -> index into `rects`
    pub by_id: HashMap<String, usize>,
}

/// Squarified treemap over the sorted tree: branches partition the root
/// rectangle proportional to subtree weight, then each branch's leaves
/// partition its rectangle proportional to value. Pure function of the
/// tree and the target dimensions.
pub fn layout(tree: &Tree, width: f64, height: f64) -> Result<Layout, LayoutError> {
    if !(width > 0.0) || !(height > 0.0) {
        return Err(LayoutError::NonPositiveDimensions { width, height });
    }

    let root = Rect {
        x0: 0.0,
        y0: 0.0,
        x1: width,
        y1: height,
    };

    let mut out = Layout {
        width,
        height,
        rects: Vec::with_capacity(tree.leaf_count()),
        by_id: HashMap::with_capacity(tree.leaf_count()),
    };

    let total = tree.total;
    if total <= 0.0 {
        tracing::debug!("tree `{}` has no weight, emitting degenerate layout", tree.name);
    }

    let branch_areas: Vec<f64> = tree
        .branches
        .iter()
        .map(|b| {
            if total > 0.0 {
                b.weight / total * root.area()
            } else {
                0.0
            }
        })
        .collect();
    let branch_rects = squarify(&branch_areas, root);

    for (bi, (branch, brect)) in tree.branches.iter().zip(branch_rects).enumerate() {
        let leaf_areas: Vec<f64> = branch
            .leaves
            .iter()
            .map(|l| {
                if branch.weight > 0.0 {
                    l.value / branch.weight * brect.area()
                } else {
                    0.0
                }
            })
            .collect();
        let leaf_rects = squarify(&leaf_areas, brect);

        for (li, (leaf, rect)) in branch.leaves.iter().zip(leaf_rects).enumerate() {
            out.by_id.insert(leaf.id.clone(), out.rects.len());
            out.rects.push(LeafRect {
                branch: bi,
                leaf: li,
                rect,
            });
        }
    }

    Ok(out)
}

/// Squarified partition following Bruls et al.: grow the current strip
/// while the worst aspect ratio improves, then fix the strip along the
/// shorter side of the remaining rectangle.
///
/// Items are laid out in caller order (the sorted branch order is
/// position-significant, so no internal re-sorting happens here), and
/// zero-weight items stay in place as zero-area rects instead of being
/// filtered out.
fn squarify(areas: &[f64], bounds: Rect) -> Vec<Rect> {
    let n = areas.len();
    let mut rects = vec![
        Rect {
            x0: bounds.x0,
            y0: bounds.y0,
            x1: bounds.x0,
            y1: bounds.y0,
        };
        n
    ];
    if n == 0 || bounds.width() <= 0.0 || bounds.height() <= 0.0 {
        return rects;
    }

    let mut x = bounds.x0;
    let mut y = bounds.y0;
    let mut w = bounds.width();
    let mut h = bounds.height();

    let mut row_start = 0usize;
    let mut row_sum = 0.0_f64;
    let mut row_min = f64::INFINITY;
    let mut row_max = 0.0_f64;
    let mut idx = 0usize;

    while idx < n {
        let a = areas[idx].max(0.0);
        let side = w.min(h);

        // Zero-weight items never worsen the row.
        if a <= 0.0 {
            idx += 1;
            continue;
        }

        let current = worst_aspect(row_min, row_max, row_sum, side);
        let next = worst_aspect(row_min.min(a), row_max.max(a), row_sum + a, side);
        if row_sum <= 0.0 || next <= current {
            row_sum += a;
            row_min = row_min.min(a);
            row_max = row_max.max(a);
            idx += 1;
            continue;
        }

        lay_row(
            areas,
            row_start..idx,
            row_sum,
            false,
            &mut x,
            &mut y,
            &mut w,
            &mut h,
            &mut rects,
        );
        row_start = idx;
        row_sum = 0.0;
        row_min = f64::INFINITY;
        row_max = 0.0;
    }

    if row_start < n {
        lay_row(
            areas,
            row_start..n,
            row_sum,
            true,
            &mut x,
            &mut y,
            &mut w,
            &mut h,
            &mut rects,
        );
    }

    rects
}

/// Place one strip of items and shrink the remaining rectangle. The last
/// positive item of the strip absorbs the length remainder, and the final
/// strip absorbs the remaining thickness, so children partition the parent
/// exactly instead of accumulating rounding drift.
#[allow(clippy::too_many_arguments)]
fn lay_row(
    areas: &[f64],
    range: std::ops::Range<usize>,
    row_sum: f64,
    is_last: bool,
    x: &mut f64,
    y: &mut f64,
    w: &mut f64,
    h: &mut f64,
    rects: &mut [Rect],
) {
    let horizontal = *w <= *h;
    let strip_len = if horizontal { *w } else { *h };
    if strip_len <= 0.0 {
        for i in range {
            rects[i] = Rect {
                x0: *x,
                y0: *y,
                x1: *x,
                y1: *y,
            };
        }
        return;
    }

    let mut thickness = if row_sum > 0.0 { row_sum / strip_len } else { 0.0 };
    if is_last {
        thickness = if horizontal { *h } else { *w };
    }

    let mut lengths: Vec<f64> = range
        .clone()
        .map(|i| {
            let a = areas[i].max(0.0);
            if a > 0.0 && row_sum > 0.0 {
                a / row_sum * strip_len
            } else {
                0.0
            }
        })
        .collect();
    if let Some(last_pos) = lengths.iter().rposition(|&l| l > 0.0) {
        let consumed: f64 = lengths.iter().sum();
        lengths[last_pos] = (lengths[last_pos] + strip_len - consumed).max(0.0);
    }

    let mut offset = 0.0;
    for (k, i) in range.enumerate() {
        let len = lengths[k];
        rects[i] = if horizontal {
            Rect {
                x0: *x + offset,
                y0: *y,
                x1: *x + offset + len,
                y1: *y + thickness,
            }
        } else {
            Rect {
                x0: *x,
                y0: *y + offset,
                x1: *x + thickness,
                y1: *y + offset + len,
            }
        };
        offset += len;
    }

    if horizontal {
        *y += thickness;
        *h = (*h - thickness).max(0.0);
    } else {
        *x += thickness;
        *w = (*w - thickness).max(0.0);
    }
}

fn worst_aspect(min_a: f64, max_a: f64, sum: f64, side: f64) -> f64 {
    if sum <= 0.0 || side <= 0.0 || min_a <= 0.0 || max_a <= 0.0 {
        return f64::MAX;
    }
    let side_sq = side * side;
    let sum_sq = sum * sum;
    ((side_sq * max_a) / sum_sq).max(sum_sq / (side_sq * min_a))
}
