use serde::{Deserialize, Serialize};

use crate::model::Branch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Viridis anchor stops at t = 0, 1/8, ..., 1 (matplotlib reference values).
const VIRIDIS: [[u8; 3]; 9] = [
    [68, 1, 84],
    [72, 40, 120],
    [62, 74, 137],
    [49, 104, 142],
    [38, 130, 142],
    [31, 158, 137],
    [53, 183, 121],
    [110, 206, 88],
    [253, 231, 37],
];

/// Sample the Viridis gradient at `t` in [0, 1] (clamped) with linear
/// interpolation between anchor stops.
pub fn viridis(t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - i as f64;
    let lo = VIRIDIS[i];
    let hi = VIRIDIS[i + 1];
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    Rgb {
        r: lerp(lo[0], hi[0]),
        g: lerp(lo[1], hi[1]),
        b: lerp(lo[2], hi[2]),
    }
}

/// One color per branch, sampled at evenly spaced points `i / N` starting
/// at 0. Pure function of branch order, so the same sorted tree always
/// produces the same palette.
pub fn assign(branches: &[Branch]) -> Vec<Rgb> {
    let n = branches.len();
    (0..n).map(|i| viridis(i as f64 / n as f64)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Branch;

    fn branches(n: usize) -> Vec<Branch> {
        (0..n)
            .map(|i| Branch {
                name: format!("b{i}"),
                weight: 1.0,
                leaves: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn endpoints_match_the_reference_gradient() {
        assert_eq!(viridis(0.0).hex(), "#440154");
        assert_eq!(viridis(1.0).hex(), "#fde725");
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        assert_eq!(viridis(-0.5), viridis(0.0));
        assert_eq!(viridis(1.5), viridis(1.0));
    }

    #[test]
    fn assignment_is_deterministic() {
        let bs = branches(7);
        assert_eq!(assign(&bs), assign(&bs));
    }

    #[test]
    fn colors_are_evenly_spaced_over_the_domain() {
        let bs = branches(4);
        let colors = assign(&bs);
        let expected: Vec<Rgb> = (0..4).map(|i| viridis(i as f64 / 4.0)).collect();
        assert_eq!(colors, expected);
        // All distinct at this sample count.
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn empty_branch_list_yields_empty_palette() {
        assert!(assign(&[]).is_empty());
    }
}
