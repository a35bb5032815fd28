//! Mask candidate generation, the four penalty rules, and best-mask
//! selection (ISO/IEC 18004 §8.8).
//!
//! Penalty rule 2 here scans the full `[0, dim-2] x [0, dim-2]` window, the
//! window ISO/IEC 18004 actually specifies for a quiet-zone-free matrix.

use super::Matrix;

const PENALTY_N1: i32 = 3;
const PENALTY_N2: i32 = 3;
const PENALTY_N3: i32 = 40;
const PENALTY_N4: i32 = 10;

/// Evaluates mask `mask`'s predicate for the module at bottom-left `(x, y)`.
///
/// The eight formulas are specified in the standard's top-left `(i, j)` terms
/// (`i` the row from the top, `j` the column from the left). `x` already *is*
/// `j`, but `y` is `dim - 1 - i`, not `i` — the mod-2 terms are insensitive to
/// that reflection (since `dim - 1` is always even), but the mod-3 and product
/// terms are not, so `i` is recovered explicitly here rather than reusing `y`
/// in its place.
fn mask_predicate(mask: u8, dim: i32, x: i32, y: i32) -> bool {
    let i = dim - 1 - y;
    let j = x;
    match mask {
        0 => (i + j) % 2 == 0,
        1 => i % 2 == 0,
        2 => j % 3 == 0,
        3 => (i + j) % 3 == 0,
        4 => (i / 2 + j / 3) % 2 == 0,
        5 => (i * j) % 2 + (i * j) % 3 == 0,
        6 => ((i * j) % 2 + (i * j) % 3) % 2 == 0,
        7 => ((i + j) % 2 + (i * j) % 3) % 2 == 0,
        _ => panic!("mask index out of range"),
    }
}

/// Returns a copy of `m` with mask `mask` XORed into every non-function
/// cell.
pub fn apply_mask(m: &Matrix, mask: u8) -> Matrix {
    let dim = m.dim;
    let mut out = Matrix {
        dim,
        modules: m.modules.clone(),
        function_pattern: m.function_pattern.clone(),
    };
    for x in 0..dim {
        for y in 0..dim {
            if out.is_function((x, y)) {
                continue;
            }
            if mask_predicate(mask, dim, x, y) {
                let cur = out.modules[x as usize][y as usize];
                out.modules[x as usize][y as usize] = !cur;
            }
        }
    }
    out
}

/// Scores `m` against all four ISO/IEC 18004 penalty rules, lower is
/// better.
pub fn penalty_score(m: &Matrix) -> i32 {
    let dim = m.dim as usize;
    let get = |x: usize, y: usize| m.modules[x][y];
    let mut score = 0;

    // Rule 1: runs of 5+ same-colored modules in a row or column.
    for y in 0..dim {
        score += run_penalty((0..dim).map(|x| get(x, y)));
    }
    for x in 0..dim {
        score += run_penalty((0..dim).map(|y| get(x, y)));
    }

    // Rule 2: 2x2 blocks of a single color.
    if dim >= 2 {
        for x in 0..dim - 1 {
            for y in 0..dim - 1 {
                let c = get(x, y);
                if get(x + 1, y) == c && get(x, y + 1) == c && get(x + 1, y + 1) == c {
                    score += PENALTY_N2;
                }
            }
        }
    }

    // Rule 3: finder-like 1:1:3:1:1 light/dark patterns, in both scan
    // directions, with a light run of at least 4 modules on either side.
    for y in 0..dim {
        score += finder_like_penalty((0..dim).map(|x| get(x, y)));
    }
    for x in 0..dim {
        score += finder_like_penalty((0..dim).map(|y| get(x, y)));
    }

    // Rule 4: overall dark/light balance.
    score += balance_penalty(m);

    score
}

/// Rule 4 in isolation: `10 * floor(|percent_dark - 50| / 5)`.
fn balance_penalty(m: &Matrix) -> i32 {
    let dim = m.dim as usize;
    let dark: usize = (0..dim).map(|x| (0..dim).filter(|&y| m.modules[x][y]).count()).sum();
    let total = dim * dim;
    let percent_dark = (dark * 100) / total;
    let deviation = if percent_dark >= 50 { percent_dark - 50 } else { 50 - percent_dark };
    (deviation as i32 / 5) * PENALTY_N4
}

fn run_penalty(modules: impl Iterator<Item = bool>) -> i32 {
    let mut score = 0;
    let mut run_len = 0;
    let mut prev: Option<bool> = None;
    for m in modules {
        match prev {
            Some(p) if p == m => run_len += 1,
            _ => run_len = 1,
        }
        if run_len == 5 {
            score += PENALTY_N1;
        } else if run_len > 5 {
            score += 1;
        }
        prev = Some(m);
    }
    score
}

fn finder_like_penalty(modules: impl Iterator<Item = bool>) -> i32 {
    let line: Vec<bool> = modules.collect();
    let n = line.len();
    let mut score = 0;
    if n < 11 {
        return 0;
    }
    // 1:1:3:1:1 pattern, dark-light-dark-dark-dark-light-dark, padded by
    // at least 4 light modules on the side being checked.
    const PATTERN: [bool; 7] = [true, false, true, true, true, false, true];
    for i in 0..=n - 7 {
        if line[i..i + 7] != PATTERN {
            continue;
        }
        let light_before = i >= 4 && line[i - 4..i].iter().all(|&b| !b);
        let light_after = i + 11 <= n && line[i + 7..i + 11].iter().all(|&b| !b);
        if light_before || light_after {
            score += PENALTY_N3;
        }
    }
    score
}

/// Applies every candidate mask (0-7), scores each, and returns the
/// matrix and index of the lowest-penalty one.
pub fn apply_best_mask(m: &Matrix) -> (Matrix, u8) {
    (0u8..8)
        .map(|mask| (apply_mask(m, mask), mask))
        .min_by_key(|(masked, _)| penalty_score(masked))
        .expect("mask range 0..8 is non-empty")
}
