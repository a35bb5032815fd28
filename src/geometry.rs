//! Position types and function-pattern region constructors.
//!
//! Every coordinate leaving this module is expressed in the bottom-left
//! origin convention used throughout this crate: `(x, y)` with `x` the
//! column counted from the left edge and `y` the row counted from the
//! *bottom* edge. The standard (ISO/IEC 18004) figures and the reference
//! algorithms we ground these constructors on are all written in terms of
//! `(row, col)` with `row` counted from the top; `rc` below is the single
//! place that conversion happens.

use std::collections::HashSet;

/// A single module coordinate, `(x, y)`, bottom-left origin.
pub type Position = (i32, i32);

/// An ordered sequence of positions, used wherever index order carries
/// meaning (format/version info regions: bit `i` belongs at `seq[i]`).
pub type PositionSeq = Vec<Position>;

/// An unordered set of positions, used for O(1) function-pattern membership
/// tests during the data walk and mask scoring.
pub type PositionSet = HashSet<Position>;

/// Converts a standard top-left `(row, col)` coordinate into this crate's
/// bottom-left `(x, y)` convention, given the symbol's `dim`ension. This is
/// the one conversion point every other function-pattern helper (and the
/// matrix assembler, for the parts of the canvas it draws directly) routes
/// through.
pub fn rc_to_xy(dim: i32, row: i32, col: i32) -> Position {
    (col, dim - 1 - row)
}

fn rc(dim: i32, row: i32, col: i32) -> Position {
    rc_to_xy(dim, row, col)
}

/// The three 9x9 finder-plus-separator blocks (top-left, top-right,
/// bottom-left, in standard row/col terms), clipped to the matrix bounds.
pub fn finder_positions(dim: i32) -> PositionSet {
    let mut set = HashSet::new();
    for &(center_row, center_col) in &[(3, 3), (3, dim - 4), (dim - 4, 3)] {
        for dr in -4..=4 {
            for dc in -4..=4 {
                let row = center_row + dr;
                let col = center_col + dc;
                if row >= 0 && row < dim && col >= 0 && col < dim {
                    set.insert(rc(dim, row, col));
                }
            }
        }
    }
    set
}

/// The two timing-pattern strips (row 6 and column 6 in standard terms),
/// excluding the cells already covered by a finder block.
pub fn timing_positions(dim: i32, finders: &PositionSet) -> PositionSet {
    let mut set = HashSet::new();
    for i in 8..dim - 8 {
        let a = rc(dim, 6, i);
        let b = rc(dim, i, 6);
        if !finders.contains(&a) {
            set.insert(a);
        }
        if !finders.contains(&b) {
            set.insert(b);
        }
    }
    set
}

/// All alignment-pattern 5x5 blocks given the version's alignment coordinate
/// list (`tables::alignment_coords`), skipping the three corners already
/// covered by a finder block.
pub fn alignment_positions(dim: i32, coords: &[i32], finders: &PositionSet) -> PositionSet {
    let mut set = HashSet::new();
    for &row in coords {
        for &col in coords {
            // A center that lands inside a finder block belongs to that
            // finder instead: the corners of the coordinate grid always do.
            let center = rc(dim, row, col);
            if finders.contains(&center) {
                continue;
            }
            for dr in -2..=2 {
                for dc in -2..=2 {
                    set.insert(rc(dim, row + dr, col + dc));
                }
            }
        }
    }
    set
}

/// The two 15-cell format-info regions, in bit order (index 0 is the LSB).
pub fn format_info_regions(dim: i32) -> (PositionSeq, PositionSeq) {
    let mut main = Vec::with_capacity(15);
    for row in 0..6 {
        main.push(rc(dim, row, 8));
    }
    main.push(rc(dim, 7, 8));
    main.push(rc(dim, 8, 8));
    main.push(rc(dim, 8, 7));
    for col in (0..=5).rev() {
        main.push(rc(dim, 8, col));
    }

    let mut side = Vec::with_capacity(15);
    for i in 0..8 {
        side.push(rc(dim, 8, dim - 1 - i));
    }
    for row in dim - 7..dim {
        side.push(rc(dim, row, 8));
    }
    (main, side)
}

/// The always-dark module at `(8, 7)` (bottom-left coordinates), fixed for
/// every version.
pub fn dark_module(_dim: i32) -> Position {
    (8, 7)
}

/// The two 18-cell version-info regions (only meaningful for version >= 7),
/// in bit order.
pub fn version_info_regions(dim: i32) -> (PositionSeq, PositionSeq) {
    let mut a = Vec::with_capacity(18);
    let mut b = Vec::with_capacity(18);
    for i in 0..18 {
        let row = i / 3;
        let col = dim - 11 + i % 3;
        a.push(rc(dim, row, col));
        b.push(rc(dim, col, row));
    }
    (a, b)
}

/// Union of every function-pattern region: finders, separators, timing,
/// alignment, format info (both copies), version info (both copies, if
/// present) and the dark module. Data must never be written to any of
/// these cells.
pub fn function_pattern_positions(dim: i32, alignment_coords: &[i32], has_version_info: bool) -> PositionSet {
    let finders = finder_positions(dim);
    let mut set = finders.clone();
    set.extend(timing_positions(dim, &finders));
    set.extend(alignment_positions(dim, alignment_coords, &finders));
    let (fmt_a, fmt_b) = format_info_regions(dim);
    set.extend(fmt_a);
    set.extend(fmt_b);
    if has_version_info {
        let (ver_a, ver_b) = version_info_regions(dim);
        set.extend(ver_a);
        set.extend(ver_b);
    }
    set.insert(dark_module(dim));
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_module_fixed_regardless_of_version() {
        assert_eq!(dark_module(21), (8, 7));
        assert_eq!(dark_module(177), (8, 7));
    }

    #[test]
    fn finder_blocks_sit_in_three_corners_not_four() {
        let dim = 21;
        let f = finder_positions(dim);
        assert!(f.contains(&(0, 0)));
        assert!(f.contains(&(0, dim - 1)));
        assert!(f.contains(&(dim - 1, dim - 1)));
        assert!(!f.contains(&(dim - 1, 0)));
    }

    #[test]
    fn format_regions_have_fifteen_cells_each() {
        let (a, b) = format_info_regions(21);
        assert_eq!(a.len(), 15);
        assert_eq!(b.len(), 15);
    }

    #[test]
    fn version_regions_have_eighteen_cells_each() {
        let (a, b) = version_info_regions(177);
        assert_eq!(a.len(), 18);
        assert_eq!(b.len(), 18);
    }
}
