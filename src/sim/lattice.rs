//! Triangular pin lattice geometry
//!
//! The lattice is a pure function of (display width, display height, rows,
//! bin count). Row `r` holds `r + 1` pins centered on the display's vertical
//! centerline; bins sit under the bottom row, evenly spread between its
//! outermost pins.

use glam::IVec2;
use serde::Serialize;

/// Round half up to the nearest pixel
#[inline]
fn round_px(v: f32) -> i32 {
    (v + 0.5).floor() as i32
}

/// Pin and bin coordinates for one display geometry.
///
/// Only `compute` builds a layout, so `pins` always matches `rows`. The type
/// serializes for logging but is never decoded; persist `BoardSettings` and
/// recompute instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatticeLayout {
    display_width: u32,
    display_height: u32,
    rows: usize,
    /// Horizontal distance between neighbouring pins (and one deflection)
    step_x: f32,
    /// Vertical distance between pin rows
    step_y: f32,
    /// Pins stored row after row; row r starts at r * (r + 1) / 2
    pins: Vec<IVec2>,
    bin_positions: Vec<i32>,
}

impl LatticeLayout {
    /// Compute the lattice for a display.
    ///
    /// Degenerate inputs never divide by zero: with `rows <= 1` both steps
    /// are zero, and a display too short to hold a lattice clamps `step_y`
    /// to zero instead of going negative.
    pub fn compute(display_width: u32, display_height: u32, rows: usize, bin_count: usize) -> Self {
        let (step_x, step_y) = if rows > 1 {
            let spans = (rows - 1) as f32;
            let half_h = (display_height / 2) as f32;
            (
                display_width as f32 * 0.5 / spans,
                ((half_h - 1.0) / spans).max(0.0),
            )
        } else {
            (0.0, 0.0)
        };

        let mut pins = Vec::with_capacity(rows * (rows + 1) / 2);
        for r in 0..rows {
            let shift_x = ((display_width as f32 - 1.0) - r as f32 * step_x) * 0.5;
            let y = round_px(r as f32 * step_y);
            for c in 0..=r {
                pins.push(IVec2::new(round_px(shift_x + c as f32 * step_x), y));
            }
        }

        let mut layout = Self {
            display_width,
            display_height,
            rows,
            step_x,
            step_y,
            pins,
            bin_positions: Vec::new(),
        };
        layout.bin_positions = layout.interpolate_bins(bin_count);
        layout
    }

    /// Evenly spread `bin_count` x-coordinates across the bottom row, ends inclusive
    fn interpolate_bins(&self, bin_count: usize) -> Vec<i32> {
        let Some(bottom) = self.rows.checked_sub(1).map(|r| self.pins(r)) else {
            return Vec::new();
        };
        let (Some(first), Some(last)) = (bottom.first(), bottom.last()) else {
            return Vec::new();
        };
        let (start, end) = (first.x, last.x);

        match bin_count {
            0 => Vec::new(),
            1 => vec![start],
            n => (0..n)
                .map(|i| {
                    let t = i as f32 / (n - 1) as f32;
                    round_px(start as f32 + (end - start) as f32 * t)
                })
                .collect(),
        }
    }

    #[inline]
    fn row_start(row: usize) -> usize {
        row * (row + 1) / 2
    }

    pub fn display_width(&self) -> u32 {
        self.display_width
    }

    pub fn display_height(&self) -> u32 {
        self.display_height
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn step_x(&self) -> f32 {
        self.step_x
    }

    pub fn step_y(&self) -> f32 {
        self.step_y
    }

    /// Pins of row `row` (empty when the row does not exist)
    pub fn pins(&self, row: usize) -> &[IVec2] {
        if row >= self.rows {
            return &[];
        }
        let start = Self::row_start(row);
        self.pins.get(start..start + row + 1).unwrap_or(&[])
    }

    pub fn pin(&self, row: usize, col: usize) -> Option<IVec2> {
        self.pins(row).get(col).copied()
    }

    /// Every pin, top row first
    pub fn iter_pins(&self) -> impl Iterator<Item = IVec2> + '_ {
        self.pins.iter().copied()
    }

    /// Release point of new balls: the row-0 pin, or top-center without pins
    pub fn apex(&self) -> IVec2 {
        self.pin(0, 0)
            .unwrap_or_else(|| IVec2::new(round_px((self.display_width as f32 - 1.0) * 0.5), 0))
    }

    pub fn bin_positions(&self) -> &[i32] {
        &self.bin_positions
    }

    pub fn bin_count(&self) -> usize {
        self.bin_positions.len()
    }

    /// Lattice row a ball at height `y` is crossing, if any.
    ///
    /// A row is entered half a row spacing above its pins. A collapsed
    /// lattice (`step_y == 0`) only ever reports row 0.
    pub fn row_at(&self, y: f32) -> Option<usize> {
        if self.rows == 0 {
            return None;
        }
        if self.step_y <= 0.0 {
            return Some(0);
        }
        let row = ((y + self.step_y * 0.5) / self.step_y).floor();
        if row >= 0.0 && row < self.rows as f32 {
            Some(row as usize)
        } else {
            None
        }
    }

    /// Bin closest to horizontal position `x`; exact ties go to the lowest index
    pub fn nearest_bin(&self, x: f32) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, &bx) in self.bin_positions.iter().enumerate() {
            let dist = (x - bx as f32).abs();
            match best {
                Some((_, d)) if dist >= d => {}
                _ => best = Some((i, dist)),
            }
        }
        best.map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_board_geometry() {
        let layout = LatticeLayout::compute(128, 64, 15, 7);
        assert_eq!(layout.rows(), 15);
        assert_eq!(layout.iter_pins().count(), 15 * 16 / 2);
        assert!((layout.step_x() - 64.0 / 14.0).abs() < 1e-5);
        assert!((layout.step_y() - 31.0 / 14.0).abs() < 1e-5);

        // Apex sits on the centerline of a 128 px panel
        assert_eq!(layout.apex(), IVec2::new(64, 0));
        // Bottom row reaches down to half the panel
        assert_eq!(layout.pins(14)[0].y, 31);

        let bins = layout.bin_positions();
        let bottom = layout.pins(14);
        assert_eq!(bins.len(), 7);
        assert_eq!(bins[0], bottom[0].x);
        assert_eq!(bins[6], bottom[14].x);
        assert!(bins.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_single_row_has_no_spacing() {
        let layout = LatticeLayout::compute(128, 64, 1, 7);
        assert_eq!(layout.step_x(), 0.0);
        assert_eq!(layout.step_y(), 0.0);
        assert_eq!(layout.pins(0).len(), 1);
        // All bins collapse onto the only pin
        assert!(layout.bin_positions().iter().all(|&x| x == layout.apex().x));
        assert_eq!(layout.row_at(10.0), Some(0));
    }

    #[test]
    fn test_degenerate_inputs_do_not_panic() {
        let empty = LatticeLayout::compute(128, 64, 0, 7);
        assert_eq!(empty.iter_pins().count(), 0);
        assert_eq!(empty.bin_count(), 0);
        assert_eq!(empty.row_at(3.0), None);
        assert_eq!(empty.apex(), IVec2::new(64, 0));
        assert_eq!(empty.nearest_bin(10.0), None);

        let zero = LatticeLayout::compute(0, 0, 15, 7);
        assert_eq!(zero.step_y(), 0.0);
        assert_eq!(zero.pins(14).len(), 15);

        let no_bins = LatticeLayout::compute(128, 64, 15, 0);
        assert!(no_bins.bin_positions().is_empty());

        let one_bin = LatticeLayout::compute(128, 64, 15, 1);
        assert_eq!(one_bin.bin_positions(), &[one_bin.pins(14)[0].x]);
    }

    #[test]
    fn test_row_at() {
        let layout = LatticeLayout::compute(128, 64, 15, 7);
        let half = layout.step_y() * 0.5;
        assert_eq!(layout.row_at(0.0), Some(0));
        assert_eq!(layout.row_at(half + 0.01), Some(1));
        assert_eq!(layout.row_at(layout.step_y() * 14.0), Some(14));
        assert_eq!(layout.row_at(layout.step_y() * 14.0 + half + 0.01), None);
        assert_eq!(layout.row_at(-layout.step_y()), None);
    }

    #[test]
    fn test_nearest_bin_tie_goes_low() {
        let layout = LatticeLayout::compute(128, 64, 15, 7);
        let bins = layout.bin_positions().to_vec();
        assert_eq!(layout.nearest_bin(bins[2] as f32), Some(2));
        assert_eq!(layout.nearest_bin(-1000.0), Some(0));
        assert_eq!(layout.nearest_bin(1000.0), Some(6));

        // Exactly midway between the two bins
        let pair = LatticeLayout::compute(128, 64, 15, 2);
        let b = pair.bin_positions();
        let mid = (b[0] + b[1]) as f32 * 0.5;
        assert_eq!(pair.nearest_bin(mid), Some(0));
    }

    #[test]
    fn test_serialized_layout_carries_every_pin() {
        let layout = LatticeLayout::compute(128, 64, 15, 7);
        let json = serde_json::to_value(&layout).unwrap();
        assert_eq!(json["rows"], 15);
        assert_eq!(json["pins"].as_array().map(Vec::len), Some(15 * 16 / 2));
        assert_eq!(json["bin_positions"].as_array().map(Vec::len), Some(7));
    }

    #[test]
    fn test_pins_past_last_row_are_empty() {
        let layout = LatticeLayout::compute(128, 64, 15, 7);
        assert!(layout.pins(15).is_empty());
        assert!(layout.pins(usize::MAX / 4).is_empty());
        assert_eq!(layout.pin(15, 0), None);
        assert_eq!(layout.pin(14, 15), None);
    }

    proptest! {
        #[test]
        fn prop_compute_is_deterministic(
            width in 0u32..512,
            height in 0u32..256,
            rows in 0usize..40,
            bins in 0usize..20,
        ) {
            let a = LatticeLayout::compute(width, height, rows, bins);
            let b = LatticeLayout::compute(width, height, rows, bins);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_rows_are_triangular_and_symmetric(
            width in 2u32..512,
            height in 2u32..256,
            rows in 1usize..40,
        ) {
            let layout = LatticeLayout::compute(width, height, rows, 7);
            let mirror = width as i32 - 1;
            for r in 0..rows {
                let row = layout.pins(r);
                prop_assert_eq!(row.len(), r + 1);
                for c in 0..=r {
                    let sum = row[c].x + row[r - c].x;
                    prop_assert!((sum - mirror).abs() <= 1, "row {} col {}: {} vs {}", r, c, sum, mirror);
                    prop_assert_eq!(row[c].y, row[0].y);
                }
            }
        }

        #[test]
        fn prop_bins_span_bottom_row(
            width in 2u32..512,
            height in 2u32..256,
            rows in 2usize..40,
            bins in 2usize..20,
        ) {
            let layout = LatticeLayout::compute(width, height, rows, bins);
            let bottom = layout.pins(rows - 1);
            let positions = layout.bin_positions();
            prop_assert_eq!(positions.len(), bins);
            prop_assert_eq!(positions[0], bottom[0].x);
            prop_assert_eq!(positions[bins - 1], bottom[rows - 1].x);
            prop_assert!(positions.windows(2).all(|w| w[0] <= w[1]));
        }

        #[test]
        fn prop_pins_never_panic(
            rows in 0usize..40,
            row in 0usize..64,
        ) {
            let layout = LatticeLayout::compute(128, 64, rows, 7);
            let expected = if row < rows { row + 1 } else { 0 };
            prop_assert_eq!(layout.pins(row).len(), expected);
        }
    }
}
