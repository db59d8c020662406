//! Contains the Region struct, which pins a rectangle of the complex
//! plane to an integer sampling grid.  Column x of row y maps to one
//! complex sample point; the grid is endpoint-inclusive, so column 0
//! sits exactly on the left bound and column width-1 exactly on the
//! right bound (same for rows against the bottom and top bounds).

use num::Complex;

use error::Error;

/// Width of the base grid, before the weak-scaling multiplier is
/// applied.
pub const BASE_WIDTH: usize = 2_000;

/// Height of the grid.  Fixed: the multiplier only widens rows, it
/// never adds rows.
pub const BASE_HEIGHT: usize = 2_000;

// The default window is a tight square around the origin, where the
// basin boundaries of z^3 - 1 are at their most tangled.
const X_MIN: f64 = -0.05;
const X_MAX: f64 = 0.05;
const Y_MIN: f64 = -0.05;
const Y_MAX: f64 = 0.05;

/// A rectangle of the complex plane together with the dimensions of
/// the integer grid that samples it.  Built once at startup and never
/// mutated afterwards.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Region {
    /// Real part of every column-0 sample.
    pub x_min: f64,
    /// Real part of every column-(width-1) sample.
    pub x_max: f64,
    /// Imaginary part of every row-0 sample.
    pub y_min: f64,
    /// Imaginary part of every row-(height-1) sample.
    pub y_max: f64,
    /// Number of grid columns.
    pub width: usize,
    /// Number of grid rows.
    pub height: usize,
}

impl Region {
    /// Constructor.  Rejects bounds that are inverted or collapsed,
    /// and grids without at least two columns and two rows (the
    /// mapping divides by width-1 and height-1).
    pub fn new(
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
        width: usize,
        height: usize,
    ) -> Result<Region, Error> {
        if x_max <= x_min {
            return Err(Error::Config(
                "the left bound must lie strictly to the left of the right bound".to_string(),
            ));
        }
        if y_max <= y_min {
            return Err(Error::Config(
                "the lower bound must lie strictly below the upper bound".to_string(),
            ));
        }
        if width < 2 || height < 2 {
            return Err(Error::Config(
                "the grid needs at least two columns and two rows".to_string(),
            ));
        }
        Ok(Region {
            x_min,
            x_max,
            y_min,
            y_max,
            width,
            height,
        })
    }

    /// The standard working region: the fixed window around the
    /// origin, sampled by a grid `multiplier` times wider than the
    /// base.  The multiplier grows the problem for weak-scaling runs;
    /// the height never changes.
    pub fn base(multiplier: usize) -> Result<Region, Error> {
        if multiplier == 0 {
            return Err(Error::Config(
                "the work-size multiplier must be greater than zero".to_string(),
            ));
        }
        Region::new(
            X_MIN,
            X_MAX,
            Y_MIN,
            Y_MAX,
            BASE_WIDTH * multiplier,
            BASE_HEIGHT,
        )
    }

    /// Real coordinate of column `x`.
    pub fn re_at(&self, x: usize) -> f64 {
        self.x_min + (self.x_max - self.x_min) * x as f64 / (self.width - 1) as f64
    }

    /// Imaginary coordinate of row `y`.  Constant across a row, so
    /// workers hoist it out of their column loops.
    pub fn im_at(&self, y: usize) -> f64 {
        self.y_min + (self.y_max - self.y_min) * y as f64 / (self.height - 1) as f64
    }

    /// The complex sample point behind grid coordinate (x, y).
    pub fn point(&self, x: usize, y: usize) -> Complex<f64> {
        Complex::new(self.re_at(x), self.im_at(y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_fails_on_inverted_bounds() {
        assert!(Region::new(1.0, -1.0, -1.0, 1.0, 4, 4).is_err());
        assert!(Region::new(-1.0, 1.0, 1.0, -1.0, 4, 4).is_err());
        assert!(Region::new(0.5, 0.5, -1.0, 1.0, 4, 4).is_err());
    }

    #[test]
    fn region_fails_on_degenerate_grids() {
        assert!(Region::new(-1.0, 1.0, -1.0, 1.0, 1, 4).is_err());
        assert!(Region::new(-1.0, 1.0, -1.0, 1.0, 4, 0).is_err());
    }

    #[test]
    fn grid_corners_land_exactly_on_the_bounds() {
        let region = Region::new(-0.05, 0.05, -0.05, 0.05, 4, 2).unwrap();
        assert_eq!(region.re_at(0), -0.05);
        assert_eq!(region.im_at(0), -0.05);
        assert!((region.re_at(3) - 0.05).abs() < 1e-15);
        assert!((region.im_at(1) - 0.05).abs() < 1e-15);
    }

    #[test]
    fn interior_columns_match_the_affine_map() {
        let region = Region::new(-0.05, 0.05, -0.05, 0.05, 4, 2).unwrap();
        assert!((region.re_at(1) - (-0.05 + 0.1 * 1.0 / 3.0)).abs() < 1e-15);
        assert!((region.re_at(2) - (-0.05 + 0.1 * 2.0 / 3.0)).abs() < 1e-15);
    }

    #[test]
    fn mapping_is_strictly_monotonic_per_axis() {
        let region = Region::new(-2.0, 2.0, -1.0, 1.0, 64, 48).unwrap();
        for x in 0..region.width - 1 {
            assert!(region.re_at(x) < region.re_at(x + 1));
        }
        for y in 0..region.height - 1 {
            assert!(region.im_at(y) < region.im_at(y + 1));
        }
    }

    #[test]
    fn odd_grids_sample_the_exact_center() {
        // 5x5 over a symmetric window puts grid (2, 2) on the origin.
        let region = Region::new(-0.05, 0.05, -0.05, 0.05, 5, 5).unwrap();
        let center = region.point(2, 2);
        assert_eq!(center, Complex::new(0.0, 0.0));
    }

    #[test]
    fn base_region_scales_width_only() {
        let region = Region::base(3).unwrap();
        assert_eq!(region.width, 3 * BASE_WIDTH);
        assert_eq!(region.height, BASE_HEIGHT);
        assert_eq!(region.x_min, -0.05);
        assert_eq!(region.y_max, 0.05);
    }

    #[test]
    fn base_region_rejects_a_zero_multiplier() {
        assert!(Region::base(0).is_err());
    }
}
