//! Grid indexing and neighbourhood expansion.

use spawngrid_types::bucket::BucketCoordinate;
use spawngrid_types::config::RADIUS_IN_DEGREES;
use spawngrid_types::geo::GeoPoint;

/// Offsets of the eight neighbours in N, NE, E, SE, S, SW, W, NW order.
pub const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// A cell followed by its eight neighbours.
pub type Neighborhood = [BucketCoordinate; 9];

/// Fixed-size square grid laid over the lat/lon plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketGrid {
    cell_size: f64,
}

impl BucketGrid {
    pub fn new(cell_size: f64) -> Self {
        Self { cell_size }
    }

    /// Cell containing the given coordinate.
    ///
    /// # Examples
    ///
    /// ```
    /// use spawngrid::compute::bucket::BucketGrid;
    /// use spawngrid_types::bucket::BucketCoordinate;
    ///
    /// let grid = BucketGrid::default();
    /// assert_eq!(grid.index(0.0, 0.0), BucketCoordinate::new(0, 0));
    /// assert_eq!(grid.index(-0.001, 0.02), BucketCoordinate::new(-1, 1));
    /// ```
    pub fn index(&self, latitude: f64, longitude: f64) -> BucketCoordinate {
        BucketCoordinate::new(
            (latitude / self.cell_size).floor() as i64,
            (longitude / self.cell_size).floor() as i64,
        )
    }

    /// Nominal center of a cell, `(x * size, y * size)`.
    ///
    /// This is the cell's lower corner in lat/lon terms; generated points
    /// cluster around it rather than around the geometric middle.
    pub fn center(&self, cell: BucketCoordinate) -> GeoPoint {
        GeoPoint::new(
            cell.x as f64 * self.cell_size,
            cell.y as f64 * self.cell_size,
        )
    }
}

impl Default for BucketGrid {
    fn default() -> Self {
        Self::new(RADIUS_IN_DEGREES)
    }
}

/// The 3×3 block around `center`, starting with `center` itself.
pub fn expand(center: BucketCoordinate) -> Neighborhood {
    let mut cells = [center; 9];
    for (slot, (dx, dy)) in cells[1..].iter_mut().zip(NEIGHBOR_OFFSETS) {
        *slot = center.offset(dx, dy);
    }
    cells
}
