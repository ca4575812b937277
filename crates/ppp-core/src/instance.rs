//! Problem instances

use crate::error::{CoreError, CoreResult};
use crate::lattice::points_within_radius;
use crate::{Point, Radius};
use std::collections::HashSet;

/// An immutable problem instance: grid, cities and the two radii.
///
/// Construction validates that every city is on the grid and that no city is
/// listed twice; after that there are no mutators. Placements hold an
/// `Arc<Instance>`, so one instance can back any number of placements across
/// threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    side: u32,
    cities: Vec<Point>,
    city_set: HashSet<Point>,
    coverage_radius: Radius,
    penalty_radius: Radius,
}

impl Instance {
    /// Build an instance, keeping cities in the order given.
    pub fn new(
        side: u32,
        cities: impl IntoIterator<Item = Point>,
        coverage_radius: Radius,
        penalty_radius: Radius,
    ) -> CoreResult<Self> {
        if side == 0 {
            return Err(CoreError::EmptyGrid);
        }
        if i32::try_from(side).is_err() {
            return Err(CoreError::GridTooLarge(side));
        }

        let mut ordered = Vec::new();
        let mut city_set = HashSet::new();
        for city in cities {
            if !in_bounds(side, i64::from(city.x), i64::from(city.y)) {
                return Err(CoreError::CityOutOfBounds { city, side });
            }
            if !city_set.insert(city) {
                return Err(CoreError::DuplicateCity(city));
            }
            ordered.push(city);
        }

        Ok(Instance {
            side,
            cities: ordered,
            city_set,
            coverage_radius,
            penalty_radius,
        })
    }

    /// Grid side length `D`.
    #[inline]
    pub fn side(&self) -> u32 {
        self.side
    }

    #[inline]
    pub fn cities(&self) -> &[Point] {
        &self.cities
    }

    #[inline]
    pub fn num_cities(&self) -> usize {
        self.cities.len()
    }

    #[inline]
    pub fn coverage_radius(&self) -> Radius {
        self.coverage_radius
    }

    #[inline]
    pub fn penalty_radius(&self) -> Radius {
        self.penalty_radius
    }

    pub fn is_city(&self, point: Point) -> bool {
        self.city_set.contains(&point)
    }

    /// Whether `(x, y)` lies on the grid.
    #[inline]
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        in_bounds(self.side, x, y)
    }

    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        self.in_bounds(i64::from(point.x), i64::from(point.y))
    }

    /// Number of lattice cells, `D²`.
    pub fn cell_count(&self) -> usize {
        let side = self.side as usize;
        side * side
    }

    /// Row-major index of an in-grid cell.
    pub fn cell_index(&self, point: Point) -> Option<usize> {
        if !self.contains(point) {
            return None;
        }
        Some(point.y as usize * self.side as usize + point.x as usize)
    }

    /// Cell at a row-major index.
    pub fn cell_at(&self, index: usize) -> Option<Point> {
        if index >= self.cell_count() {
            return None;
        }
        let side = self.side as usize;
        Some(Point::new((index % side) as i32, (index / side) as i32))
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        let side = self.side as i32;
        (0..side).flat_map(move |y| (0..side).map(move |x| Point::new(x, y)))
    }

    /// Cells from which a tower covers `point`.
    pub fn coverage_area(&self, point: Point) -> Vec<Point> {
        points_within_radius(point, self.coverage_radius, self.side)
    }

    /// Cells whose towers overlap a tower at `point` (including `point`).
    pub fn penalty_area(&self, point: Point) -> Vec<Point> {
        points_within_radius(point, self.penalty_radius, self.side)
    }
}

fn in_bounds(side: u32, x: i64, y: i64) -> bool {
    let side = i64::from(side);
    (0..side).contains(&x) && (0..side).contains(&y)
}
