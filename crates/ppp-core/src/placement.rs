//! Candidate placements
//!
//! A [`Placement`] is a set of towers over a shared [`Instance`]. It answers
//! the two questions every caller asks (is every city covered, and what does
//! the layout cost) and supports the single-tower edits an interactive editor
//! needs.
//!
//! Validity and penalty are recomputed from the current geometry on every
//! query. Nothing is cached, so the answer after an edit always reflects
//! exactly the post-edit layout.

use crate::error::PlacementError;
use crate::penalty::tower_penalty;
use crate::{Instance, Point};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Stable tower identifier.
///
/// Ids are handed out by a per-placement counter and never reused, so an id
/// held by a caller can never silently start referring to a different tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TowerId(u64);

impl TowerId {
    #[inline]
    pub fn new(value: u64) -> Self {
        TowerId(value)
    }
    #[inline]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TowerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A set of towers placed on an instance's grid.
#[derive(Debug, Clone)]
pub struct Placement {
    instance: Arc<Instance>,
    towers: BTreeMap<TowerId, Point>,
    occupied: HashMap<Point, TowerId>,
    next_id: u64,
}

impl Placement {
    /// An empty placement.
    pub fn new(instance: Arc<Instance>) -> Self {
        Placement {
            instance,
            towers: BTreeMap::new(),
            occupied: HashMap::new(),
            next_id: 0,
        }
    }

    /// A placement holding `points`, with ids `0, 1, 2, ...` in input order.
    pub fn from_points(
        instance: Arc<Instance>,
        points: impl IntoIterator<Item = Point>,
    ) -> Result<Self, PlacementError> {
        let mut placement = Placement::new(instance);
        for point in points {
            placement.add_tower(point)?;
        }
        Ok(placement)
    }

    pub fn instance(&self) -> &Arc<Instance> {
        &self.instance
    }

    pub fn len(&self) -> usize {
        self.towers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.towers.is_empty()
    }

    pub fn get(&self, id: TowerId) -> Option<Point> {
        self.towers.get(&id).copied()
    }

    pub fn tower_at(&self, point: Point) -> Option<TowerId> {
        self.occupied.get(&point).copied()
    }

    pub fn contains(&self, point: Point) -> bool {
        self.occupied.contains_key(&point)
    }

    /// `(id, point)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (TowerId, Point)> + '_ {
        self.towers.iter().map(|(&id, &point)| (id, point))
    }

    /// Tower coordinates in ascending id order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.towers.values().copied()
    }

    /// Place a tower. Fails if the cell is off the grid or already occupied.
    pub fn add_tower(&mut self, point: Point) -> Result<TowerId, PlacementError> {
        self.check_free(point)?;
        let id = TowerId(self.next_id);
        self.next_id += 1;
        self.towers.insert(id, point);
        self.occupied.insert(point, id);
        Ok(id)
    }

    fn check_free(&self, point: Point) -> Result<(), PlacementError> {
        if !self.instance.contains(point) {
            return Err(PlacementError::OutOfBounds {
                x: point.x.into(),
                y: point.y.into(),
                side: self.instance.side(),
            });
        }
        match self.occupied.get(&point) {
            Some(&occupant) => Err(PlacementError::Occupied { point, occupant }),
            None => Ok(()),
        }
    }

    /// Remove a tower, returning where it stood.
    pub fn remove_tower(&mut self, id: TowerId) -> Result<Point, PlacementError> {
        let point = self
            .towers
            .remove(&id)
            .ok_or(PlacementError::UnknownTower(id))?;
        self.occupied.remove(&point);
        Ok(point)
    }

    /// Shift a tower by `(dx, dy)`, returning its new position.
    ///
    /// The tower keeps its id. Moving off the grid or onto another tower fails
    /// and leaves the placement untouched; a zero shift always succeeds.
    pub fn move_tower(&mut self, id: TowerId, dx: i32, dy: i32) -> Result<Point, PlacementError> {
        let from = self.get(id).ok_or(PlacementError::UnknownTower(id))?;
        let x = i64::from(from.x) + i64::from(dx);
        let y = i64::from(from.y) + i64::from(dy);
        if !self.instance.in_bounds(x, y) {
            return Err(PlacementError::OutOfBounds {
                x,
                y,
                side: self.instance.side(),
            });
        }
        let to = Point::new(x as i32, y as i32);
        if to == from {
            return Ok(to);
        }
        if let Some(&occupant) = self.occupied.get(&to) {
            return Err(PlacementError::Occupied { point: to, occupant });
        }

        self.occupied.remove(&from);
        self.occupied.insert(to, id);
        self.towers.insert(id, to);
        Ok(to)
    }

    /// Remove every tower. Ids issued so far stay retired.
    pub fn clear(&mut self) {
        self.towers.clear();
        self.occupied.clear();
    }

    /// Swap the whole tower set for `points`.
    ///
    /// All-or-nothing: if any point is rejected the current towers are kept.
    pub fn replace_all(
        &mut self,
        points: impl IntoIterator<Item = Point>,
    ) -> Result<(), PlacementError> {
        let mut next = Placement {
            instance: Arc::clone(&self.instance),
            towers: BTreeMap::new(),
            occupied: HashMap::new(),
            next_id: self.next_id,
        };
        for point in points {
            next.add_tower(point)?;
        }
        *self = next;
        Ok(())
    }

    /// Whether every city has a tower within the coverage radius.
    ///
    /// Stops at the first uncovered city. With no cities this is trivially
    /// true, even for an empty placement.
    pub fn is_valid(&self) -> bool {
        self.instance
            .cities()
            .iter()
            .all(|&city| self.is_covered(city))
    }

    /// Cities with no tower in coverage range, in instance order.
    pub fn uncovered_cities(&self) -> Vec<Point> {
        self.instance
            .cities()
            .iter()
            .copied()
            .filter(|&city| !self.is_covered(city))
            .collect()
    }

    /// Towers covering `point`, in row-major order of their cells.
    pub fn covering_towers(&self, point: Point) -> Vec<TowerId> {
        self.instance
            .coverage_area(point)
            .into_iter()
            .filter_map(|cell| self.tower_at(cell))
            .collect()
    }

    fn is_covered(&self, city: Point) -> bool {
        self.instance
            .coverage_area(city)
            .iter()
            .any(|cell| self.occupied.contains_key(cell))
    }

    /// Number of *other* towers within the penalty radius of tower `id`.
    pub fn overlap_count(&self, id: TowerId) -> Option<usize> {
        self.get(id).map(|point| self.overlap_at(point))
    }

    /// Overlap count of every tower, keyed by id.
    pub fn overlap_counts(&self) -> BTreeMap<TowerId, usize> {
        self.iter()
            .map(|(id, point)| (id, self.overlap_at(point)))
            .collect()
    }

    fn overlap_at(&self, point: Point) -> usize {
        self.instance
            .penalty_area(point)
            .iter()
            .filter(|&&cell| cell != point && self.occupied.contains_key(&cell))
            .count()
    }

    /// Total overlap penalty `Σ 170·e^(0.17·w(t))` over all towers.
    pub fn penalty(&self) -> f64 {
        self.points()
            .map(|point| tower_penalty(self.overlap_at(point)))
            .sum()
    }

    /// Text drawing of the grid, top row first.
    ///
    /// `¢` city with tower, `t` tower, `c` city, `·` empty.
    pub fn render(&self) -> String {
        let side = self.instance.side() as i32;
        let mut out = format!("Penalty: {}\n", self.penalty());
        for y in (0..side).rev() {
            for x in 0..side {
                let p = Point::new(x, y);
                let glyph = match (self.contains(p), self.instance.is_city(p)) {
                    (true, true) => '¢',
                    (true, false) => 't',
                    (false, true) => 'c',
                    (false, false) => '·',
                };
                out.push(glyph);
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
