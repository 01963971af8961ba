//! Uniform 3-D grid broad-phase index (§4.2).
//!
//! Segments and static waypoints are conservatively covered by the
//! grid cells their axis-aligned bounding box touches. The index never
//! inflates cells by a safety buffer — narrow-phase checks do the
//! exact distance test, and the documented trade-off (§9) is that a
//! `safety_buffer` larger than the cell size can miss candidates whose
//! separation crosses a cell boundary. Callers who need that guarantee
//! should choose a cell size `>= max(safety_buffer)`.

use std::collections::HashMap;

use crate::mission::Mission;

type CellKey = (i64, i64, i64);

/// A candidate from the index: either a reference to one segment of a
/// moving mission, or the sentinel for a single-waypoint (static)
/// mission.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub mission: &'a Mission,
    pub segment: Option<usize>,
}

pub struct SpatialIndex<'a> {
    cell_size: f64,
    cells: HashMap<CellKey, Vec<Candidate<'a>>>,
}

impl<'a> SpatialIndex<'a> {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    fn cell_of(&self, x: f64, y: f64, z: f64) -> CellKey {
        (
            (x / self.cell_size).floor() as i64,
            (y / self.cell_size).floor() as i64,
            (z / self.cell_size).floor() as i64,
        )
    }

    fn cells_covering(&self, min: (f64, f64, f64), max: (f64, f64, f64)) -> Vec<CellKey> {
        let (min_cell_x, min_cell_y, min_cell_z) = self.cell_of(min.0, min.1, min.2);
        let (max_cell_x, max_cell_y, max_cell_z) = self.cell_of(max.0, max.1, max.2);

        let mut keys = Vec::new();
        for x in min_cell_x..=max_cell_x {
            for y in min_cell_y..=max_cell_y {
                for z in min_cell_z..=max_cell_z {
                    keys.push((x, y, z));
                }
            }
        }
        keys
    }

    /// Insert every flight from `others` into the index: static
    /// missions as a single point, moving missions as one entry per
    /// segment. `others` must already have timestamps assigned.
    pub fn build(others: &'a [Mission], cell_size: f64) -> Self {
        let mut index = SpatialIndex::new(cell_size);
        for mission in others {
            if mission.is_static() {
                index.insert_static(mission);
            } else {
                for i in 0..mission.segment_count() {
                    index.insert_segment(mission, i);
                }
            }
        }
        index
    }

    fn insert_segment(&mut self, mission: &'a Mission, segment_idx: usize) {
        let (w1, w2) = mission.segment(segment_idx);
        let min = (w1.x.min(w2.x), w1.y.min(w2.y), w1.z.min(w2.z));
        let max = (w1.x.max(w2.x), w1.y.max(w2.y), w1.z.max(w2.z));
        let candidate = Candidate {
            mission,
            segment: Some(segment_idx),
        };
        for key in self.cells_covering(min, max) {
            self.cells.entry(key).or_default().push(candidate);
        }
    }

    fn insert_static(&mut self, mission: &'a Mission) {
        let wp = &mission.waypoints[0];
        let key = self.cell_of(wp.x, wp.y, wp.z);
        self.cells.entry(key).or_default().push(Candidate {
            mission,
            segment: None,
        });
    }

    /// Candidates whose AABB-covered cells overlap the given segment's
    /// AABB. Order follows cell-enumeration order and may repeat a
    /// candidate once per shared cell (§4.2 — the driver is
    /// responsible for any de-duplication it wants).
    pub fn query_segment(
        &self,
        w1: (f64, f64, f64),
        w2: (f64, f64, f64),
    ) -> Vec<Candidate<'a>> {
        let min = (w1.0.min(w2.0), w1.1.min(w2.1), w1.2.min(w2.2));
        let max = (w1.0.max(w2.0), w1.1.max(w2.1), w1.2.max(w2.2));
        self.cells_covering(min, max)
            .into_iter()
            .flat_map(|key| self.cells.get(&key).cloned().unwrap_or_default())
            .collect()
    }

    pub fn query_static(&self, point: (f64, f64, f64)) -> Vec<Candidate<'a>> {
        let key = self.cell_of(point.0, point.1, point.2);
        self.cells.get(&key).cloned().unwrap_or_default()
    }
}
