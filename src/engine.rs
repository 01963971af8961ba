//! Engine driver (§4.6): orchestrates trajectory timing, the spatial
//! index, and the pairwise checks into the one public entry point,
//! `detect_conflicts`.

use crate::checks;
use crate::error::EngineError;
use crate::mission::{Conflict, Mission};
use crate::spatial_index::SpatialIndex;

/// Default grid cell size in metres (§4.2), used when a caller does
/// not override it via configuration.
pub const DEFAULT_GRID_CELL_SIZE: f64 = 50.0;

/// Detect every spatial-temporal conflict between `primary` and
/// `others`. Stateless and synchronous: no part of this call persists
/// past its return (§5).
pub fn detect_conflicts(
    primary: &Mission,
    others: &[Mission],
    grid_cell_size: f64,
) -> Result<Vec<Conflict>, EngineError> {
    let primary = primary.with_assigned_timestamps();
    let timed_others: Vec<Mission> = others.iter().map(Mission::with_assigned_timestamps).collect();

    let index = SpatialIndex::build(&timed_others, grid_cell_size);
    let mut conflicts = Vec::new();

    if primary.is_static() {
        let point = &primary.waypoints[0];
        for candidate in index.query_static((point.x, point.y, point.z)) {
            if candidate.mission.drone_id == primary.drone_id {
                continue;
            }
            let conflict = match candidate.segment {
                None => checks::static_vs_static(point, &primary, &candidate.mission.waypoints[0], candidate.mission),
                Some(idx) => {
                    let (w1, w2) = candidate.mission.segment_checked(idx).ok_or_else(|| {
                        EngineError::Internal(format!(
                            "spatial index referenced segment {idx} out of range for mission {}",
                            candidate.mission.drone_id
                        ))
                    })?;
                    checks::static_vs_segment(point, &primary, w1, w2, candidate.mission)
                }
            };
            if let Some(conflict) = conflict {
                conflicts.push(conflict);
            }
        }
    } else {
        for i in 0..primary.segment_count() {
            let (w1, w2) = primary.segment(i);
            for candidate in index.query_segment((w1.x, w1.y, w1.z), (w2.x, w2.y, w2.z)) {
                if candidate.mission.drone_id == primary.drone_id {
                    continue;
                }
                let conflict = match candidate.segment {
                    None => checks::static_vs_segment(
                        &candidate.mission.waypoints[0],
                        candidate.mission,
                        w1,
                        w2,
                        &primary,
                    )
                    .map(|mut c| {
                        // static_vs_segment puts its first argument's
                        // mission first; the driver always wants
                        // primary first regardless of which side was
                        // static, matching §4.6's involved_flights
                        // ordering.
                        c.involved_flights.swap(0, 1);
                        c
                    }),
                    Some(idx) => {
                        let (w3, w4) = candidate.mission.segment_checked(idx).ok_or_else(|| {
                            EngineError::Internal(format!(
                                "spatial index referenced segment {idx} out of range for mission {}",
                                candidate.mission.drone_id
                            ))
                        })?;
                        checks::segment_vs_segment(w1, w2, &primary, w3, w4, candidate.mission)
                    }
                };
                if let Some(conflict) = conflict {
                    conflicts.push(conflict);
                }
            }
        }
    }

    Ok(conflicts)
}
