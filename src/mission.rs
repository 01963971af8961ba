//! Mission/Waypoint/Conflict data model and the validation that
//! enforces the invariants the rest of the crate is allowed to assume.

use serde::{Deserialize, Serialize};

use crate::error::MissionError;
use crate::geometry::Point3;

/// A single point on a flight's route. `timestamp` is absent on input
/// and filled in by [`Mission::assign_timestamps`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
}

impl Waypoint {
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self, MissionError> {
        if x < 0.0 || y < 0.0 || z < 0.0 {
            return Err(MissionError::NegativeCoordinate { x, y, z });
        }
        Ok(Self {
            x,
            y,
            z,
            timestamp: None,
        })
    }

    pub fn position(&self) -> Point3 {
        Point3::new(self.x, self.y, self.z)
    }

    pub fn distance_to(&self, other: &Waypoint) -> f64 {
        self.position().distance_to(&other.position())
    }

    /// Timestamp assigned by [`Mission::assign_timestamps`]. Panics if
    /// called before assignment — every `Mission` the engine operates
    /// on has had timestamps assigned before waypoints are read this
    /// way, so an unset timestamp here is a programming error, not a
    /// reachable runtime state.
    pub fn time(&self) -> f64 {
        self.timestamp
            .expect("waypoint timestamp read before assign_timestamps ran")
    }
}

/// A scheduled or proposed flight. Every invariant in the data model
/// (§3) is enforced by [`Mission::new`] — there is no other path to
/// construct one, including deserialization, which goes through
/// [`RawMission`] and re-runs the same validation.
#[derive(Debug, Clone, Serialize)]
#[serde(into = "RawMission")]
pub struct Mission {
    pub drone_id: String,
    pub waypoints: Vec<Waypoint>,
    pub start_time: f64,
    pub end_time: f64,
    pub speed: f64,
    pub safety_buffer: f64,
}

fn default_speed() -> f64 {
    5.0
}

fn default_safety_buffer() -> f64 {
    10.0
}

/// Wire shape for `Mission`. Exists only so `#[serde(default = ...)]`
/// and field presence can be resolved before [`Mission::new`] runs its
/// validation — nothing downstream of deserialization ever sees a
/// `Mission` that skipped it.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawMission {
    drone_id: String,
    waypoints: Vec<Waypoint>,
    start_time: f64,
    end_time: f64,
    #[serde(default = "default_speed")]
    speed: f64,
    #[serde(default = "default_safety_buffer")]
    safety_buffer: f64,
}

impl From<Mission> for RawMission {
    fn from(m: Mission) -> Self {
        RawMission {
            drone_id: m.drone_id,
            waypoints: m.waypoints,
            start_time: m.start_time,
            end_time: m.end_time,
            speed: m.speed,
            safety_buffer: m.safety_buffer,
        }
    }
}

impl<'de> Deserialize<'de> for Mission {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawMission::deserialize(deserializer)?;
        Mission::new(
            raw.drone_id,
            raw.waypoints,
            raw.start_time,
            raw.end_time,
            raw.speed,
            raw.safety_buffer,
        )
        .map_err(serde::de::Error::custom)
    }
}

impl Mission {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        drone_id: impl Into<String>,
        waypoints: Vec<Waypoint>,
        start_time: f64,
        end_time: f64,
        speed: f64,
        safety_buffer: f64,
    ) -> Result<Self, MissionError> {
        let drone_id = drone_id.into();
        if drone_id.is_empty() {
            return Err(MissionError::EmptyDroneId);
        }
        if waypoints.is_empty() {
            return Err(MissionError::EmptyWaypoints);
        }
        for wp in &waypoints {
            if wp.x < 0.0 || wp.y < 0.0 || wp.z < 0.0 {
                return Err(MissionError::NegativeCoordinate {
                    x: wp.x,
                    y: wp.y,
                    z: wp.z,
                });
            }
        }
        if start_time < 0.0 {
            return Err(MissionError::NegativeStartTime(start_time));
        }
        if end_time <= start_time {
            return Err(MissionError::InvalidTimeWindow {
                start_time,
                end_time,
            });
        }
        if speed <= 0.0 {
            return Err(MissionError::NonPositiveSpeed(speed));
        }
        if safety_buffer <= 0.0 {
            return Err(MissionError::NonPositiveSafetyBuffer(safety_buffer));
        }

        Ok(Self {
            drone_id,
            waypoints,
            start_time,
            end_time,
            speed,
            safety_buffer,
        })
    }

    /// Assign a timestamp to every waypoint by arc-length fraction of
    /// the mission's time window (§4.1). Returns a new `Mission` with
    /// timed waypoints; the receiver is left untouched so a caller's
    /// view of mission identity never changes underneath it.
    pub fn with_assigned_timestamps(&self) -> Mission {
        let mut waypoints = self.waypoints.clone();

        if waypoints.len() == 1 {
            waypoints[0].timestamp = Some(self.start_time);
            return Mission {
                waypoints,
                ..self.clone()
            };
        }

        let mut cumulative = vec![0.0f64; waypoints.len()];
        for i in 1..waypoints.len() {
            cumulative[i] = cumulative[i - 1] + waypoints[i - 1].distance_to(&waypoints[i]);
        }
        let total = *cumulative.last().unwrap();

        if total == 0.0 {
            for wp in &mut waypoints {
                wp.timestamp = Some(self.start_time);
            }
        } else {
            let span = self.end_time - self.start_time;
            for (wp, d) in waypoints.iter_mut().zip(cumulative.iter()) {
                wp.timestamp = Some(self.start_time + (d / total) * span);
            }
        }

        Mission {
            waypoints,
            ..self.clone()
        }
    }

    pub fn is_static(&self) -> bool {
        self.waypoints.len() == 1
    }

    pub fn segment_count(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    pub fn segment(&self, index: usize) -> (&Waypoint, &Waypoint) {
        (&self.waypoints[index], &self.waypoints[index + 1])
    }

    /// Like [`Mission::segment`] but returns `None` instead of
    /// panicking on an out-of-range index. Used at the engine driver's
    /// boundary with the spatial index, where an out-of-range segment
    /// reference would indicate a bug in the index rather than bad
    /// caller input.
    pub fn segment_checked(&self, index: usize) -> Option<(&Waypoint, &Waypoint)> {
        let w1 = self.waypoints.get(index)?;
        let w2 = self.waypoints.get(index + 1)?;
        Some((w1, w2))
    }
}

/// A reported spatial-temporal conflict between two missions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conflict {
    pub time: f64,
    pub location: (f64, f64, f64),
    pub involved_flights: [String; 2],
    pub distance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wp(x: f64, y: f64, z: f64) -> Waypoint {
        Waypoint::new(x, y, z).unwrap()
    }

    #[test]
    fn rejects_empty_drone_id() {
        let err = Mission::new("", vec![wp(0.0, 0.0, 0.0)], 0.0, 10.0, 5.0, 10.0).unwrap_err();
        assert!(matches!(err, MissionError::EmptyDroneId));
    }

    #[test]
    fn rejects_empty_waypoints() {
        let err = Mission::new("d1", vec![], 0.0, 10.0, 5.0, 10.0).unwrap_err();
        assert!(matches!(err, MissionError::EmptyWaypoints));
    }

    #[test]
    fn rejects_negative_coordinate() {
        let err = Waypoint::new(-1.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, MissionError::NegativeCoordinate { .. }));
    }

    #[test]
    fn rejects_bad_time_window() {
        let err = Mission::new("d1", vec![wp(0.0, 0.0, 0.0)], 10.0, 10.0, 5.0, 10.0).unwrap_err();
        assert!(matches!(err, MissionError::InvalidTimeWindow { .. }));
    }

    #[test]
    fn single_waypoint_gets_start_time() {
        let m = Mission::new("d1", vec![wp(1.0, 2.0, 3.0)], 100.0, 200.0, 5.0, 10.0).unwrap();
        let timed = m.with_assigned_timestamps();
        assert_eq!(timed.waypoints[0].time(), 100.0);
    }

    #[test]
    fn timestamps_are_monotonic_and_bound_the_window() {
        let m = Mission::new(
            "d1",
            vec![wp(0.0, 0.0, 0.0), wp(10.0, 0.0, 0.0), wp(10.0, 10.0, 0.0)],
            0.0,
            100.0,
            5.0,
            10.0,
        )
        .unwrap();
        let timed = m.with_assigned_timestamps();
        assert_eq!(timed.waypoints[0].time(), 0.0);
        assert_eq!(timed.waypoints[2].time(), 100.0);
        for pair in timed.waypoints.windows(2) {
            assert!(pair[0].time() <= pair[1].time());
        }
    }

    #[test]
    fn coincident_waypoints_all_get_start_time() {
        let m = Mission::new(
            "d1",
            vec![wp(5.0, 5.0, 5.0), wp(5.0, 5.0, 5.0)],
            10.0,
            20.0,
            5.0,
            10.0,
        )
        .unwrap();
        let timed = m.with_assigned_timestamps();
        assert!(timed.waypoints.iter().all(|w| w.time() == 10.0));
    }
}
