//! Pairwise closest-approach checks (§4.3–§4.5): the narrow phase that
//! turns an index candidate into a `Conflict` or nothing.
//!
//! Every function here takes the "own" side (mission A — in practice
//! always the primary mission, driven from the engine) before the
//! "other" side, and an already-timed waypoint/segment on each. That
//! ordering is what ends up in `Conflict::involved_flights`.

use crate::geometry::Point3;
use crate::mission::{Conflict, Mission, Waypoint};

/// Below this duration a segment is treated as effectively
/// instantaneous so velocity division stays finite (§4.5 step 2).
const MIN_SEGMENT_DURATION: f64 = 1e-6;

fn combined_buffer(a: &Mission, b: &Mission) -> f64 {
    a.safety_buffer + b.safety_buffer
}

/// §4.3 — two stationary waypoints.
pub fn static_vs_static(
    point_a: &Waypoint,
    mission_a: &Mission,
    point_b: &Waypoint,
    mission_b: &Mission,
) -> Option<Conflict> {
    let t_start = mission_a.start_time.max(mission_b.start_time);
    let t_end = mission_a.end_time.min(mission_b.end_time);
    if t_start >= t_end {
        return None;
    }

    let dist = point_a.distance_to(point_b);
    let buffer = combined_buffer(mission_a, mission_b);
    if dist < buffer {
        Some(Conflict {
            time: t_start,
            location: point_a.position().into(),
            involved_flights: [mission_a.drone_id.clone(), mission_b.drone_id.clone()],
            distance: dist,
        })
    } else {
        None
    }
}

/// §4.4 — one stationary waypoint against the other mission's moving
/// segment, sampled only at the static waypoint's timestamp.
pub fn static_vs_segment(
    static_point: &Waypoint,
    static_mission: &Mission,
    segment_start: &Waypoint,
    segment_end: &Waypoint,
    segment_mission: &Mission,
) -> Option<Conflict> {
    let s_t = static_point.time();
    let (t1, t2) = (segment_start.time(), segment_end.time());
    if s_t < t1 || s_t > t2 {
        return None;
    }

    let tau = if t2 != t1 { (s_t - t1) / (t2 - t1) } else { 0.0 };
    let sampled = segment_start.position().lerp(&segment_end.position(), tau);

    let dist = static_point.position().distance_to(&sampled);
    let buffer = combined_buffer(static_mission, segment_mission);
    if dist < buffer {
        Some(Conflict {
            time: s_t,
            location: static_point.position().into(),
            involved_flights: [
                static_mission.drone_id.clone(),
                segment_mission.drone_id.clone(),
            ],
            distance: dist,
        })
    } else {
        None
    }
}

/// §4.5 — closest approach between two moving segments.
#[allow(clippy::too_many_arguments)]
pub fn segment_vs_segment(
    a_start: &Waypoint,
    a_end: &Waypoint,
    mission_a: &Mission,
    b_start: &Waypoint,
    b_end: &Waypoint,
    mission_b: &Mission,
) -> Option<Conflict> {
    let (t1, t2) = (a_start.time(), a_end.time());
    let (t3, t4) = (b_start.time(), b_end.time());

    let t_s = t1.max(t3);
    let t_e = t2.min(t4);
    if t_s >= t_e {
        return None;
    }

    let duration_a = if t2 - t1 != 0.0 { t2 - t1 } else { MIN_SEGMENT_DURATION };
    let duration_b = if t4 - t3 != 0.0 { t4 - t3 } else { MIN_SEGMENT_DURATION };

    let velocity_a = a_end.position().sub(&a_start.position()).scale(1.0 / duration_a);
    let velocity_b = b_end.position().sub(&b_start.position()).scale(1.0 / duration_b);

    let w = a_start.position().sub(&b_start.position());
    let relative_velocity = velocity_a.sub(&velocity_b);
    let vr_dot_vr = relative_velocity.dot(&relative_velocity);

    let buffer = combined_buffer(mission_a, mission_b);

    let t_star = if vr_dot_vr == 0.0 {
        t_s
    } else {
        let tau_star = -(w.dot(&relative_velocity)) / vr_dot_vr;
        let t_star_abs = t1 + tau_star * duration_a;
        t_star_abs.clamp(t_s, t_e)
    };

    let pos_a = interpolate_segment(a_start, a_end, t_star);
    let pos_b = interpolate_segment(b_start, b_end, t_star);
    let dist = pos_a.distance_to(&pos_b);

    if dist < buffer {
        Some(Conflict {
            time: t_star,
            location: pos_a.into(),
            involved_flights: [mission_a.drone_id.clone(), mission_b.drone_id.clone()],
            distance: dist,
        })
    } else {
        None
    }
}

fn interpolate_segment(start: &Waypoint, end: &Waypoint, time: f64) -> Point3 {
    let (t1, t2) = (start.time(), end.time());
    let tau = if t2 != t1 { (time - t1) / (t2 - t1) } else { 0.0 };
    start.position().lerp(&end.position(), tau)
}
