//! Small math helpers the state machine leans on.
//!
//! `smooth_damp` is the critically-damped spring smoother the rotation
//! resolver uses (same semantics as the classic Game Programming Gems
//! version: approaches the target, never oscillates). Angles are degrees,
//! wrapped to [0, 360).

/// Wrap an angle in degrees to the [0, 360) range.
pub fn wrap_angle(mut angle: f32) -> f32 {
    angle %= 360.0;
    if angle < 0.0 {
        angle += 360.0;
    }
    angle
}

/// Shortest signed difference between two angles in degrees, in (-180, 180].
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let mut delta = (target - current).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Move `current` toward `target` by at most `max_delta`, without overshoot.
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Critically-damped smoothing step.
///
/// `velocity` is carried state: keep it between calls, zero it only when the
/// motion should restart from rest. `smooth_time` is roughly the time to
/// reach the target; it is clamped to a small positive minimum, and very
/// large values degrade gracefully to "barely moves" (no division blowup).
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    let smooth_time = smooth_time.max(0.0001);
    let omega = 2.0 / smooth_time;

    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let original_target = target;
    let target = current - change;

    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // Clamp overshoot past the target.
    if (original_target - current > 0.0) == (output > original_target) {
        output = original_target;
        if dt > 0.0 {
            *velocity = (output - original_target) / dt;
        }
    }

    output
}

/// `smooth_damp` over the shortest angular path, in degrees.
pub fn smooth_damp_angle(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    let target = current + delta_angle(current, target);
    smooth_damp(current, target, velocity, smooth_time, dt)
}
