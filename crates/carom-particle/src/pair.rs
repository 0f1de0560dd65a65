//! Prediction of particle-particle collisions.

use crate::particle::{Particle, PostState};
use crate::restitution::Restitution;
use crate::vector::{NDIMS, Vector, dot, norm};
use crate::{ParticleError, Result};

/// Maximum Newton-Raphson steps when locating the contact time.
const MAX_NEWTON_STEPS: usize = 10;

/// A planned particle-particle collision: the contact time and the fully
/// precomputed state of both participants immediately after it.
#[derive(Debug, Clone, Copy)]
pub struct PairCollision {
    /// Absolute simulated time of the contact.
    pub time: f64,
    /// Post-collision state of the first particle.
    pub post0: PostState,
    /// Post-collision state of the second particle.
    pub post1: PostState,
}

/// Predicts the next contact between two particles sharing a local time.
///
/// The positions at time-of-flight `dt` satisfy
/// `‖Δx + Δv dt‖² = (r₀ + r₁)²`, a quadratic `a dt² + b dt + c = 0` with
/// `a = ⟨Δv, Δv⟩`, `b = 2 ⟨Δx, Δv⟩` and `c = ⟨Δx, Δx⟩ − (r₀ + r₁)²`.
/// Rather than evaluating the closed form, which rounds freely and may
/// place the spheres inside each other, the root is approached from
/// `dt = 0` by Newton-Raphson and every step is accepted only while the
/// surface-to-surface distance stays non-negative. The accepted contact
/// positions therefore never overlap.
///
/// Returns `Ok(None)` when no collision is due before `tmax`: the pair is
/// co-moving (`a = 0`), separating (`b ≥ 0`), or misses (`b² − 4ac < 0`).
///
/// # Error
///
/// Returns [`ParticleError::Overlap`] when the spheres already overlap
/// (`c < 0`), which a correct caller never allows.
pub fn predict_pair(
    p0: &Particle,
    p1: &Particle,
    tmax: f64,
    restitution: Restitution,
) -> Result<Option<PairCollision>> {
    let mut dpos = [0.0; NDIMS];
    let mut dvel = [0.0; NDIMS];
    for dim in 0..NDIMS {
        dpos[dim] = p1.position[dim] - p0.position[dim];
        dvel[dim] = p1.velocity[dim] - p0.velocity[dim];
    }
    let radius_sum = p0.radius + p1.radius;

    let coef2 = dot(&dvel, &dvel);
    if coef2 == 0.0 {
        // co-moving
        return Ok(None);
    }
    let coef1 = 2.0 * dot(&dpos, &dvel);
    if coef1 >= 0.0 {
        // separating, any contact lies in the past
        return Ok(None);
    }
    let coef0 = dot(&dpos, &dpos) - radius_sum * radius_sum;
    if coef0 < 0.0 {
        return Err(ParticleError::Overlap { gap: coef0 });
    }
    let discriminant = coef1 * coef1 - 4.0 * coef2 * coef0;
    if discriminant < 0.0 {
        return Ok(None);
    }

    // Newton-Raphson from dt = 0, keeping the last non-overlapping step.
    let mut dt = 0.0;
    let mut pos0 = p0.position;
    let mut pos1 = p1.position;
    for _ in 0..MAX_NEWTON_STEPS {
        let f0 = coef2 * dt * dt + coef1 * dt + coef0;
        let f1 = 2.0 * coef2 * dt + coef1;
        let dt_next = dt - f0 / f1;
        let mut pos0_next = [0.0; NDIMS];
        let mut pos1_next = [0.0; NDIMS];
        let mut dpos_next = [0.0; NDIMS];
        for dim in 0..NDIMS {
            pos0_next[dim] = p0.position[dim] + p0.velocity[dim] * dt_next;
            pos1_next[dim] = p1.position[dim] + p1.velocity[dim] * dt_next;
            dpos_next[dim] = pos1_next[dim] - pos0_next[dim];
        }
        if norm(&dpos_next) - radius_sum < 0.0 {
            // the tentative step would overlap the spheres
            break;
        }
        dt = dt_next;
        pos0 = pos0_next;
        pos1 = pos1_next;
    }

    let time = p0.time + dt;
    if time > tmax {
        return Ok(None);
    }

    let (vel0, vel1) = post_collision_velocities(&pos0, &pos1, p0, p1, restitution);
    Ok(Some(PairCollision {
        time,
        post0: PostState {
            position: pos0,
            velocity: vel0,
        },
        post1: PostState {
            position: pos1,
            velocity: vel1,
        },
    }))
}

/// Reflects the relative velocity about the contact normal.
///
/// The center-of-mass velocity is conserved; the relative velocity loses
/// `(1 + e)` times its normal component, where `e` is the pair restitution
/// coefficient (overridden to 1 at near-zero relative speed).
fn post_collision_velocities(
    pos0: &Vector,
    pos1: &Vector,
    p0: &Particle,
    p1: &Particle,
    restitution: Restitution,
) -> (Vector, Vector) {
    let m0 = p0.mass();
    let m1 = p1.mass();
    let radius_sum = p0.radius + p1.radius;

    let mut normal = [0.0; NDIMS];
    let mut gvel = [0.0; NDIMS];
    let mut dvel = [0.0; NDIMS];
    for dim in 0..NDIMS {
        normal[dim] = (pos1[dim] - pos0[dim]) / radius_sum;
        gvel[dim] = (m0 * p0.velocity[dim] + m1 * p1.velocity[dim]) / (m0 + m1);
        dvel[dim] = p1.velocity[dim] - p0.velocity[dim];
    }
    let coefficient = restitution.pair_coefficient(norm(&dvel));
    let factor = -(1.0 + coefficient) * dot(&dvel, &normal);
    for dim in 0..NDIMS {
        dvel[dim] += factor * normal[dim];
    }

    let mut vel0 = [0.0; NDIMS];
    let mut vel1 = [0.0; NDIMS];
    for dim in 0..NDIMS {
        vel0[dim] = gvel[dim] - m1 / (m0 + m1) * dvel[dim];
        vel1[dim] = gvel[dim] + m0 / (m0 + m1) * dvel[dim];
    }
    (vel0, vel1)
}
