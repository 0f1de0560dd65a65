//! Representation of a hard-sphere particle.

use std::f64::consts::PI;

use crate::{NDIMS, Vector};

/// A hard sphere with ballistic motion between collisions.
///
/// The stored `position` is only valid at the particle's local `time`;
/// callers advance particles lazily with [`Particle::advance`] before
/// comparing states. Cell membership is tracked by the engine, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Mass density (mass per unit N-volume).
    pub density: f64,
    /// Sphere radius.
    pub radius: f64,
    /// Center position, valid at `time`.
    pub position: Vector,
    /// Velocity, constant between events.
    pub velocity: Vector,
    /// Local time at which `position` holds.
    pub time: f64,
}

impl Particle {
    /// Moves the particle ballistically to `t_new` and stamps it as the new
    /// local time. A no-op when `t_new` equals the current local time.
    pub fn advance(&mut self, t_new: f64) {
        let dt = t_new - self.time;
        for dim in 0..NDIMS {
            self.position[dim] += self.velocity[dim] * dt;
        }
        self.time = t_new;
    }

    /// The N-dimensional ball volume scaled by `radius^N`.
    pub fn volume(&self) -> f64 {
        let radius = self.radius;
        match NDIMS {
            2 => PI * radius * radius,
            3 => 4.0 / 3.0 * PI * radius * radius * radius,
            4 => 0.5 * PI * PI * radius * radius * radius * radius,
            _ => unreachable!("NDIMS is limited to 2, 3 or 4 at compile time"),
        }
    }

    /// Mass, `density × volume`.
    pub fn mass(&self) -> f64 {
        self.density * self.volume()
    }

    /// Kinetic energy, `m ‖v‖² / 2`.
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass() * crate::dot(&self.velocity, &self.velocity)
    }

    /// Momentum vector, `m v`.
    pub fn momentum(&self) -> Vector {
        let mass = self.mass();
        let mut momentum = [0.0; NDIMS];
        for dim in 0..NDIMS {
            momentum[dim] = mass * self.velocity[dim];
        }
        momentum
    }
}

/// Fully precomputed post-event state of one participant, copied onto the
/// particle when the owning event is consumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostState {
    pub position: Vector,
    pub velocity: Vector,
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::*;

    fn particle() -> Particle {
        let mut position = [0.0; NDIMS];
        let mut velocity = [0.0; NDIMS];
        position[0] = 1.0;
        velocity[0] = 2.0;
        velocity[1] = -1.0;
        Particle {
            density: 2.0,
            radius: 0.5,
            position,
            velocity,
            time: 1.0,
        }
    }

    #[test]
    fn test_advance() {
        let mut p = particle();
        p.advance(3.0);
        assert_eq!(p.time, 3.0);
        assert_eq!(p.position[0], 5.0);
        assert_eq!(p.position[1], -2.0);
    }

    #[test]
    fn test_advance_is_idempotent_at_local_time() {
        let mut p = particle();
        let before = p.clone();
        p.advance(p.time);
        assert_eq!(p, before);
    }

    #[test]
    fn test_mass_and_volume() {
        let p = particle();
        #[cfg(feature = "dim2")]
        assert_relative_eq!(p.volume(), PI * 0.25);
        #[cfg(feature = "dim3")]
        assert_relative_eq!(p.volume(), 4.0 / 3.0 * PI * 0.125);
        assert_relative_eq!(p.mass(), 2.0 * p.volume());
    }

    #[test]
    fn test_kinetic_energy_and_momentum() {
        let p = particle();
        let mass = p.mass();
        assert_relative_eq!(p.kinetic_energy(), 0.5 * mass * 5.0);
        assert_relative_eq!(p.momentum()[0], mass * 2.0);
        assert_relative_eq!(p.momentum()[1], -mass);
    }
}
