//! Prediction of particle-boundary crossings.

use crate::particle::{Particle, PostState};
use crate::restitution::Restitution;
use crate::vector::NDIMS;

/// Outer faces sit `1.01 × radius` beyond the cell face. Inner events at
/// the face itself must fire first, so the particle is registered to the
/// neighbour cell strictly before it is dropped from the current one; the
/// 1% margin keeps that ordering even when the cell size coincides with
/// the particle diameter.
pub const OUTER_MARGIN: f64 = 1.01;

/// One of the two sides of a cell along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Toward decreasing coordinate.
    Neg,
    /// Toward increasing coordinate.
    Pos,
}

/// The geometric half of a boundary record: an oriented cell face.
///
/// Every physical face is represented twice, as an *inner* face triggering
/// when the particle surface reaches the face (offset one radius) and an
/// *outer* face triggering once the particle has fully left the cell
/// (offset [`OUTER_MARGIN`] radii past the face). Inner faces on the edge
/// of the whole domain are reflecting walls; outer faces are omitted there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// The axis this face is perpendicular to.
    pub axis: usize,
    /// Which side of the cell the face bounds.
    pub side: Side,
    /// Direction of the radius offset applied to `position`.
    pub shift: Side,
    /// Coordinate of the face along `axis`.
    pub position: f64,
    /// Whether the face lies on the edge of the whole domain.
    pub is_edge: bool,
    /// Whether this is the outer record of the face.
    pub is_outer: bool,
}

impl Face {
    /// A reflecting wall: the inner record of a domain-edge face.
    pub fn is_reflecting(&self) -> bool {
        self.is_edge && !self.is_outer
    }

    /// The coordinate the particle center must reach to trigger the event.
    pub fn effective_position(&self, radius: f64) -> f64 {
        let offset = if self.is_outer {
            OUTER_MARGIN * radius
        } else {
            radius
        };
        match self.shift {
            Side::Neg => self.position - offset,
            Side::Pos => self.position + offset,
        }
    }
}

/// A planned particle-boundary event: the crossing time and the
/// precomputed particle state immediately after it.
#[derive(Debug, Clone, Copy)]
pub struct FaceCrossing {
    /// Absolute simulated time of the crossing.
    pub time: f64,
    /// Post-event state: advanced position, with the velocity reflected
    /// for walls and untouched for transfer faces.
    pub post: PostState,
}

/// Predicts when the particle crosses the given face.
///
/// Returns `None` when the particle moves away from the face's side, the
/// crossing lies in the past, or it falls beyond `tmax`. For reflecting
/// walls the post-event velocity component along the axis is flipped and
/// scaled by the wall restitution coefficient; inner transfer faces and
/// outer faces leave the velocity unchanged, they only move the particle
/// between cell registries.
pub fn predict_face(
    particle: &Particle,
    face: &Face,
    tmax: f64,
    restitution: Restitution,
) -> Option<FaceCrossing> {
    let vel = particle.velocity[face.axis];
    match face.side {
        Side::Neg if vel >= 0.0 => return None,
        Side::Pos if vel <= 0.0 => return None,
        _ => {}
    }

    let target = face.effective_position(particle.radius);
    let dt = (target - particle.position[face.axis]) / vel;
    if dt <= 0.0 {
        // past event
        return None;
    }
    let time = particle.time + dt;
    if time > tmax {
        return None;
    }

    let mut position = [0.0; NDIMS];
    for dim in 0..NDIMS {
        position[dim] = particle.position[dim] + particle.velocity[dim] * dt;
    }
    // pin the crossing axis to the exact trigger coordinate
    position[face.axis] = target;

    let mut velocity = particle.velocity;
    if face.is_reflecting() {
        velocity[face.axis] = -vel * restitution.wall_coefficient(vel.abs());
    }

    Some(FaceCrossing {
        time,
        post: PostState { position, velocity },
    })
}

#[cfg(test)]
mod test {
    use approx::assert_relative_eq;

    use super::*;

    fn particle(position: &[f64], velocity: &[f64]) -> Particle {
        let mut pos = [0.0; NDIMS];
        let mut vel = [0.0; NDIMS];
        pos[..position.len()].copy_from_slice(position);
        vel[..velocity.len()].copy_from_slice(velocity);
        Particle {
            density: 1.0,
            radius: 1.0,
            position: pos,
            velocity: vel,
            time: 0.0,
        }
    }

    fn wall(axis: usize, side: Side, position: f64) -> Face {
        Face {
            axis,
            side,
            // inner record: shifted away from the wall into the cell
            shift: match side {
                Side::Neg => Side::Pos,
                Side::Pos => Side::Neg,
            },
            position,
            is_edge: true,
            is_outer: false,
        }
    }

    #[test]
    fn test_wall_reflection() {
        // a unit sphere at x = 5 moving +x inside [0, 10] touches the wall
        // when its center reaches 9
        let p = particle(&[5.0, 5.0], &[1.0, 0.0]);
        let face = wall(0, Side::Pos, 10.0);
        let crossing = predict_face(&p, &face, 1e3, Restitution::default()).unwrap();

        assert_relative_eq!(crossing.time, 4.0);
        assert_relative_eq!(crossing.post.position[0], 9.0);
        assert_relative_eq!(crossing.post.velocity[0], -1.0);
        assert_relative_eq!(crossing.post.velocity[1], 0.0);
    }

    #[test]
    fn test_wrong_direction_is_rejected() {
        let p = particle(&[5.0, 5.0], &[1.0, 0.0]);
        let face = wall(0, Side::Neg, 0.0);
        assert!(predict_face(&p, &face, 1e3, Restitution::default()).is_none());

        let resting = particle(&[5.0, 5.0], &[0.0, 1.0]);
        let face = wall(0, Side::Pos, 10.0);
        assert!(predict_face(&resting, &face, 1e3, Restitution::default()).is_none());
    }

    #[test]
    fn test_crossing_past_tmax_is_rejected() {
        let p = particle(&[5.0, 5.0], &[1.0, 0.0]);
        let face = wall(0, Side::Pos, 10.0);
        assert!(predict_face(&p, &face, 3.9, Restitution::default()).is_none());
    }

    #[test]
    fn test_outer_face_offset_and_transfer_velocity() {
        // outer record of the positive face at x = 6: triggers at 6 + 1.01
        let p = particle(&[5.0, 5.0], &[1.0, 0.0]);
        let face = Face {
            axis: 0,
            side: Side::Pos,
            shift: Side::Pos,
            position: 6.0,
            is_edge: false,
            is_outer: true,
        };
        let crossing = predict_face(&p, &face, 1e3, Restitution::default()).unwrap();

        assert_relative_eq!(crossing.time, 2.01);
        assert_relative_eq!(crossing.post.position[0], 7.01);
        // transfer events leave the velocity untouched
        assert_relative_eq!(crossing.post.velocity[0], 1.0);
    }

    #[test]
    fn test_inner_transfer_face() {
        // inner record of the positive face at x = 6 of an interior cell:
        // triggers when the surface reaches the face, center at 5
        let p = particle(&[4.0, 5.0], &[1.0, 0.0]);
        let face = Face {
            axis: 0,
            side: Side::Pos,
            shift: Side::Neg,
            position: 6.0,
            is_edge: false,
            is_outer: false,
        };
        let crossing = predict_face(&p, &face, 1e3, Restitution::default()).unwrap();

        assert_relative_eq!(crossing.time, 1.0);
        assert_relative_eq!(crossing.post.position[0], 5.0);
        assert_relative_eq!(crossing.post.velocity[0], 1.0);
    }

    #[test]
    fn test_inelastic_wall_and_slow_override() {
        let restitution = Restitution {
            wall: 0.5,
            ..Default::default()
        };

        let p = particle(&[5.0, 5.0], &[1.0, 0.0]);
        let face = wall(0, Side::Pos, 10.0);
        let crossing = predict_face(&p, &face, 1e3, restitution).unwrap();
        assert_relative_eq!(crossing.post.velocity[0], -0.5);

        // below the speed threshold the wall behaves elastically
        let slow = particle(&[5.0, 5.0], &[1e-5, 0.0]);
        let crossing = predict_face(&slow, &face, 1e9, restitution).unwrap();
        assert_relative_eq!(crossing.post.velocity[0], -1e-5);
    }
}
