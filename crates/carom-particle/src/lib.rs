//! # carom-particle
//!
//! Hard-sphere kinematics: the [`Particle`] object, its ballistic motion,
//! and the collision prediction kernels consumed by the event dispatcher.
//!
//! ## Kernels
//!
//! + [`predict_pair`]: time and post-collision state of the next contact
//!   between two spheres, computed by an overlap-free Newton iteration.
//! + [`predict_face`]: time and post-event state of the next crossing of a
//!   cell [`Face`], covering reflecting walls and cell-transfer faces.
//!
//! ## Dimensionality
//!
//! The spatial dimension is a compile-time parameter selected through the
//! mutually exclusive cargo features `dim2` (default), `dim3` and `dim4`,
//! exposed as [`NDIMS`] and the fixed-size [`Vector`] type.

mod error;
mod face;
mod pair;
mod particle;
mod restitution;
mod vector;

pub use error::ParticleError;
pub use face::{Face, FaceCrossing, OUTER_MARGIN, Side, predict_face};
pub use pair::{PairCollision, predict_pair};
pub use particle::{Particle, PostState};
pub use restitution::Restitution;
pub use vector::{NDIMS, Vector, dot, norm};

pub type Result<T> = std::result::Result<T, ParticleError>;
