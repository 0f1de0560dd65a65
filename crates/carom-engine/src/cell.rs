//! Cells and their boundary records.

use carom_particle::Face;

/// Stable index of a particle in the engine's particle array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticleId(pub usize);

/// Stable index of a cell in the engine's cell array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(pub usize);

/// An oriented boundary record of one cell: the face geometry plus the
/// cell on the other side. The neighbour link of a domain-edge face is
/// the cell itself and is never followed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub face: Face,
    pub neighbour: CellId,
}

/// A rectangular region of the domain.
///
/// Holds the particles whose bounding spheres currently overlap the
/// region. A particle near a face is registered in several cells at once;
/// the engine keeps the reverse mapping and mutates both together.
#[derive(Debug, Clone, Default)]
pub struct Cell {
    /// Particles currently overlapping this cell.
    pub particles: Vec<ParticleId>,
    /// Boundary records used for particle-boundary event prediction.
    pub boundaries: Vec<Boundary>,
}

impl Cell {
    /// Whether the particle is registered here.
    pub fn contains(&self, particle: ParticleId) -> bool {
        self.particles.contains(&particle)
    }
}
