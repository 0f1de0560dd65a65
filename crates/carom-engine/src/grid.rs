//! Construction of the uniform cell grid.

use carom_particle::{Face, NDIMS, Particle, Side, Vector};

use crate::cell::{Boundary, Cell, CellId};
use crate::{EngineError, Result};

/// Approximate cell extent, assuming the typical particle size is unity.
const CELL_SIZE: f64 = 2.0;

/// The uniform axis-aligned partition of the domain, used only while
/// building the cell array and assigning the initial particles.
#[derive(Debug)]
pub(crate) struct Grid {
    /// Number of cells along each dimension.
    ncells: [usize; NDIMS],
    /// Face coordinates along each dimension, `ncells[dim] + 1` entries.
    faces: Vec<Vec<f64>>,
}

impl Grid {
    pub(crate) fn new(lengths: &Vector) -> Result<Self> {
        let mut ncells = [0; NDIMS];
        let mut faces = Vec::with_capacity(NDIMS);
        for dim in 0..NDIMS {
            let length = lengths[dim];
            if !(length > 0.0) {
                return Err(EngineError::InvalidDomain { dim, length });
            }
            let count = ((length / CELL_SIZE) as usize).max(1);
            ncells[dim] = count;
            faces.push(
                (0..=count)
                    .map(|n| n as f64 * length / count as f64)
                    .collect(),
            );
        }
        Ok(Self { ncells, faces })
    }

    pub(crate) fn cell_count(&self) -> usize {
        self.ncells.iter().product()
    }

    /// Strides of the row-major-by-first-dimension cell indexing.
    fn strides(&self) -> [usize; NDIMS] {
        let mut strides = [1; NDIMS];
        for dim in 1..NDIMS {
            strides[dim] = strides[dim - 1] * self.ncells[dim - 1];
        }
        strides
    }

    /// Converts a flat cell index to per-dimension ranks.
    fn ranks(&self, mut index: usize) -> [usize; NDIMS] {
        let mut ranks = [0; NDIMS];
        for dim in 0..NDIMS {
            ranks[dim] = index % self.ncells[dim];
            index /= self.ncells[dim];
        }
        ranks
    }

    /// Builds every cell with its boundary records and neighbour links.
    pub(crate) fn build_cells(&self) -> Vec<Cell> {
        let strides = self.strides();
        (0..self.cell_count())
            .map(|index| {
                let ranks = self.ranks(index);
                let mut boundaries = Vec::new();
                for dim in 0..NDIMS {
                    for side in [Side::Neg, Side::Pos] {
                        let (face_rank, is_edge, step) = match side {
                            Side::Neg => (ranks[dim], ranks[dim] == 0, -1isize),
                            Side::Pos => (
                                ranks[dim] + 1,
                                ranks[dim] == self.ncells[dim] - 1,
                                1isize,
                            ),
                        };
                        let position = self.faces[dim][face_rank];
                        // neighbour rank clamped at the domain edge, where
                        // the link is never followed
                        let neighbour_index = if is_edge {
                            index
                        } else {
                            (index as isize + step * strides[dim] as isize) as usize
                        };
                        for shift in [Side::Neg, Side::Pos] {
                            let is_outer = side == shift;
                            if is_edge && is_outer {
                                // the inner record reflects particles before
                                // they could ever leave the domain
                                continue;
                            }
                            boundaries.push(Boundary {
                                face: Face {
                                    axis: dim,
                                    side,
                                    shift,
                                    position,
                                    is_edge,
                                    is_outer,
                                },
                                neighbour: CellId(neighbour_index),
                            });
                        }
                    }
                }
                Cell {
                    particles: Vec::new(),
                    boundaries,
                }
            })
            .collect()
    }

    /// Flat indices of every cell whose region intersects the particle's
    /// bounding box, inclusive at the faces.
    pub(crate) fn overlapping_cells(&self, particle: &Particle) -> Vec<usize> {
        let mut candidates: Vec<Vec<usize>> = Vec::with_capacity(NDIMS);
        for dim in 0..NDIMS {
            let lo = particle.position[dim] - particle.radius;
            let hi = particle.position[dim] + particle.radius;
            candidates.push(
                (0..self.ncells[dim])
                    .filter(|&rank| self.faces[dim][rank] <= hi && lo <= self.faces[dim][rank + 1])
                    .collect(),
            );
        }

        let strides = self.strides();
        let total: usize = candidates.iter().map(Vec::len).product();
        let mut indices = Vec::with_capacity(total);
        for mut n in 0..total {
            let mut index = 0;
            for dim in 0..NDIMS {
                let count = candidates[dim].len();
                index += candidates[dim][n % count] * strides[dim];
                n /= count;
            }
            indices.push(index);
        }
        indices
    }
}
