//! Invariant verification helpers.
//!
//! These walk the whole engine and are meant for tests and debugging, not
//! for the hot loop.

use carom_particle::NDIMS;

use crate::Result;
use crate::cell::CellId;
use crate::engine::Engine;
use crate::{EngineError, EventKind};

impl Engine {
    /// Checks the bidirectional registration contract: every cell a
    /// particle claims holds it, and every particle a cell holds claims
    /// the cell.
    pub fn verify_registration(&self) -> Result<()> {
        for (index, cells) in self.cells_of.iter().enumerate() {
            if cells.is_empty() {
                return Err(EngineError::Cellless { particle: index });
            }
            for &cell in cells {
                if !self.cells[cell.0]
                    .particles
                    .iter()
                    .any(|&member| member.0 == index)
                {
                    return Err(EngineError::MissingParticle {
                        particle: index,
                        cell: cell.0,
                    });
                }
            }
        }
        for (index, cell) in self.cells.iter().enumerate() {
            for &member in &cell.particles {
                if !self.cells_of[member.0].contains(&CellId(index)) {
                    return Err(EngineError::MissingCell {
                        particle: member.0,
                        cell: index,
                    });
                }
            }
        }
        Ok(())
    }

    /// Checks that every event list is sorted by time and references only
    /// particles registered to its cell.
    pub fn verify_event_lists(&self) -> Result<()> {
        for (index, cell) in self.cells.iter().enumerate() {
            let list = self.list(CellId(index));
            let events = list.events();
            if events.windows(2).any(|pair| pair[0].time > pair[1].time) {
                return Err(EngineError::UnsortedEvents { cell: index });
            }
            for event in events {
                let (first, second) = match event.kind {
                    EventKind::Pair { p0, p1, .. } => (p0, Some(p1)),
                    EventKind::Face { particle, .. } => (particle, None),
                };
                for participant in std::iter::once(first).chain(second) {
                    if !cell.contains(participant) {
                        return Err(EngineError::UnregisteredParticipant {
                            cell: index,
                            particle: participant.0,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// Checks the heap order and that each cached key matches the head
    /// time of the cell's list.
    pub fn verify_heap(&self) -> Result<()> {
        for index in 0..self.cells.len() {
            let cell = CellId(index);
            if self.heap.key(cell) != self.list(cell).head_time() {
                return Err(EngineError::BrokenHeap { cell: index });
            }
        }
        if !self.heap.is_min_heap() {
            return Err(EngineError::BrokenHeap {
                cell: self.heap.root().map_or(0, |cell| cell.0),
            });
        }
        Ok(())
    }

    /// The smallest surface-to-surface distance over all particle pairs,
    /// using the stored positions; advance the particles to a common time
    /// first. `+∞` with fewer than two particles.
    pub fn min_surface_gap(&self) -> f64 {
        let mut min = f64::INFINITY;
        for (index, p0) in self.particles.iter().enumerate() {
            for p1 in &self.particles[index + 1..] {
                let mut squared = 0.0;
                for dim in 0..NDIMS {
                    let delta = p1.position[dim] - p0.position[dim];
                    squared += delta * delta;
                }
                min = min.min(squared.sqrt() - p0.radius - p1.radius);
            }
        }
        min
    }

    /// Total kinetic energy of the population.
    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(|p| p.kinetic_energy()).sum()
    }

    /// Total momentum of the population.
    pub fn momentum(&self) -> [f64; NDIMS] {
        let mut total = [0.0; NDIMS];
        for particle in &self.particles {
            let momentum = particle.momentum();
            for dim in 0..NDIMS {
                total[dim] += momentum[dim];
            }
        }
        total
    }
}
