//! The engine object: particles, cells, event lists and the heap.

use carom_particle::{Particle, Restitution, Vector};
use tracing::info;

use crate::cell::{Cell, CellId, ParticleId};
use crate::grid::Grid;
use crate::heap::MinHeap;
use crate::list::EventList;
use crate::{EngineError, Result};

/// Runtime parameters of the event loop.
#[derive(Debug, Clone, Copy)]
pub struct EngineParams {
    /// Simulated time past which no event is planned.
    pub tmax: f64,
    /// Restitution coefficients for the collision kernels.
    pub restitution: Restitution,
}

/// The event-driven simulation core.
///
/// Owns the particle population, the cell decomposition, one event list
/// per cell and the global heap over the cells. The dispatcher
/// ([`Engine::process_next`]) is the only mutator after construction.
#[derive(Debug)]
pub struct Engine {
    pub(crate) particles: Vec<Particle>,
    pub(crate) cells: Vec<Cell>,
    /// Back-references: the cells each particle is registered in.
    pub(crate) cells_of: Vec<Vec<CellId>>,
    /// Planned events, one list per cell.
    pub(crate) lists: Vec<EventList>,
    pub(crate) heap: MinHeap,
    pub(crate) params: EngineParams,
}

impl Engine {
    /// Builds the cell grid for the given domain, registers every particle
    /// in each cell its bounding sphere overlaps, and plans the initial
    /// events.
    ///
    /// # Error
    ///
    /// Returns [`EngineError`] when a domain length is not positive, or
    /// when the initial configuration already contains overlapping
    /// particles.
    pub fn new(lengths: Vector, particles: Vec<Particle>, params: EngineParams) -> Result<Self> {
        let grid = Grid::new(&lengths)?;
        let mut cells = grid.build_cells();
        let mut cells_of = vec![Vec::new(); particles.len()];
        for (index, particle) in particles.iter().enumerate() {
            for cell_index in grid.overlapping_cells(particle) {
                cells[cell_index].particles.push(ParticleId(index));
                cells_of[index].push(CellId(cell_index));
            }
        }

        let cell_count = cells.len();
        info!(cells = cell_count, particles = particles.len(), "grid built");

        let mut engine = Self {
            particles,
            cells,
            cells_of,
            lists: vec![EventList::default(); cell_count],
            heap: MinHeap::new(vec![f64::INFINITY; cell_count]),
            params,
        };
        engine.plan_initial_events()?;
        Ok(engine)
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The cells the particle is currently registered in.
    pub fn cells_of(&self, particle: ParticleId) -> &[CellId] {
        &self.cells_of[particle.0]
    }

    /// The event list of one cell.
    pub fn events(&self, cell: CellId) -> &EventList {
        &self.lists[cell.0]
    }

    /// Total number of pending events over all cells.
    pub fn event_count(&self) -> usize {
        self.lists.iter().map(EventList::len).sum()
    }

    /// Total number of particle-cell registrations (a particle straddling
    /// several cells is counted once per cell).
    pub fn registration_count(&self) -> usize {
        self.cells.iter().map(|cell| cell.particles.len()).sum()
    }

    /// The time of the earliest pending event, `+∞` if none remains.
    pub fn next_event_time(&self) -> f64 {
        self.heap
            .root()
            .map_or(f64::INFINITY, |cell| self.lists[cell.0].head_time())
    }

    /// Advances every particle ballistically to `time`. Safe only for
    /// times not beyond the next pending event.
    pub fn advance_all(&mut self, time: f64) {
        for particle in &mut self.particles {
            particle.advance(time);
        }
    }

    /// Registers the particle in the cell, on both sides.
    pub(crate) fn register(&mut self, particle: ParticleId, cell: CellId) {
        self.cells[cell.0].particles.push(particle);
        self.cells_of[particle.0].push(cell);
    }

    /// Removes the particle from the cell, on both sides.
    pub(crate) fn deregister(&mut self, particle: ParticleId, cell: CellId) -> Result<()> {
        let members = &mut self.cells[cell.0].particles;
        match members.iter().position(|&other| other == particle) {
            Some(at) => {
                let _ = members.remove(at);
            }
            None => {
                return Err(EngineError::MissingParticle {
                    particle: particle.0,
                    cell: cell.0,
                });
            }
        }
        let cells = &mut self.cells_of[particle.0];
        match cells.iter().position(|&other| other == cell) {
            Some(at) => {
                let _ = cells.remove(at);
            }
            None => {
                return Err(EngineError::MissingCell {
                    particle: particle.0,
                    cell: cell.0,
                });
            }
        }
        Ok(())
    }
}
