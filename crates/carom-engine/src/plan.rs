//! Event planning: populating and pruning the per-cell lists.

use carom_particle::{predict_face, predict_pair};

use crate::Result;
use crate::cell::{CellId, ParticleId};
use crate::engine::Engine;
use crate::list::Event;
use crate::{EngineError, EventList};

/// Which co-residents of a cell to pair a particle against.
#[derive(Debug, Clone, Copy)]
pub(crate) enum PlanSet {
    /// Every other particle of the cell: used whenever one particle's
    /// kinematics changed.
    All,
    /// Only particles after the given list position: used at startup so
    /// each unordered pair is planned once per cell.
    After(usize),
}

impl Engine {
    /// Plans the startup events of every cell: each unordered pair of
    /// co-residents once, and every particle against every boundary.
    pub(crate) fn plan_initial_events(&mut self) -> Result<()> {
        for index in 0..self.cells.len() {
            let members = self.cells[index].particles.clone();
            for (rank, &particle) in members.iter().enumerate() {
                self.plan_cell_events(particle, CellId(index), PlanSet::After(rank))?;
            }
        }
        Ok(())
    }

    /// Plans the particle's events inside one cell and refreshes the
    /// cell's heap key if its head event changed.
    pub(crate) fn plan_cell_events(
        &mut self,
        particle: ParticleId,
        cell: CellId,
        set: PlanSet,
    ) -> Result<()> {
        let head_before = self.lists[cell.0].head_time();
        let planned = self.plan_into_list(particle, cell, set);
        let head_after = self.lists[cell.0].head_time();
        if head_after != head_before {
            self.heap.update(cell, head_after);
        }
        planned
    }

    fn plan_into_list(&mut self, particle: ParticleId, cell: CellId, set: PlanSet) -> Result<()> {
        let partners = match set {
            PlanSet::All => self.cells[cell.0].particles.clone(),
            PlanSet::After(rank) => self.cells[cell.0].particles[rank + 1..].to_vec(),
        };
        let tmax = self.params.tmax;
        let restitution = self.params.restitution;

        for partner in partners {
            if partner == particle {
                continue;
            }
            let p0 = &self.particles[particle.0];
            let p1 = &self.particles[partner.0];
            if p0.time != p1.time {
                return Err(EngineError::TimeSkew {
                    p0: particle.0,
                    p1: partner.0,
                });
            }
            if let Some(collision) = predict_pair(p0, p1, tmax, restitution)? {
                self.lists[cell.0].insert(Event::pair(particle, partner, collision));
            }
        }

        for boundary in self.cells[cell.0].boundaries.clone() {
            let subject = &self.particles[particle.0];
            if let Some(crossing) = predict_face(subject, &boundary.face, tmax, restitution) {
                self.lists[cell.0].insert(Event::face(particle, boundary, crossing));
            }
        }
        Ok(())
    }

    /// Drops every event of the particle in the cell, refreshing the heap
    /// key if the head changed.
    pub(crate) fn cancel_involving(&mut self, cell: CellId, particle: ParticleId) {
        let head_before = self.lists[cell.0].head_time();
        self.lists[cell.0].cancel_involving(particle);
        let head_after = self.lists[cell.0].head_time();
        if head_after != head_before {
            self.heap.update(cell, head_after);
        }
    }

    /// Drops the cell's head event; the head always changes, so the heap
    /// key is always refreshed.
    pub(crate) fn cancel_head(&mut self, cell: CellId) {
        self.lists[cell.0].cancel_head();
        self.heap.update(cell, self.lists[cell.0].head_time());
    }

    /// Shared read access for the verification helpers.
    pub(crate) fn list(&self, cell: CellId) -> &EventList {
        &self.lists[cell.0]
    }
}
