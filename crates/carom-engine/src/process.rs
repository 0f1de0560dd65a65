//! The event dispatcher.

use carom_particle::PostState;
use tracing::{debug, trace};

use crate::Result;
use crate::cell::{Boundary, CellId, ParticleId};
use crate::engine::Engine;
use crate::list::EventKind;
use crate::plan::PlanSet;
use crate::EngineError;

impl Engine {
    /// Consumes the earliest pending event and returns the simulated time
    /// it advanced to, or `+∞` when no event remains before `tmax`.
    ///
    /// # Error
    ///
    /// Returns [`EngineError`] on a broken core invariant (overlap at
    /// prediction time, one-sided registration, a cellless particle).
    pub fn process_next(&mut self) -> Result<f64> {
        let Some(cell) = self.heap.root() else {
            return Ok(f64::INFINITY);
        };
        let Some(event) = self.lists[cell.0].head().copied() else {
            return Ok(f64::INFINITY);
        };
        match event.kind {
            EventKind::Pair {
                p0,
                p1,
                post0,
                post1,
            } => self.process_pair(event.time, p0, p1, post0, post1),
            EventKind::Face {
                particle,
                boundary,
                post,
            } => self.process_face(cell, event.time, particle, boundary, post),
        }
    }

    /// Applies a particle-particle collision: both precomputed states are
    /// copied on, then each participant's neighbourhood is refreshed
    /// (which also drops the consumed event).
    fn process_pair(
        &mut self,
        time: f64,
        p0: ParticleId,
        p1: ParticleId,
        post0: PostState,
        post1: PostState,
    ) -> Result<f64> {
        trace!(time, p0 = p0.0, p1 = p1.0, "pair collision");
        for (id, post) in [(p0, post0), (p1, post1)] {
            let particle = &mut self.particles[id.0];
            particle.position = post.position;
            particle.velocity = post.velocity;
            particle.time = time;
        }
        self.refresh_neighbourhood(p0, time)?;
        self.refresh_neighbourhood(p1, time)?;
        Ok(time)
    }

    fn process_face(
        &mut self,
        cell: CellId,
        time: f64,
        particle: ParticleId,
        boundary: Boundary,
        post: PostState,
    ) -> Result<f64> {
        // bring the whole cell to the event time before touching its lists
        for member in self.cells[cell.0].particles.clone() {
            self.particles[member.0].advance(time);
        }

        if boundary.face.is_outer {
            // the particle no longer overlaps this cell: forget it here
            trace!(time, particle = particle.0, cell = cell.0, "cell departure");
            self.cancel_involving(cell, particle);
            self.deregister(particle, cell)?;
            if self.cells_of[particle.0].is_empty() {
                return Err(EngineError::Cellless {
                    particle: particle.0,
                });
            }
        } else if boundary.face.is_reflecting() {
            trace!(time, particle = particle.0, "wall reflection");
            let subject = &mut self.particles[particle.0];
            subject.position = post.position;
            subject.velocity = post.velocity;
            subject.time = time;
            self.refresh_neighbourhood(particle, time)?;
        } else {
            // inner transfer face: the kinematics are unchanged, so events
            // in the other cells stay valid; only the consumed head goes
            self.transfer(particle, boundary.neighbour)?;
            self.cancel_head(cell);
        }
        Ok(time)
    }

    /// Registers the particle into the neighbour cell and plans its events
    /// there. Registration is idempotent: the outer event that removes the
    /// particle from its previous cell fires later, so the particle may
    /// re-enter a cell it never left.
    fn transfer(&mut self, particle: ParticleId, neighbour: CellId) -> Result<()> {
        let time = self.particles[particle.0].time;
        for member in self.cells[neighbour.0].particles.clone() {
            self.particles[member.0].advance(time);
        }

        let known_by_cell = self.cells[neighbour.0].contains(particle);
        let known_by_particle = self.cells_of[particle.0].contains(&neighbour);
        match (known_by_cell, known_by_particle) {
            (true, true) => {
                debug!(particle = particle.0, cell = neighbour.0, "re-entered cell");
                Ok(())
            }
            (false, false) => {
                debug!(particle = particle.0, cell = neighbour.0, "cell transfer");
                self.register(particle, neighbour);
                self.plan_cell_events(particle, neighbour, PlanSet::All)
            }
            _ => Err(EngineError::RegistrationMismatch {
                particle: particle.0,
                cell: neighbour.0,
            }),
        }
    }

    /// Re-plans everything the particle touches: for each cell holding it,
    /// advances that cell's particles to `time`, cancels the particle's
    /// events there and predicts them anew against the co-residents and
    /// the cell's boundaries.
    fn refresh_neighbourhood(&mut self, particle: ParticleId, time: f64) -> Result<()> {
        for cell in self.cells_of[particle.0].clone() {
            let members = self.cells[cell.0].particles.clone();
            let mut found = false;
            for member in members {
                self.particles[member.0].advance(time);
                if member == particle {
                    found = true;
                }
            }
            if !found {
                return Err(EngineError::MissingParticle {
                    particle: particle.0,
                    cell: cell.0,
                });
            }
            self.cancel_involving(cell, particle);
            self.plan_cell_events(particle, cell, PlanSet::All)?;
        }
        Ok(())
    }
}
