//! # carom-engine
//!
//! The event-driven core: a uniform cell decomposition of the domain, a
//! time-sorted event list per cell, a global min-heap selecting the cell
//! with the earliest pending event, and the dispatcher that consumes one
//! event at a time.
//!
//! The entry point is [`Engine`]: build it from the domain lengths and the
//! initial particles, then call [`Engine::process_next`] until it returns
//! a time past the simulation limit.
//!
//! Particles and cells reference each other through stable indices
//! ([`ParticleId`], [`CellId`]) into flat arrays; registration is always
//! mutated on both sides together, and the [`verify`](Engine::verify_registration)
//! helpers check the contract.

mod cell;
mod engine;
mod error;
mod grid;
mod heap;
mod list;
mod plan;
mod process;
mod verify;

pub use cell::{Boundary, Cell, CellId, ParticleId};
pub use engine::{Engine, EngineParams};
pub use error::EngineError;
pub use heap::MinHeap;
pub use list::{Event, EventKind, EventList};

pub type Result<T> = std::result::Result<T, EngineError>;
