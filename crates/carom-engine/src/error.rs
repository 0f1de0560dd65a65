/// Custom error types
///
/// Apart from [`EngineError::InvalidDomain`], every variant flags a broken
/// core invariant: these do not occur in a correct run and the caller is
/// expected to halt on them.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// From [`carom_particle::ParticleError`].
    #[error("{0}")]
    Particle(#[from] carom_particle::ParticleError),

    /// Domain lengths must be positive.
    #[error("domain length along dimension {dim} is {length}, expected > 0")]
    InvalidDomain { dim: usize, length: f64 },

    /// A particle claims membership in a cell whose list does not hold it.
    #[error("particle {particle} is missing from the list of cell {cell}")]
    MissingParticle { particle: usize, cell: usize },

    /// A cell holds a particle that does not point back at it.
    #[error("cell {cell} is missing from the cell set of particle {particle}")]
    MissingCell { particle: usize, cell: usize },

    /// One-sided registration found while transferring into a cell.
    #[error("one-sided registration between particle {particle} and cell {cell}")]
    RegistrationMismatch { particle: usize, cell: usize },

    /// A particle was deregistered from its last cell.
    #[error("particle {particle} belongs to no cell")]
    Cellless { particle: usize },

    /// Pair events may only be planned between particles sharing a local time.
    #[error("planning a pair event between particles {p0} and {p1} with differing local times")]
    TimeSkew { p0: usize, p1: usize },

    /// An event list is no longer sorted by time.
    #[error("event list of cell {cell} is not sorted by time")]
    UnsortedEvents { cell: usize },

    /// An event references a participant that left the cell.
    #[error("event in cell {cell} references particle {particle}, which is not registered there")]
    UnregisteredParticipant { cell: usize, particle: usize },

    /// The heap order or its cached keys are inconsistent.
    #[error("min-heap violation at cell {cell}")]
    BrokenHeap { cell: usize },
}
