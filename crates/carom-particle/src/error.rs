/// Custom error types
#[derive(thiserror::Error, Debug)]
pub enum ParticleError {
    /// Two particles overlap at prediction time. The collision kernels keep
    /// every accepted position at non-negative surface distance, so a
    /// negative gap means the engine broke its registration contract.
    #[error("particles overlap at prediction time (squared gap {gap:.3e} < 0)")]
    Overlap {
        /// `‖Δx‖² − (r₀ + r₁)²` at the moment of prediction.
        gap: f64,
    },
}
