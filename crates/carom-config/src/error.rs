/// Custom error types
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("environment variable `{key}` is not set")]
    Missing { key: &'static str },

    /// A value could not be parsed as a number.
    #[error("environment variable `{key}` holds `{value}`, expected a number")]
    Parse { key: &'static str, value: String },

    /// A restitution coefficient must stay in `[0, 1]`.
    #[error("environment variable `{key}` is {value}, expected a value in [0, 1]")]
    OutOfRange { key: &'static str, value: f64 },
}
