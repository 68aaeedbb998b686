use crate::error::OracleError;

/// Outcome of a generation step.
///
/// The pipeline never throws at its callers — every failure mode degrades
/// to a stub — but callers still need to know which of the two happened:
/// a genuinely generated value gets a success status and is worth
/// persisting as-is, a fallback gets an error status with the stub as the
/// renderable payload.
#[derive(Debug)]
pub enum Generation<T> {
    /// The generator answered and the reply decoded cleanly.
    Generated(T),
    /// Something failed; `value` is the hardcoded stand-in.
    Fallback { value: T, error: OracleError },
}

impl<T> Generation<T> {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Generation::Fallback { .. })
    }

    #[must_use]
    pub fn value(&self) -> &T {
        match self {
            Generation::Generated(value) | Generation::Fallback { value, .. } => value,
        }
    }

    /// Splits into the payload and the error that forced the fallback, if
    /// any.
    #[must_use]
    pub fn into_parts(self) -> (T, Option<OracleError>) {
        match self {
            Generation::Generated(value) => (value, None),
            Generation::Fallback { value, error } => (value, Some(error)),
        }
    }

    /// Applies `f` to the payload, preserving the outcome.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Generation<U> {
        match self {
            Generation::Generated(value) => Generation::Generated(f(value)),
            Generation::Fallback { value, error } => Generation::Fallback {
                value: f(value),
                error,
            },
        }
    }
}
