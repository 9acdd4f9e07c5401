//! Solver error taxonomy.

use thiserror::Error;

/// Everything that can stop a DC solve.
///
/// Structural problems surface before any matrix work; `SingularSystem` is
/// reserved for the numerical routine itself failing, not for singular
/// circuit matrices (those fall through to the least-squares fit).
#[derive(Debug, Error)]
pub enum Error {
    /// The netlist produced zero unknowns: no non-ground node and no
    /// voltage source survived normalization.
    #[error("no solvable elements; add at least one resistor path and a source")]
    UnsolvableNetwork,

    /// A resistor with a non-positive resistance.
    #[error("resistor {name} must have R > 0 (got {value})")]
    InvalidComponent { name: String, value: f64 },

    /// The factorization failed to run to completion.
    #[error("linear algebra error: {reason}")]
    SingularSystem { reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_component_names_the_offender() {
        let err = Error::InvalidComponent {
            name: "R7".to_string(),
            value: -4.0,
        };
        assert_eq!(err.to_string(), "resistor R7 must have R > 0 (got -4)");
    }

    #[test]
    fn singular_system_carries_the_reason() {
        let err = Error::SingularSystem {
            reason: "SVD did not converge".to_string(),
        };
        assert!(err.to_string().starts_with("linear algebra error:"));
    }
}
