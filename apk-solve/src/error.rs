//! Error handling for apk-solve.

/// The error that can occur during dependency resolution.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No index lists the requested name, neither as a package nor as a
    /// provided virtual.
    #[error("nothing provides {0}")]
    NotFound(String),

    /// A user-requested constraint could not be resolved.
    #[error("failed to resolve constraint '{token}':\n{source}")]
    Constraint {
        /// The requested constraint token.
        token: String,
        /// The underlying failure.
        source: Box<Error>,
    },

    /// A dependency of a package could not be satisfied.
    ///
    /// Nested [`Error::Dependency`] values form the dependency trail down to
    /// the failing constraint.
    #[error("failed to resolve a dependency of {package}:\n{source}")]
    Dependency {
        /// The package whose dependency failed.
        package: String,
        /// The underlying failure.
        source: Box<Error>,
    },

    /// A single candidate was eliminated during resolution.
    #[error("{package}: {reason}")]
    Disqualified {
        /// The file name of the eliminated candidate.
        package: String,
        /// Why the candidate was eliminated.
        reason: String,
    },

    /// Every candidate for a request was eliminated.
    ///
    /// Carries one [`Error::Disqualified`] entry per candidate, sufficient
    /// to render a multi-line explanation.
    #[error(
        "{}",
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
    )]
    Unsatisfiable(Vec<Error>),

    /// An [`apk_types::Error`].
    #[error(transparent)]
    Types(#[from] apk_types::Error),

    /// The resolution was cancelled via its [`crate::Cancellation`] handle.
    #[error("resolution was cancelled")]
    Cancelled,
}
