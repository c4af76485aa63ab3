//! Unified error type for fixture synthesis
//!
//! Synthesis is best-effort: none of these errors escape a `build*` call.
//! They are produced at the recovery points (construction, conversion,
//! mutator invocation, element resolution), logged, and either degraded into
//! an absent value or reported through [`crate::Population`].

/// Error raised while synthesizing or configuring fixtures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FixgenError {
    /// A composite type could not be constructed
    #[error("Cannot construct {type_name}: {message}")]
    Construction {
        /// Name of the type that failed to construct
        type_name: String,
        /// What went wrong
        message: String,
    },

    /// A synthesized value does not fit the requested Rust type
    #[error("Cannot convert {found} into {expected}")]
    Conversion {
        /// Type the value was converted into
        expected: String,
        /// Description of the value that was supplied
        found: String,
    },

    /// A mutator failed while populating an instance
    #[error("Mutator {mutator} on {type_name} failed: {message}")]
    Mutator {
        /// Name of the type being populated
        type_name: String,
        /// Name of the failing mutator
        mutator: String,
        /// Failure reported by the mutator or its arguments
        message: String,
    },

    /// The element type of a list-like container is unknown
    #[error("Element type of {type_name} cannot be resolved")]
    ElementType {
        /// Name of the container type
        type_name: String,
    },

    /// Configuration could not be parsed or rendered
    #[error("Config error: {message}")]
    Config {
        /// Error message describing the configuration failure
        message: String,
    },
}

impl FixgenError {
    /// Create a construction error
    pub fn construction(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Construction {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Create a conversion error
    pub fn conversion(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::Conversion {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a mutator failure
    pub fn mutator(
        type_name: impl Into<String>,
        mutator: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Mutator {
            type_name: type_name.into(),
            mutator: mutator.into(),
            message: message.into(),
        }
    }

    /// Create an element type resolution error
    pub fn element_type(type_name: impl Into<String>) -> Self {
        Self::ElementType {
            type_name: type_name.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Standard Result type for fixgen operations
pub type Result<T> = std::result::Result<T, FixgenError>;

impl From<toml::de::Error> for FixgenError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.to_string())
    }
}

impl From<toml::ser::Error> for FixgenError {
    fn from(err: toml::ser::Error) -> Self {
        Self::config(err.to_string())
    }
}
