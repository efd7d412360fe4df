use crate::surrogate::errors::SurrogateError;

/// Result alias for the manager layer.
pub type ManagerResult<T> = Result<T, ManagerError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ManagerError {
    // ---- Registry ----
    /// No surrogate month registered for the location and averaging type.
    NotRegistered { location: i32, ave_type: i32 },
    /// A different surrogate month is already registered under the key.
    AlreadyRegistered { location: i32, ave_type: i32 },
    /// No output column assigned to the location.
    NoOutputIndex { location: i32 },

    // ---- Call arguments ----
    /// Rank parameter is not within 1e-4 of an integer.
    NonIntegerParameter { value: f64 },
    /// Constraint component outside 0..=2.
    InvalidComponent { component: usize },

    // ---- ManagerOptions ----
    /// Options failed validation.
    InvalidOptions { reason: &'static str },

    // ---- Shared state ----
    /// A lock around a registry or cache map was poisoned by a panic.
    CachePoisoned { map: &'static str },

    // ---- Wrapped ----
    Surrogate(SurrogateError),
}

impl std::error::Error for ManagerError {}

impl std::fmt::Display for ManagerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Registry ----
            ManagerError::NotRegistered { location, ave_type } => {
                write!(
                    f,
                    "No surrogate registered for location {location} ({}) and averaging type {ave_type}",
                    crate::manager::registry::location_code(*location)
                )
            }
            ManagerError::AlreadyRegistered { location, ave_type } => {
                write!(
                    f,
                    "A different surrogate is already registered for location {location} and averaging type {ave_type}"
                )
            }
            ManagerError::NoOutputIndex { location } => {
                write!(f, "No output index assigned to location {location}")
            }

            // ---- Call arguments ----
            ManagerError::NonIntegerParameter { value } => {
                write!(f, "Expected an aggregation parameter close to an integer, got {value}")
            }
            ManagerError::InvalidComponent { component } => {
                write!(f, "Constraint component {component} is not one of 0 (rhs), 1 or 2")
            }

            // ---- ManagerOptions ----
            ManagerError::InvalidOptions { reason } => {
                write!(f, "Invalid manager options: {reason}")
            }

            // ---- Shared state ----
            ManagerError::CachePoisoned { map } => {
                write!(f, "Lock around {map} was poisoned")
            }

            // ---- Wrapped ----
            ManagerError::Surrogate(err) => write!(f, "{err}"),
        }
    }
}

impl From<SurrogateError> for ManagerError {
    fn from(err: SurrogateError) -> Self {
        ManagerError::Surrogate(err)
    }
}
