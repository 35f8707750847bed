use thiserror::Error;

/// Error type for branch graph and linked graph operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BranchGraphError {
    #[error("read-only structure: {0}")]
    ReadOnly(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("contract violation: {0}")]
    ContractViolation(String),
    #[error("malformed chain: {0}")]
    MalformedChain(String),
    #[error("ordering violation: {0}")]
    OrderingViolation(String),
    #[error("branch graph poisoned: {0}")]
    Poisoned(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl BranchGraphError {
    pub fn read_only<T: Into<String>>(msg: T) -> Self {
        BranchGraphError::ReadOnly(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        BranchGraphError::NotFound(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        BranchGraphError::InvalidInput(msg.into())
    }

    pub fn contract<T: Into<String>>(msg: T) -> Self {
        BranchGraphError::ContractViolation(msg.into())
    }

    pub fn malformed_chain<T: Into<String>>(msg: T) -> Self {
        BranchGraphError::MalformedChain(msg.into())
    }

    pub fn ordering<T: Into<String>>(msg: T) -> Self {
        BranchGraphError::OrderingViolation(msg.into())
    }

    pub fn poisoned<T: Into<String>>(msg: T) -> Self {
        BranchGraphError::Poisoned(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        BranchGraphError::Serialization(msg.into())
    }

    /// Whether this error leaves the branch graph in an unknown state.
    ///
    /// Lookup and input errors are recoverable; everything that signals a broken
    /// invariant is not.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BranchGraphError::ContractViolation(_)
                | BranchGraphError::MalformedChain(_)
                | BranchGraphError::OrderingViolation(_)
        )
    }
}
