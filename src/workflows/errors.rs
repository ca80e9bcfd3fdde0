use thiserror::Error;

/// Errors raised while building or driving a workflow
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("State '{name}' is already registered")]
    DuplicateState { name: String },

    #[error("Transition '{transition}' references unknown state '{state}'")]
    UnknownState { transition: String, state: String },

    #[error("Initial state '{state}' is not a state of the machine")]
    UnknownInitialState { state: String },

    #[error("Transition '{name}' from state '{from_state}' is already registered")]
    DuplicateTransition { name: String, from_state: String },

    #[error("No unique transition '{name}' from state '{from_state}' ({matches} matches)")]
    InvalidTransition {
        from_state: String,
        name: String,
        matches: usize,
    },

    #[error("No unique transition from state '{from_state}' to state '{to_state}' ({matches} matches)")]
    NoPathToState {
        from_state: String,
        to_state: String,
        matches: usize,
    },

    #[error("Object has no state in attribute '{state_attr}'; initialize it first")]
    Uninitialized { state_attr: String },

    /// The transition callback failed; the object's state was not advanced.
    #[error(transparent)]
    Callback(anyhow::Error),

    #[error("Callback '{name}' is not registered")]
    UnknownCallback { name: String },

    #[error("Workflow '{name}' is already registered for {object_type:?}")]
    DuplicateWorkflow {
        name: String,
        object_type: Option<String>,
    },

    #[error("No workflow '{name}' registered for {object_type:?}")]
    UnknownWorkflow {
        name: String,
        object_type: Option<String>,
    },

    #[error("Invalid workflow definition: {0}")]
    Definition(#[from] toml::de::Error),

    #[error("Failed to read workflow definition: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkflowError {
    /// Errors that can only come out of building machines and registries.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            WorkflowError::DuplicateState { .. }
                | WorkflowError::UnknownState { .. }
                | WorkflowError::UnknownInitialState { .. }
                | WorkflowError::DuplicateTransition { .. }
                | WorkflowError::UnknownCallback { .. }
                | WorkflowError::DuplicateWorkflow { .. }
                | WorkflowError::Definition(_)
                | WorkflowError::Io(_)
        )
    }

    /// Request-time errors a caller can catch and report as "not allowed".
    /// The object is left untouched when one of these is returned.
    pub fn is_caller_recoverable(&self) -> bool {
        matches!(
            self,
            WorkflowError::InvalidTransition { .. }
                | WorkflowError::NoPathToState { .. }
                | WorkflowError::Uninitialized { .. }
                | WorkflowError::UnknownWorkflow { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let dup = WorkflowError::DuplicateState {
            name: "public".to_string(),
        };
        assert!(dup.is_configuration_error());
        assert!(!dup.is_caller_recoverable());

        let invalid = WorkflowError::InvalidTransition {
            from_state: "public".to_string(),
            name: "private_to_public".to_string(),
            matches: 0,
        };
        assert!(invalid.is_caller_recoverable());
        assert!(!invalid.is_configuration_error());

        let callback = WorkflowError::Callback(anyhow::anyhow!("mail server down"));
        assert!(!callback.is_caller_recoverable());
        assert!(!callback.is_configuration_error());
    }

    #[test]
    fn test_binding_errors_name_what_is_missing() {
        let initial = WorkflowError::UnknownInitialState {
            state: "draft".to_string(),
        };
        assert_eq!(
            initial.to_string(),
            "Initial state 'draft' is not a state of the machine"
        );
        assert!(initial.is_configuration_error());

        let no_path = WorkflowError::NoPathToState {
            from_state: "public".to_string(),
            to_state: "public".to_string(),
            matches: 0,
        };
        assert_eq!(
            no_path.to_string(),
            "No unique transition from state 'public' to state 'public' (0 matches)"
        );
        assert!(no_path.is_caller_recoverable());
    }

    #[test]
    fn test_callback_error_display_is_transparent() {
        let err = WorkflowError::Callback(anyhow::anyhow!("mail server down"));
        assert_eq!(err.to_string(), "mail server down");
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = WorkflowError::InvalidTransition {
            from_state: "public".to_string(),
            name: "publish".to_string(),
            matches: 0,
        };
        assert_eq!(
            err.to_string(),
            "No unique transition 'publish' from state 'public' (0 matches)"
        );
    }
}
