use std::collections::HashMap;

use tracing::{debug, warn};

use super::errors::{Result, WorkflowError};
use super::transition::Transition;
use super::types::{Extras, State};

/// State and transition definitions for one workflow.
///
/// Built once at configuration time through `add_state`/`add_transition`,
/// then shared read-only (typically behind an `Arc`). No method here touches
/// a domain object's state attribute; that is the `Workflow`'s job.
pub struct Machine<T> {
    states: HashMap<String, State>,
    state_order: Vec<String>,
    transitions: Vec<Transition<T>>,
}

impl<T> Default for Machine<T> {
    fn default() -> Self {
        Self {
            states: HashMap::new(),
            state_order: Vec::new(),
            transitions: Vec::new(),
        }
    }
}

impl<T> Machine<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a state. Re-registering a name is a configuration bug and fails.
    pub fn add_state(&mut self, name: impl Into<String>, extras: Extras) -> Result<()> {
        let name = name.into();
        if self.states.contains_key(&name) {
            return Err(WorkflowError::DuplicateState { name });
        }

        debug!(state = %name, "Registered workflow state");
        self.state_order.push(name.clone());
        self.states.insert(name.clone(), State::new(name, extras));
        Ok(())
    }

    /// Register a transition. Both endpoints must already be registered and the
    /// `(name, from_state)` pair must be new; on failure nothing is changed.
    pub fn add_transition(&mut self, transition: Transition<T>) -> Result<()> {
        for state in [&transition.from_state, &transition.to_state] {
            if !self.states.contains_key(state) {
                return Err(WorkflowError::UnknownState {
                    transition: transition.name.clone(),
                    state: state.clone(),
                });
            }
        }

        if self
            .transitions
            .iter()
            .any(|t| t.name == transition.name && t.from_state == transition.from_state)
        {
            return Err(WorkflowError::DuplicateTransition {
                name: transition.name,
                from_state: transition.from_state,
            });
        }

        debug!(
            transition = %transition.name,
            from_state = %transition.from_state,
            to_state = %transition.to_state,
            permission = ?transition.permission,
            "Registered workflow transition"
        );
        self.transitions.push(transition);
        Ok(())
    }

    /// Transitions leaving `from_state`, in registration order. Unknown states
    /// simply have none.
    pub fn transitions(&self, from_state: &str) -> Vec<&Transition<T>> {
        self.transitions
            .iter()
            .filter(|t| t.from_state == from_state)
            .collect()
    }

    pub fn transition_names(&self, from_state: &str) -> Vec<&str> {
        self.transitions(from_state)
            .into_iter()
            .map(|t| t.name.as_str())
            .collect()
    }

    pub fn all_transitions(&self) -> &[Transition<T>] {
        &self.transitions
    }

    /// Find the single transition named `name` leaving `from_state`.
    pub fn find(&self, from_state: &str, name: &str) -> Result<&Transition<T>> {
        let mut matches = self
            .transitions
            .iter()
            .filter(|t| t.from_state == from_state && t.name == name);

        match (matches.next(), matches.count()) {
            (Some(transition), 0) => Ok(transition),
            (first, rest) => Err(WorkflowError::InvalidTransition {
                from_state: from_state.to_string(),
                name: name.to_string(),
                matches: first.map_or(0, |_| 1 + rest),
            }),
        }
    }

    /// Run the callback of the transition `name` from `from_state` against
    /// `obj` and return the destination state. The object's state attribute is
    /// left alone; callback errors come back as `WorkflowError::Callback`.
    pub fn execute(&self, from_state: &str, name: &str, obj: &mut T) -> Result<String> {
        let transition = self.find(from_state, name)?;

        if let Err(e) = transition.fire(obj) {
            warn!(
                transition = %name,
                from_state = %from_state,
                error = %e,
                "Transition callback failed"
            );
            return Err(WorkflowError::Callback(e));
        }

        Ok(transition.to_state.clone())
    }

    pub fn state(&self, name: &str) -> Option<&State> {
        self.states.get(name)
    }

    pub fn has_state(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    /// Registered states in registration order.
    pub fn states(&self) -> Vec<&State> {
        self.state_order
            .iter()
            .filter_map(|name| self.states.get(name))
            .collect()
    }
}

impl<T> std::fmt::Debug for Machine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Machine")
            .field("states", &self.state_order)
            .field("transitions", &self.transitions)
            .finish()
    }
}
