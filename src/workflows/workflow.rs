use std::sync::Arc;

use tracing::{info, warn};

use super::errors::{Result, WorkflowError};
use super::machine::Machine;
use super::transition::Transition;
use super::types::{State, StateAttributes};

/// A machine bound to the attribute that holds a domain object's state and to
/// the state new objects start in.
///
/// The workflow never keeps a reference to the objects it drives. Transitions
/// on one object are read-modify-write; callers sharing an object across
/// threads must serialize transitions on it themselves.
pub struct Workflow<T> {
    machine: Arc<Machine<T>>,
    state_attr: String,
    initial_state: String,
}

impl<T> Clone for Workflow<T> {
    fn clone(&self) -> Self {
        Self {
            machine: Arc::clone(&self.machine),
            state_attr: self.state_attr.clone(),
            initial_state: self.initial_state.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Workflow<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workflow")
            .field("state_attr", &self.state_attr)
            .field("initial_state", &self.initial_state)
            .field("machine", &self.machine)
            .finish()
    }
}

impl<T: StateAttributes> Workflow<T> {
    /// Wrap a fully built machine. `initial_state` must be one of its states.
    pub fn new(
        machine: Machine<T>,
        state_attr: impl Into<String>,
        initial_state: impl Into<String>,
    ) -> Result<Self> {
        Self::from_shared(Arc::new(machine), state_attr, initial_state)
    }

    /// Like `new`, for a machine already shared by other workflows.
    pub fn from_shared(
        machine: Arc<Machine<T>>,
        state_attr: impl Into<String>,
        initial_state: impl Into<String>,
    ) -> Result<Self> {
        let initial_state = initial_state.into();
        if !machine.has_state(&initial_state) {
            return Err(WorkflowError::UnknownInitialState {
                state: initial_state,
            });
        }

        Ok(Self {
            machine,
            state_attr: state_attr.into(),
            initial_state,
        })
    }

    pub fn machine(&self) -> &Machine<T> {
        &self.machine
    }

    pub fn state_attr(&self) -> &str {
        &self.state_attr
    }

    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    /// Put `obj` into the initial state, overwriting any state it already has.
    pub fn initialize(&self, obj: &mut T) {
        obj.set_state_attr(&self.state_attr, &self.initial_state);
        info!(
            state_attr = %self.state_attr,
            state = %self.initial_state,
            "Initialized workflow object"
        );
    }

    pub fn state_of(&self, obj: &T) -> Result<String> {
        obj.state_attr(&self.state_attr)
            .map(str::to_string)
            .ok_or_else(|| WorkflowError::Uninitialized {
                state_attr: self.state_attr.clone(),
            })
    }

    /// State record (title, description, ...) for the object's current state.
    pub fn current_state_info(&self, obj: &T) -> Result<Option<&State>> {
        let state = self.state_of(obj)?;
        Ok(self.machine.state(&state))
    }

    /// Transitions available from the object's current state.
    pub fn transitions(&self, obj: &T) -> Result<Vec<&Transition<T>>> {
        let state = self.state_of(obj)?;
        Ok(self.machine.transitions(&state))
    }

    /// Permission the caller must check before applying `name` to `obj`.
    /// Only reported; this crate never enforces it.
    pub fn permission_for(&self, obj: &T, name: &str) -> Result<Option<&str>> {
        let state = self.state_of(obj)?;
        Ok(self.machine.find(&state, name)?.permission())
    }

    /// Apply transition `name` to `obj`. The state attribute is written only
    /// after the callback succeeds; any error leaves it unchanged.
    pub fn transition(&self, obj: &mut T, name: &str) -> Result<()> {
        let from_state = self.state_of(obj)?;

        let to_state = match self.machine.execute(&from_state, name, obj) {
            Ok(to_state) => to_state,
            Err(e) => {
                warn!(
                    transition = %name,
                    from_state = %from_state,
                    error = %e,
                    "Transition rejected"
                );
                return Err(e);
            }
        };

        obj.set_state_attr(&self.state_attr, &to_state);
        info!(
            transition = %name,
            from_state = %from_state,
            to_state = %to_state,
            "Transition committed"
        );
        Ok(())
    }

    /// Apply the one transition leading from the object's current state to
    /// `to_state`. Fails if there is no such transition or more than one.
    pub fn transition_to_state(&self, obj: &mut T, to_state: &str) -> Result<()> {
        let from_state = self.state_of(obj)?;
        let candidates: Vec<String> = self
            .machine
            .transitions(&from_state)
            .into_iter()
            .filter(|t| t.to_state == to_state)
            .map(|t| t.name.clone())
            .collect();

        match candidates.as_slice() {
            [name] => self.transition(obj, name),
            _ => Err(WorkflowError::NoPathToState {
                from_state,
                to_state: to_state.to_string(),
                matches: candidates.len(),
            }),
        }
    }
}
