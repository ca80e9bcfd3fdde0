// Declarative workflow definitions
//
// A definition file describes one workflow: its states, its transitions
// (callbacks referenced by name) and how it binds to domain objects.
//
//   name = "theworkflow"
//   for = "Content"
//   initial_state = "private"
//
//   [[states]]
//   name = "private"
//   title = "Private"
//
//   [[transitions]]
//   name = "private_to_public"
//   from_state = "private"
//   to_state = "public"
//   callback = "notify"
//   permission = "moderate"

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use super::errors::{Result, WorkflowError};
use super::machine::Machine;
use super::registry::CallbackRegistry;
use super::transition::Transition;
use super::types::{Extras, StateAttributes};
use super::workflow::Workflow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub name: String,
    /// Object type this workflow is bound to; `None` binds it to any type
    #[serde(rename = "for", default, skip_serializing_if = "Option::is_none")]
    pub for_type: Option<String>,
    pub initial_state: String,
    /// Attribute holding the state; defaults to the workflow name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_attr: Option<String>,
    #[serde(default)]
    pub states: Vec<StateDefinition>,
    #[serde(default)]
    pub transitions: Vec<TransitionDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDefinition {
    pub name: String,
    #[serde(flatten)]
    pub extras: Extras,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionDefinition {
    pub name: String,
    pub from_state: String,
    pub to_state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,
    #[serde(flatten)]
    pub extras: Extras,
}

impl WorkflowDefinition {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        let definition = Self::from_toml_str(&source)?;
        info!(
            path = %path.as_ref().display(),
            workflow = %definition.name,
            "Loaded workflow definition"
        );
        Ok(definition)
    }

    pub fn state_attr(&self) -> &str {
        self.state_attr.as_deref().unwrap_or(&self.name)
    }

    /// Callback names referenced by transitions, deduplicated, in order of use.
    pub fn callback_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.transitions.iter().filter_map(|t| t.callback.as_deref()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Build the machine: every state first, then transitions in declaration order.
    pub fn build_machine<T>(&self, callbacks: &CallbackRegistry<T>) -> Result<Machine<T>> {
        let mut machine = Machine::new();
        for state in &self.states {
            machine.add_state(state.name.clone(), state.extras.clone())?;
        }

        for def in &self.transitions {
            let callback = match &def.callback {
                Some(name) => Some(callbacks.get(name).ok_or_else(|| {
                    WorkflowError::UnknownCallback { name: name.clone() }
                })?),
                None => None,
            };

            let mut transition = Transition::new(&def.name, &def.from_state, &def.to_state)
                .with_shared_callback(callback)
                .with_extras(def.extras.clone());
            if let Some(permission) = &def.permission {
                transition = transition.with_permission(permission);
            }
            machine.add_transition(transition)?;
        }

        Ok(machine)
    }

    pub fn build<T: StateAttributes>(&self, callbacks: &CallbackRegistry<T>) -> Result<Workflow<T>> {
        let machine = self.build_machine(callbacks)?;
        Workflow::new(machine, self.state_attr(), &self.initial_state)
    }
}
