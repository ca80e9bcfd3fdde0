use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use super::definition::WorkflowDefinition;
use super::errors::{Result, WorkflowError};
use super::transition::{Callback, Transition};
use super::types::StateAttributes;
use super::workflow::Workflow;

/// Named callbacks that definition files can refer to
pub struct CallbackRegistry<T> {
    callbacks: HashMap<String, Callback<T>>,
}

impl<T> Default for CallbackRegistry<T> {
    fn default() -> Self {
        Self {
            callbacks: HashMap::new(),
        }
    }
}

impl<T> CallbackRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: Fn(&mut T, &Transition<T>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register_shared(name, Arc::new(callback));
    }

    pub fn register_shared(&mut self, name: impl Into<String>, callback: Callback<T>) {
        let name = name.into();
        debug!(callback = %name, "Registered workflow callback");
        self.callbacks.insert(name, callback);
    }

    pub fn get(&self, name: &str) -> Option<Callback<T>> {
        self.callbacks.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.callbacks.contains_key(name)
    }
}

type WorkflowKey = (String, Option<String>);

/// Explicit mapping from `(workflow name, object type)` to a workflow.
/// A registration without an object type applies to every type.
pub struct WorkflowRegistry<T> {
    workflows: HashMap<WorkflowKey, Arc<Workflow<T>>>,
}

impl<T> Default for WorkflowRegistry<T> {
    fn default() -> Self {
        Self {
            workflows: HashMap::new(),
        }
    }
}

impl<T: StateAttributes> WorkflowRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        object_type: Option<&str>,
        workflow: Workflow<T>,
    ) -> Result<Arc<Workflow<T>>> {
        let key = (name.into(), object_type.map(str::to_string));
        if self.workflows.contains_key(&key) {
            return Err(WorkflowError::DuplicateWorkflow {
                name: key.0,
                object_type: key.1,
            });
        }

        info!(workflow = %key.0, object_type = ?key.1, "Registered workflow");
        let workflow = Arc::new(workflow);
        self.workflows.insert(key, Arc::clone(&workflow));
        Ok(workflow)
    }

    /// Resolve the workflow for `object_type`, falling back to the
    /// registration that applies to every type.
    pub fn lookup(&self, name: &str, object_type: Option<&str>) -> Result<Arc<Workflow<T>>> {
        let exact = object_type
            .and_then(|ty| self.workflows.get(&(name.to_string(), Some(ty.to_string()))));
        exact
            .or_else(|| self.workflows.get(&(name.to_string(), None)))
            .cloned()
            .ok_or_else(|| WorkflowError::UnknownWorkflow {
                name: name.to_string(),
                object_type: object_type.map(str::to_string),
            })
    }

    pub fn register_definition(
        &mut self,
        definition: &WorkflowDefinition,
        callbacks: &CallbackRegistry<T>,
    ) -> Result<Arc<Workflow<T>>> {
        let workflow = definition.build(callbacks)?;
        self.register(&definition.name, definition.for_type.as_deref(), workflow)
    }

    /// Parse and register definition files in order; stops at the first failure.
    pub fn load_definitions<P: AsRef<Path>>(
        &mut self,
        paths: &[P],
        callbacks: &CallbackRegistry<T>,
    ) -> Result<()> {
        for path in paths {
            let definition = WorkflowDefinition::from_path(path)?;
            self.register_definition(&definition, callbacks)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }
}
