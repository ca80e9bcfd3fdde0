use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::types::Extras;

/// Side effect run when a transition executes. Receives the domain object and
/// the transition being applied; an `Err` aborts the transition.
pub type Callback<T> = Arc<dyn Fn(&mut T, &Transition<T>) -> anyhow::Result<()> + Send + Sync>;

/// A named, directed edge between two states
pub struct Transition<T> {
    pub name: String,
    pub from_state: String,
    pub to_state: String,
    pub callback: Option<Callback<T>>,
    /// Opaque permission identifier, reported to callers but never checked here
    pub permission: Option<String>,
    pub extras: Extras,
}

impl<T> Transition<T> {
    pub fn new(
        name: impl Into<String>,
        from_state: impl Into<String>,
        to_state: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            from_state: from_state.into(),
            to_state: to_state.into(),
            callback: None,
            permission: None,
            extras: Extras::new(),
        }
    }

    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut T, &Transition<T>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }

    pub fn with_shared_callback(mut self, callback: Option<Callback<T>>) -> Self {
        self.callback = callback;
        self
    }

    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    pub fn with_extras(mut self, extras: Extras) -> Self {
        self.extras.extend(extras);
        self
    }

    pub fn permission(&self) -> Option<&str> {
        self.permission.as_deref()
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    pub fn title(&self) -> Option<&str> {
        self.extras.get("title").and_then(Value::as_str)
    }

    /// Run the callback, if any, against `obj`.
    pub(crate) fn fire(&self, obj: &mut T) -> anyhow::Result<()> {
        match &self.callback {
            Some(callback) => callback(obj, self),
            None => Ok(()),
        }
    }
}

// Manual impls: deriving would demand `T: Clone`/`T: Debug` for the object type.
impl<T> Clone for Transition<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            from_state: self.from_state.clone(),
            to_state: self.to_state.clone(),
            callback: self.callback.clone(),
            permission: self.permission.clone(),
            extras: self.extras.clone(),
        }
    }
}

impl<T> fmt::Debug for Transition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("name", &self.name)
            .field("from_state", &self.from_state)
            .field("to_state", &self.to_state)
            .field("callback", &self.callback.as_ref().map(|_| "<callback>"))
            .field("permission", &self.permission)
            .field("extras", &self.extras)
            .finish()
    }
}
