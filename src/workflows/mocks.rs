// Test doubles for workflow unit tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::transition::{Callback, Transition};
use super::types::StateAttributes;

/// Minimal content object with a name and arbitrary string attributes
#[derive(Debug, Clone, Default)]
pub struct DummyContent {
    pub name: String,
    attrs: HashMap<String, String>,
}

impl DummyContent {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: HashMap::new(),
        }
    }
}

impl StateAttributes for DummyContent {
    fn state_attr(&self, attr: &str) -> Option<&str> {
        self.attrs.get(attr).map(String::as_str)
    }

    fn set_state_attr(&mut self, attr: &str, state: &str) {
        self.attrs.insert(attr.to_string(), state.to_string());
    }
}

/// Records every callback invocation as `(content name, transition name)`
#[derive(Debug, Clone, Default)]
pub struct CallRecorder {
    calls: Arc<Mutex<Vec<(String, String)>>>,
    failure: Option<String>,
}

impl CallRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder whose callback records the call and then fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            calls: Arc::default(),
            failure: Some(message.to_string()),
        }
    }

    pub fn callback(&self) -> Callback<DummyContent> {
        let calls = Arc::clone(&self.calls);
        let failure = self.failure.clone();
        Arc::new(move |content: &mut DummyContent, transition: &Transition<DummyContent>| {
            calls
                .lock()
                .unwrap()
                .push((content.name.clone(), transition.name.clone()));
            match &failure {
                Some(message) => Err(anyhow::anyhow!(message.clone())),
                None => Ok(()),
            }
        })
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}
