// Core types shared by machines and workflows

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Open-ended metadata attached to states and transitions (title, description, ...)
pub type Extras = BTreeMap<String, Value>;

/// A named node in a workflow graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub name: String,
    #[serde(default)]
    pub extras: Extras,
}

impl State {
    pub fn new(name: impl Into<String>, extras: Extras) -> Self {
        Self {
            name: name.into(),
            extras,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.extras.get("title").and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.extras.get("description").and_then(Value::as_str)
    }
}

/// Domain object contract: one named, readable and writable attribute holding
/// the current state name. Nothing else about the object is inspected.
pub trait StateAttributes {
    /// Current value of `attr`, or `None` if the object was never initialized.
    fn state_attr(&self, attr: &str) -> Option<&str>;

    fn set_state_attr(&mut self, attr: &str, state: &str);
}

impl StateAttributes for HashMap<String, String> {
    fn state_attr(&self, attr: &str) -> Option<&str> {
        self.get(attr).map(String::as_str)
    }

    fn set_state_attr(&mut self, attr: &str, state: &str) {
        self.insert(attr.to_string(), state.to_string());
    }
}

impl StateAttributes for BTreeMap<String, String> {
    fn state_attr(&self, attr: &str) -> Option<&str> {
        self.get(attr).map(String::as_str)
    }

    fn set_state_attr(&mut self, attr: &str, state: &str) {
        self.insert(attr.to_string(), state.to_string());
    }
}

/// JSON records: a non-string value under `attr` reads as uninitialized.
impl StateAttributes for serde_json::Map<String, Value> {
    fn state_attr(&self, attr: &str) -> Option<&str> {
        self.get(attr).and_then(Value::as_str)
    }

    fn set_state_attr(&mut self, attr: &str, state: &str) {
        self.insert(attr.to_string(), Value::String(state.to_string()));
    }
}

/// Build an `Extras` map from `key => value` pairs.
#[macro_export]
macro_rules! extras {
    () => {
        $crate::workflows::Extras::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut extras = $crate::workflows::Extras::new();
        $(extras.insert($key.to_string(), $crate::serde_json::json!($value));)+
        extras
    }};
}
