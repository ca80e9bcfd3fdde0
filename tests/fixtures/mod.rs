//! Shared fixtures for workflow engine integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use workflow_engine::{
    extras, CallbackRegistry, Machine, StateAttributes, Transition, Workflow,
};

/// The security workflow used across the integration tests, as a definition file
pub const THEWORKFLOW_TOML: &str = include_str!("theworkflow.toml");

/// Content object with a single state slot plus a title for recording
#[derive(Debug, Clone, Default)]
pub struct Content {
    pub title: String,
    pub review_state: Option<String>,
}

impl Content {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            review_state: None,
        }
    }
}

impl StateAttributes for Content {
    fn state_attr(&self, attr: &str) -> Option<&str> {
        match attr {
            "review_state" => self.review_state.as_deref(),
            _ => None,
        }
    }

    fn set_state_attr(&mut self, attr: &str, state: &str) {
        if attr == "review_state" {
            self.review_state = Some(state.to_string());
        }
    }
}

/// One recorded callback invocation
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackCall {
    pub content_title: String,
    pub transition: String,
    pub from_state: String,
    pub to_state: String,
    pub permission: Option<String>,
}

/// Callback double that records invocations and optionally fails
#[derive(Debug, Clone, Default)]
pub struct RecordingCallback {
    calls: Arc<Mutex<Vec<CallbackCall>>>,
    fail_with: Arc<Mutex<Option<String>>>,
}

impl RecordingCallback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(&self, message: &str) {
        *self.fail_with.lock().unwrap() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<CallbackCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn registry(&self) -> CallbackRegistry<Content> {
        let mut registry = CallbackRegistry::new();
        let recorder = self.clone();
        registry.register("callback", move |content: &mut Content, transition: &Transition<Content>| {
            recorder.record(content, transition)
        });
        registry
    }

    pub fn record(&self, content: &Content, transition: &Transition<Content>) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(CallbackCall {
            content_title: content.title.clone(),
            transition: transition.name.clone(),
            from_state: transition.from_state.clone(),
            to_state: transition.to_state.clone(),
            permission: transition.permission.clone(),
        });
        match self.fail_with.lock().unwrap().clone() {
            Some(message) => Err(anyhow::anyhow!(message)),
            None => Ok(()),
        }
    }
}

/// Public/private machine built in code, both transitions using `callback`
pub fn security_workflow(callback: &RecordingCallback) -> Workflow<Content> {
    let mut machine = Machine::new();
    machine
        .add_state("public", extras! { "title" => "Public", "description" => "Everybody can see it" })
        .unwrap();
    machine
        .add_state("private", extras! { "title" => "Private", "description" => "Nobody can see it" })
        .unwrap();

    let first = callback.clone();
    machine
        .add_transition(
            Transition::<Content>::new("private_to_public", "private", "public")
                .with_callback(move |content, t| first.record(content, t)),
        )
        .unwrap();
    let second = callback.clone();
    machine
        .add_transition(
            Transition::<Content>::new("public_to_private", "public", "private")
                .with_callback(move |content, t| second.record(content, t)),
        )
        .unwrap();

    Workflow::new(machine, "review_state", "private").unwrap()
}
