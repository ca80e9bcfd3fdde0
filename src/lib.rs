// Workflow Engine Library - declarative state machines for domain objects
// This exposes the engine, its definition layer and the ambient helpers

pub mod workflows;
pub mod config;
pub mod telemetry;

#[doc(hidden)]
pub use serde_json;

// Re-export key types for easy access
pub use workflows::{
    Callback,
    CallbackRegistry,
    Extras,
    Machine,
    State,
    StateAttributes,
    Transition,
    Workflow,
    WorkflowDefinition,
    WorkflowError,
    WorkflowRegistry,
};
pub use config::{EngineConfig, ObservabilityConfig};
pub use telemetry::{init_telemetry, transition_span};
