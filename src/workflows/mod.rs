// Workflow engine: declarative state machines attached to domain objects.
//
// A `Machine` holds the state graph; a `Workflow` walks a domain object
// through it by rewriting one attribute on the object.

pub mod types;
pub mod errors;
pub mod transition;
pub mod machine;
pub mod workflow;
pub mod definition;
pub mod registry;

#[cfg(test)]
pub mod mocks;

pub use types::{Extras, State, StateAttributes};
pub use errors::{Result, WorkflowError};
pub use transition::{Callback, Transition};
pub use machine::Machine;
pub use workflow::Workflow;
pub use definition::{StateDefinition, TransitionDefinition, WorkflowDefinition};
pub use registry::{CallbackRegistry, WorkflowRegistry};
