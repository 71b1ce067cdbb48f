//! # uniflow
//!
//! A unidirectional state container with a composable interceptor pipeline.
//! Actions are dispatched against a single [`Store`], processed through an
//! ordered chain of [`Interceptor`]s, and may produce both a new state and
//! a set of declarative effects that registered handlers execute.
//!
//! ```text
//! dispatch(action)
//!   → Store builds Context { coeffects: { state }, effects: {} }
//!   → before pass, in registration order
//!   → after pass, in reverse (do-effects runs first)
//!   → Store commits effects["state"] as the new current state
//! ```
//!
//! Side effects are described, not performed, by chain handlers: a reducer
//! registered with [`Store::register_event_state`] only declares the next
//! state, and [`Store::register_event_effects`] handlers declare arbitrary
//! keyed effects. The terminal `do-effects` interceptor appended to every
//! chain hands each declared effect to the handler registered for its key
//! with [`Store::register_effect`].
//!
//! # Example
//!
//! ```
//! use uniflow::{Action, Store};
//!
//! struct AddTodo {
//!     name: String,
//! }
//!
//! impl Action for AddTodo {
//!     const NAME: &'static str = "AddTodo";
//! }
//!
//! let store = Store::new(Vec::<String>::new());
//! store.register_event_state(vec![], |mut todos: Vec<String>, action: &AddTodo| {
//!     todos.push(action.name.clone());
//!     todos
//! });
//!
//! store.dispatch(AddTodo { name: "Do Stuff".into() })?;
//! assert_eq!(store.state(), ["Do Stuff"]);
//! # Ok::<(), uniflow::UniflowError>(())
//! ```
//!
//! # Failure semantics
//!
//! Dispatching an action kind with no registered chain, or declaring an
//! effect key with no registered handler, is a wiring bug between producers
//! and consumers: both surface as errors marked
//! [`UniflowError::is_wiring_error`] and abort the dispatch rather than
//! degrade silently. Errors from caller-written stages propagate unmodified
//! with no retry and no rollback of effects already executed.

pub mod action;
mod chain;
pub mod context;
pub mod effects;
pub mod error;
pub mod interceptor;
mod registry;
pub mod store;

pub use action::Action;
pub use context::{Coeffects, Context};
pub use effects::{EffectKey, Effects};
pub use error::UniflowError;
pub use interceptor::{after, enrich, Interceptor, Stage};
pub use store::Store;
