//! Per-dispatch context
//!
//! A [`Context`] is created fresh for every dispatch, threaded by value
//! through each interceptor stage, and discarded when the run finishes. It
//! carries the dispatched action (type-erased), the readable ambient inputs
//! ([`Coeffects`]), the accumulated declarative outputs
//! ([`Effects`](crate::Effects)), and the chain-traversal bookkeeping the
//! executor maintains.
//!
//! The bookkeeping (remaining queue, executed stack) is crate-private:
//! stages only ever see the coeffects, the effects, and the action.

use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use crate::action::Action;
use crate::effects::Effects;
use crate::error::UniflowError;
use crate::interceptor::Interceptor;
use crate::registry::Registry;

/// Readable ambient inputs for a chain run.
///
/// The reserved `state` input is seeded by the store with the pre-dispatch
/// state and held as a typed field; application-defined inputs live in a
/// string-keyed side map with typed accessors.
pub struct Coeffects<S> {
    state: S,
    extra: HashMap<&'static str, Box<dyn Any>>,
}

impl<S> Coeffects<S> {
    pub(crate) fn new(state: S) -> Self {
        Self {
            state,
            extra: HashMap::new(),
        }
    }

    /// The state this chain run computes against.
    ///
    /// Seeded with the pre-dispatch state; an
    /// [`enrich`](crate::interceptor::enrich) interceptor may replace it
    /// mid-run for the benefit of later interceptors.
    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Replace the state coeffect.
    ///
    /// This changes what later interceptors read as their input; it does
    /// not touch the store's current state.
    pub fn set_state(&mut self, state: S) {
        self.state = state;
    }

    /// Record an application-defined ambient input.
    pub fn insert<T: 'static>(&mut self, key: &'static str, value: T) {
        self.extra.insert(key, Box::new(value));
    }

    /// Look up an application-defined ambient input by key and type.
    #[must_use]
    pub fn get<T: 'static>(&self, key: &'static str) -> Option<&T> {
        self.extra.get(key).and_then(|value| value.downcast_ref())
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Coeffects<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coeffects")
            .field("state", &self.state)
            .field("extra", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The mutable unit of state threaded through one chain run.
///
/// Owned exclusively by the chain executor for the duration of a dispatch;
/// each stage takes it by value and returns it, so no stage can hold on to
/// it across dispatches.
pub struct Context<S> {
    action: Rc<dyn Any>,
    action_name: &'static str,
    /// Readable ambient inputs, seeded with the pre-dispatch state.
    pub coeffects: Coeffects<S>,
    /// Declarative outputs accumulated by the run.
    pub effects: Effects,
    pub(crate) queue: VecDeque<Rc<Interceptor<S>>>,
    pub(crate) stack: Vec<Rc<Interceptor<S>>>,
    registry: Rc<RefCell<Registry<S>>>,
}

impl<S> Context<S> {
    pub(crate) fn new(
        action_name: &'static str,
        action: Rc<dyn Any>,
        state: S,
        registry: Rc<RefCell<Registry<S>>>,
    ) -> Self {
        Self {
            action,
            action_name,
            coeffects: Coeffects::new(state),
            effects: Effects::new(),
            queue: VecDeque::new(),
            stack: Vec::new(),
            registry,
        }
    }

    /// Name of the dispatched action kind.
    #[must_use]
    pub fn action_name(&self) -> &'static str {
        self.action_name
    }

    /// Downcast the dispatched action to its concrete kind.
    ///
    /// Fails with [`UniflowError::ActionType`] if the payload does not
    /// match `A`, which indicates two action kinds sharing a name.
    pub fn action_as<A: Action>(&self) -> Result<Rc<A>, UniflowError> {
        Rc::clone(&self.action)
            .downcast::<A>()
            .map_err(|_| UniflowError::ActionType {
                action: self.action_name,
            })
    }

    /// Handle to the owning store's registry, for effect execution.
    pub(crate) fn registry(&self) -> &Rc<RefCell<Registry<S>>> {
        &self.registry
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Context<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("action", &self.action_name)
            .field("coeffects", &self.coeffects)
            .field("effects", &self.effects)
            .field("queued", &self.queue.len())
            .field("executed", &self.stack.len())
            .finish()
    }
}
