//! The state container
//!
//! A [`Store`] owns the current state and the registration tables for its
//! lifetime, and drives dispatch:
//!
//! ```text
//! dispatch(action)
//!   → resolve chain for the action's kind
//!   → fresh Context { coeffects: { state: current }, effects: {} }
//!   → before pass (handlers read coeffects, write effects)
//!   → after pass in reverse (do-effects first, then outer interceptors)
//!   → commit effects["state"], if declared, as the new current state
//! ```
//!
//! Dispatch is fully synchronous and single-threaded; the store is
//! deliberately not `Send`. Re-entrant dispatch from an effect handler is
//! legal and runs as a fully nested call — there is no reentrancy guard, so
//! infinite mutual dispatch is a caller error. A host with threads must
//! serialize all dispatch calls on one logical owner.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::action::Action;
use crate::chain;
use crate::context::{Coeffects, Context};
use crate::effects::{self, EffectKey, Effects};
use crate::error::UniflowError;
use crate::interceptor::Interceptor;
use crate::registry::{Chain, EffectHandler, Registry};

/// Owner of the current state and sole writer of it.
///
/// Exactly one current state instance exists at any time; it is replaced
/// wholesale when a dispatch declares a `state` effect, never partially
/// mutated in place.
pub struct Store<S> {
    state: RefCell<S>,
    registry: Rc<RefCell<Registry<S>>>,
}

impl<S: Clone + 'static> Store<S> {
    /// Create a store around an initial state.
    #[must_use]
    pub fn new(initial_state: S) -> Self {
        let registry = Rc::new(RefCell::new(Registry::new()));
        // The state effect is committed by `dispatch` once the chain
        // returns, so the registered handler is inert; registering the key
        // keeps `do-effects` from treating a declared state replacement as
        // unhandled.
        registry
            .borrow_mut()
            .register_effect_handler(effects::STATE, Rc::new(|_value| Ok(())));

        Self {
            state: RefCell::new(initial_state),
            registry,
        }
    }

    /// The current state.
    ///
    /// Safe to call at any time, including from inside an effect handler —
    /// a handler observes the value as of before the in-flight dispatch
    /// commits.
    #[must_use]
    pub fn state(&self) -> S {
        self.state.borrow().clone()
    }

    /// Dispatch an action through its registered chain.
    ///
    /// Errors with [`UniflowError::UnregisteredAction`] if no chain is
    /// registered for `A`, and with [`UniflowError::UnhandledEffect`] if
    /// the chain declares an effect key without a handler. Both are wiring
    /// bugs; see [`UniflowError::is_wiring_error`]. Any error aborts the
    /// rest of the chain with no rollback of effects already executed.
    pub fn dispatch<A: Action>(&self, action: A) -> Result<(), UniflowError> {
        let chain = match self.registry.borrow().chain(A::NAME) {
            Some(chain) => chain.clone(),
            None => {
                tracing::error!(action = A::NAME, "dispatched action has no registered chain");
                return Err(UniflowError::UnregisteredAction { action: A::NAME });
            }
        };

        tracing::debug!(action = A::NAME, "dispatching");
        let ctx = Context::new(
            A::NAME,
            Rc::new(action),
            self.state.borrow().clone(),
            Rc::clone(&self.registry),
        );
        let mut ctx = chain::execute(&chain, ctx)?;

        // Sole state-mutation path: commit happens once, here, after the
        // entire chain (including effect execution) has completed.
        if let Some(value) = ctx.effects.remove(effects::STATE) {
            let next = value
                .downcast::<S>()
                .map_err(|_| UniflowError::EffectValueType {
                    key: effects::STATE,
                })?;
            *self.state.borrow_mut() = *next;
        }

        Ok(())
    }

    /// Register a reducer for an action kind.
    ///
    /// Builds a terminal interceptor whose before stage reads the state
    /// coeffect, calls `reducer(state, action)`, and declares the result as
    /// the `state` effect. The stored chain is `interceptors`, then the
    /// terminal, then the effect-execution interceptor.
    ///
    /// Re-registering the same action kind replaces its chain.
    pub fn register_event_state<A, F>(&self, interceptors: Vec<Interceptor<S>>, reducer: F)
    where
        A: Action,
        F: Fn(S, &A) -> S + 'static,
    {
        let terminal = Interceptor::on_before("event-state", move |mut ctx: Context<S>| {
            let action = ctx.action_as::<A>()?;
            let next = reducer(ctx.coeffects.state().clone(), &action);
            ctx.effects.insert(effects::STATE, next);
            Ok(ctx)
        });
        self.register_chain(A::NAME, interceptors, terminal);
    }

    /// Register an effect-map handler for an action kind.
    ///
    /// Like [`register_event_state`](Self::register_event_state), but the
    /// handler reads the coeffects and returns a whole [`Effects`] map,
    /// merged into the context's effects (overwriting on key collision).
    /// This lets a single action produce several named effects, e.g. a
    /// state replacement plus a custom side-effect description.
    pub fn register_event_effects<A, F>(&self, interceptors: Vec<Interceptor<S>>, handler: F)
    where
        A: Action,
        F: Fn(&Coeffects<S>, &A) -> Effects + 'static,
    {
        let terminal = Interceptor::on_before("event-effects", move |mut ctx: Context<S>| {
            let action = ctx.action_as::<A>()?;
            let produced = handler(&ctx.coeffects, &action);
            ctx.effects.merge(produced);
            Ok(ctx)
        });
        self.register_chain(A::NAME, interceptors, terminal);
    }

    /// Register a handler for an effect key.
    ///
    /// The handler's value type is captured here, at registration time; an
    /// effect value that does not downcast to `T` fails the dispatch with
    /// [`UniflowError::EffectValueType`]. Last registration for a key wins.
    pub fn register_effect<T, F>(&self, key: EffectKey, handler: F)
    where
        T: 'static,
        F: Fn(&T) + 'static,
    {
        let wrapped: EffectHandler = Rc::new(move |value: &dyn Any| {
            let value = value
                .downcast_ref::<T>()
                .ok_or(UniflowError::EffectValueType { key })?;
            handler(value);
            Ok(())
        });
        self.registry.borrow_mut().register_effect_handler(key, wrapped);
    }

    /// Assemble and store a chain, always terminated by `do-effects`.
    fn register_chain(
        &self,
        action: &'static str,
        interceptors: Vec<Interceptor<S>>,
        terminal: Interceptor<S>,
    ) {
        let mut chain: Chain<S> = interceptors.into_iter().map(Rc::new).collect();
        chain.push(Rc::new(terminal));
        chain.push(Rc::new(effects::do_effects()));
        self.registry.borrow_mut().register_chain(action, chain);
    }
}

impl<S> std::fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("registry", &self.registry.borrow())
            .finish_non_exhaustive()
    }
}
