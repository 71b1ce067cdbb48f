//! Per-store registration tables
//!
//! The registry is owned by its store — there is no ambient global — and
//! holds two mappings: action name to interceptor chain, and effect key to
//! handler. Entries are only ever added through the store's registration
//! calls; re-registering a key replaces the previous entry (last
//! registration wins), and nothing is removed.

use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

use crate::effects::EffectKey;
use crate::error::UniflowError;
use crate::interceptor::Interceptor;

/// A fully assembled interceptor chain for one action kind.
pub(crate) type Chain<S> = Vec<Rc<Interceptor<S>>>;

/// A registered effect handler over a type-erased effect value.
///
/// The store wraps every caller-supplied handler so that a value which does
/// not downcast to the handler's registered type surfaces as an error.
pub(crate) type EffectHandler = Rc<dyn Fn(&dyn Any) -> Result<(), UniflowError>>;

/// Registration state owned by one store.
pub(crate) struct Registry<S> {
    chains: HashMap<&'static str, Chain<S>>,
    effect_handlers: HashMap<EffectKey, EffectHandler>,
}

impl<S> Registry<S> {
    pub(crate) fn new() -> Self {
        Self {
            chains: HashMap::new(),
            effect_handlers: HashMap::new(),
        }
    }

    /// Store `chain` under `action`, replacing any previous chain.
    pub(crate) fn register_chain(&mut self, action: &'static str, chain: Chain<S>) {
        if self.chains.insert(action, chain).is_some() {
            tracing::debug!(action, "replacing previously registered chain");
        }
    }

    pub(crate) fn chain(&self, action: &str) -> Option<&Chain<S>> {
        self.chains.get(action)
    }

    /// Store `handler` under `key`, replacing any previous handler.
    pub(crate) fn register_effect_handler(&mut self, key: EffectKey, handler: EffectHandler) {
        if self.effect_handlers.insert(key, handler).is_some() {
            tracing::debug!(key, "replacing previously registered effect handler");
        }
    }

    pub(crate) fn effect_handler(&self, key: &str) -> Option<EffectHandler> {
        self.effect_handlers.get(key).cloned()
    }
}

impl<S> std::fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("actions", &self.chains.keys().collect::<Vec<_>>())
            .field("effects", &self.effect_handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
