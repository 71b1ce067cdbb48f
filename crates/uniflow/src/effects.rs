//! Declarative effects and their execution
//!
//! A chain run does not perform side effects directly; it accumulates them
//! as named entries in an [`Effects`] map. The terminal `do-effects`
//! interceptor appended to every registered chain walks the final map in its
//! after stage and hands each value to the handler registered for its key.
//!
//! Producers and consumers agree on each key's value type out-of-band; the
//! store checks it where it can (handler registration captures the expected
//! type, and a mismatched value surfaces as a typed error rather than a
//! silent cast).

use std::any::Any;
use std::collections::HashMap;

use crate::context::Context;
use crate::error::UniflowError;
use crate::interceptor::Interceptor;

/// Identifier for an effect category, agreed between producer and consumer.
pub type EffectKey = &'static str;

/// Reserved effect key whose value is the replacement state.
///
/// A chain that wants to change the store's state writes the next state
/// under this key; the store commits it once the chain completes. This is
/// the only path by which a store's state changes.
pub const STATE: EffectKey = "state";

/// Declarative outputs accumulated during a chain run.
///
/// Values are type-erased; [`insert`](Self::insert) and
/// [`get`](Self::get) recover the concrete types. Iteration order across
/// keys is unspecified, and effect handlers must not depend on the relative
/// execution order of distinct keys.
#[derive(Default)]
pub struct Effects {
    entries: HashMap<EffectKey, Box<dyn Any>>,
}

impl Effects {
    /// Create an empty effects map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an effect, replacing any previous value under the same key.
    pub fn insert<T: 'static>(&mut self, key: EffectKey, value: T) {
        self.entries.insert(key, Box::new(value));
    }

    /// Builder-style [`insert`](Self::insert), for effect-map handlers.
    ///
    /// ```
    /// use uniflow::effects::{self, Effects};
    ///
    /// let effects = Effects::new()
    ///     .with(effects::STATE, vec!["a".to_string()])
    ///     .with("counter", 1u32);
    /// assert_eq!(effects.len(), 2);
    /// ```
    #[must_use]
    pub fn with<T: 'static>(mut self, key: EffectKey, value: T) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up an effect value by key and concrete type.
    #[must_use]
    pub fn get<T: 'static>(&self, key: EffectKey) -> Option<&T> {
        self.entries.get(key).and_then(|value| value.downcast_ref())
    }

    /// Whether an effect is recorded under `key`.
    #[must_use]
    pub fn contains(&self, key: EffectKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of recorded effects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no effects are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge `other` into this map, overwriting on key collision.
    pub fn merge(&mut self, other: Effects) {
        self.entries.extend(other.entries);
    }

    /// Remove and return the raw value under `key`.
    pub(crate) fn remove(&mut self, key: EffectKey) -> Option<Box<dyn Any>> {
        self.entries.remove(key)
    }

    /// Iterate over recorded effects in unspecified order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (EffectKey, &dyn Any)> {
        self.entries.iter().map(|(key, value)| (*key, value.as_ref()))
    }
}

impl std::fmt::Debug for Effects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

/// Diagnostic name of the effect-execution interceptor.
pub(crate) const DO_EFFECTS: &str = "do-effects";

/// Build the terminal interceptor that executes declared effects.
///
/// Appended as the final link of every registered chain, so its after stage
/// runs first in the after pass. For every entry in the context's effects
/// map it invokes the handler registered for that key; a key with no
/// handler aborts the run with [`UniflowError::UnhandledEffect`].
pub(crate) fn do_effects<S: 'static>() -> Interceptor<S> {
    Interceptor::on_after(DO_EFFECTS, |ctx: Context<S>| {
        for (key, value) in ctx.effects.iter() {
            let handler = ctx.registry().borrow().effect_handler(key);
            match handler {
                Some(handler) => handler(value)?,
                None => {
                    tracing::error!(key, "declared effect has no registered handler");
                    return Err(UniflowError::UnhandledEffect { key });
                }
            }
        }
        Ok(ctx)
    })
}
