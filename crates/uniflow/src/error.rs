//! Categorized dispatch errors
//!
//! Two of these variants are wiring bugs between effect producers and
//! consumers and are unrecoverable by design; the rest propagate caller
//! mistakes or caller-written interceptor failures unmodified. Use
//! [`UniflowError::is_wiring_error`] to tell the two classes apart.

use crate::effects::EffectKey;
use thiserror::Error;

/// Errors surfaced by [`Store::dispatch`](crate::Store::dispatch).
#[derive(Debug, Error)]
pub enum UniflowError {
    /// An action was dispatched with no chain registered for its kind.
    ///
    /// Dispatching an unknown action type is a programming mistake, not a
    /// runtime condition to recover from.
    #[error("no interceptor chain registered for action `{action}`")]
    UnregisteredAction {
        /// Name of the dispatched action kind.
        action: &'static str,
    },

    /// A chain declared an effect for which no handler is registered.
    ///
    /// A declared effect with no handler corrupts the contract between the
    /// producer and consumer of that effect key, so the run stops here.
    #[error("no effect handler registered for key `{key}`")]
    UnhandledEffect {
        /// Effect key that had no handler when the effects ran.
        key: EffectKey,
    },

    /// The dispatched payload does not downcast to the action kind the
    /// chain was registered for.
    #[error("payload dispatched as `{action}` does not match its registered type")]
    ActionType {
        /// Name of the action kind the chain was registered for.
        action: &'static str,
    },

    /// An effect value does not downcast to the type its handler was
    /// registered with.
    #[error("effect value under key `{key}` does not match its handler's registered type")]
    EffectValueType {
        /// Effect key whose value had an unexpected type.
        key: EffectKey,
    },

    /// A caller-written interceptor stage failed.
    ///
    /// Propagated to the dispatch caller unmodified; the remainder of the
    /// chain is abandoned and effects already executed stay executed.
    #[error("interceptor `{name}` failed")]
    Interceptor {
        /// Diagnostic name of the failing interceptor.
        name: String,
        /// Underlying failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl UniflowError {
    /// Whether this error signals a producer/consumer wiring bug.
    ///
    /// Wiring errors ([`UnregisteredAction`](Self::UnregisteredAction) and
    /// [`UnhandledEffect`](Self::UnhandledEffect)) are deliberately
    /// unrecoverable: silent continuation would hide state corruption.
    #[must_use]
    pub fn is_wiring_error(&self) -> bool {
        matches!(
            self,
            Self::UnregisteredAction { .. } | Self::UnhandledEffect { .. }
        )
    }
}
