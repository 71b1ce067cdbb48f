//! Interceptors and the standalone interceptor builders
//!
//! An interceptor is a named pair of optional stage functions, `before` and
//! `after`, composed into a chain per action kind. Each stage takes the
//! per-dispatch [`Context`] by value and returns it (possibly replaced), so
//! no stage can retain the context past its own invocation.
//!
//! Interceptors are stateless; anything a stage needs beyond the context
//! must be captured in its closure or read from the coeffects.

use crate::action::Action;
use crate::context::Context;
use crate::error::UniflowError;

/// A single stage of an interceptor: context in, context out.
///
/// Returning an error aborts the remainder of the chain run; the error
/// propagates to the dispatch caller unmodified and effects already
/// executed stay executed.
pub type Stage<S> = Box<dyn Fn(Context<S>) -> Result<Context<S>, UniflowError>>;

/// A named pair of optional `before`/`after` stages.
///
/// The name is diagnostic only: it shows up in traces and in
/// [`UniflowError::Interceptor`] errors, never in registry lookup.
pub struct Interceptor<S> {
    name: String,
    before: Option<Stage<S>>,
    after: Option<Stage<S>>,
}

impl<S> Interceptor<S> {
    /// Create an interceptor from optional raw stages.
    pub fn new(
        name: impl Into<String>,
        before: Option<Stage<S>>,
        after: Option<Stage<S>>,
    ) -> Self {
        Self {
            name: name.into(),
            before,
            after,
        }
    }

    /// Create an interceptor with only a `before` stage.
    pub fn on_before<F>(name: impl Into<String>, stage: F) -> Self
    where
        F: Fn(Context<S>) -> Result<Context<S>, UniflowError> + 'static,
    {
        Self::new(name, Some(Box::new(stage)), None)
    }

    /// Create an interceptor with only an `after` stage.
    pub fn on_after<F>(name: impl Into<String>, stage: F) -> Self
    where
        F: Fn(Context<S>) -> Result<Context<S>, UniflowError> + 'static,
    {
        Self::new(name, None, Some(Box::new(stage)))
    }

    /// Diagnostic name of this interceptor.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the `before` stage if present, or hand the context through.
    pub(crate) fn run_before(&self, ctx: Context<S>) -> Result<Context<S>, UniflowError> {
        match &self.before {
            Some(stage) => stage(ctx),
            None => Ok(ctx),
        }
    }

    /// Run the `after` stage if present, or hand the context through.
    pub(crate) fn run_after(&self, ctx: Context<S>) -> Result<Context<S>, UniflowError> {
        match &self.after {
            Some(stage) => stage(ctx),
            None => Ok(ctx),
        }
    }
}

impl<S> std::fmt::Debug for Interceptor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interceptor")
            .field("name", &self.name)
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}

/// Build an observer interceptor that runs after a matching dispatch.
///
/// The observer reads the state currently in the coeffects (the pre-action
/// state, unless an earlier [`enrich`] replaced it) together with the
/// action, and is called once per matching dispatch. It cannot alter the
/// context, so it gives a pure "did this happen" hook without threading
/// effects. Insert the result into the interceptor list passed to
/// [`Store::register_event_state`](crate::Store::register_event_state) or
/// [`Store::register_event_effects`](crate::Store::register_event_effects).
pub fn after<S, A, F>(observer: F) -> Interceptor<S>
where
    S: 'static,
    A: Action,
    F: Fn(&S, &A) + 'static,
{
    Interceptor::on_after("after", move |ctx: Context<S>| {
        let action = ctx.action_as::<A>()?;
        observer(ctx.coeffects.state(), &action);
        Ok(ctx)
    })
}

/// Build an enrichment interceptor that rewrites the state coeffect.
///
/// Runs in the before pass: the returned state replaces the `state`
/// coeffect (not the `state` effect), so a later interceptor in the same
/// chain reads the transformed value as its input. Useful for normalizing
/// state before a terminal handler runs, e.g. deduplicating a collection
/// ahead of an append.
pub fn enrich<S, A, F>(transform: F) -> Interceptor<S>
where
    S: Clone + 'static,
    A: Action,
    F: Fn(S, &A) -> S + 'static,
{
    Interceptor::on_before("enrich", move |mut ctx: Context<S>| {
        let action = ctx.action_as::<A>()?;
        let enriched = transform(ctx.coeffects.state().clone(), &action);
        ctx.coeffects.set_state(enriched);
        Ok(ctx)
    })
}
