//! Two-pass chain execution
//!
//! Runs an interceptor chain against a context in onion order: a forward
//! pass through every `before` stage in registration order, then a reverse
//! pass through every `after` stage. The traversal bookkeeping lives inside
//! the context; every interceptor taken off the remaining queue is pushed
//! onto the executed stack whether or not it defines a `before`, so the
//! after pass visits exactly the same interceptors in exact reverse order.

use std::rc::Rc;

use crate::context::Context;
use crate::error::UniflowError;
use crate::interceptor::Interceptor;

/// Run `chain` to completion around `ctx`.
///
/// A zero-length chain is a legal no-op returning the context unchanged. A
/// stage returning an error aborts the run: the error propagates to the
/// dispatch caller and the remaining stages never execute, with no rollback
/// of effects already applied.
pub(crate) fn execute<S>(
    chain: &[Rc<Interceptor<S>>],
    mut ctx: Context<S>,
) -> Result<Context<S>, UniflowError> {
    ctx.queue = chain.iter().map(Rc::clone).collect();

    while let Some(interceptor) = ctx.queue.pop_front() {
        tracing::trace!(interceptor = interceptor.name(), "running before stage");
        ctx = interceptor.run_before(ctx)?;
        ctx.stack.push(interceptor);
    }

    while let Some(interceptor) = ctx.stack.pop() {
        tracing::trace!(interceptor = interceptor.name(), "running after stage");
        ctx = interceptor.run_after(ctx)?;
    }

    Ok(ctx)
}
