//! Dispatchable actions
//!
//! An action is an immutable request to change state, tagged with a stable
//! per-kind name. The name is the registry lookup key: registration stores a
//! chain under [`Action::NAME`] and dispatch resolves it the same way.
//!
//! Inside a chain the action travels type-erased; terminal handlers downcast
//! it back to the concrete kind.

/// A request to change state, identified by a stable per-kind name.
///
/// Implementations are plain data carriers; any payload lives in ordinary
/// struct fields. An action is constructed by a caller, consumed once by
/// [`Store::dispatch`](crate::Store::dispatch), and never mutated.
///
/// ```
/// use uniflow::Action;
///
/// struct AddTodo {
///     name: String,
/// }
///
/// impl Action for AddTodo {
///     const NAME: &'static str = "AddTodo";
/// }
/// # let _ = AddTodo { name: "Do Stuff".into() };
/// ```
pub trait Action: 'static {
    /// Stable identifier for this action kind, unique per kind.
    const NAME: &'static str;
}
