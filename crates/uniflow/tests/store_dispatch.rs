//! End-to-end dispatch scenarios over the public store surface.
//!
//! The fixture is a minimal todo-list state: enough to exercise reducers,
//! effect maps, observer and enrichment interceptors, and the two fatal
//! wiring conditions.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use assert_matches::assert_matches;
use uniflow::effects::{self, Effects};
use uniflow::{after, enrich, Action, Interceptor, Store, UniflowError};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct AppState {
    todos: Vec<String>,
}

struct AddTodo {
    name: String,
}

impl Action for AddTodo {
    const NAME: &'static str = "AddTodo";
}

struct DoNothing;

impl Action for DoNothing {
    const NAME: &'static str = "DoNothing";
}

fn add(name: &str) -> AddTodo {
    AddTodo {
        name: name.to_string(),
    }
}

fn append(mut state: AppState, action: &AddTodo) -> AppState {
    state.todos.push(action.name.clone());
    state
}

fn todo_store() -> Store<AppState> {
    let store = Store::new(AppState::default());
    store.register_event_state(vec![], |state: AppState, _action: &DoNothing| state);
    store
}

#[test]
fn reducer_updates_state_and_noop_leaves_it_untouched() {
    let store = todo_store();
    store.register_event_state(vec![], append);

    store.dispatch(add("Do Stuff")).unwrap();
    let snapshot = store.state();
    store.dispatch(DoNothing).unwrap();
    assert_eq!(store.state(), snapshot);

    store.dispatch(add("Do Stuff")).unwrap();
    assert_eq!(store.state().todos, ["Do Stuff", "Do Stuff"]);
}

#[test]
fn re_registering_an_action_replaces_its_chain() {
    let store = todo_store();
    store.register_event_state(vec![], append);
    store.register_event_state(vec![], |mut state: AppState, action: &AddTodo| {
        state.todos.push(action.name.to_uppercase());
        state
    });

    store.dispatch(add("shout")).unwrap();
    assert_eq!(store.state().todos, ["SHOUT"]);
}

#[test]
fn effect_map_handler_produces_state_and_custom_effect() {
    #[derive(Clone, Copy, Debug)]
    enum CounterAction {
        Increment,
    }

    let store = todo_store();
    store.register_event_effects(vec![], |coeffects, action: &AddTodo| {
        let mut next = coeffects.state().clone();
        next.todos.push(action.name.clone());
        Effects::new()
            .with(effects::STATE, next)
            .with("counter", CounterAction::Increment)
    });

    let added = Rc::new(Cell::new(0u32));
    let seen = Rc::clone(&added);
    store.register_effect("counter", move |action: &CounterAction| match action {
        CounterAction::Increment => seen.set(seen.get() + 1),
    });

    store.dispatch(add("First")).unwrap();
    store.dispatch(add("Second")).unwrap();
    store.dispatch(add("Third")).unwrap();

    assert_eq!(store.state().todos, ["First", "Second", "Third"]);
    assert_eq!(added.get(), 3);
}

#[test]
fn after_observer_counts_dispatches_without_altering_state() {
    // The observer must behave the same wherever it sits among the
    // non-terminal interceptors.
    for observer_first in [true, false] {
        let counted = Rc::new(Cell::new(0u32));
        let observer = {
            let counted = Rc::clone(&counted);
            after(move |_state: &AppState, _action: &AddTodo| {
                counted.set(counted.get() + 1);
            })
        };
        let passthrough = Interceptor::on_before("noop", |ctx| Ok(ctx));

        let interceptors = if observer_first {
            vec![observer, passthrough]
        } else {
            vec![passthrough, observer]
        };

        let store = todo_store();
        store.register_event_state(interceptors, append);

        store.dispatch(add("First")).unwrap();
        store.dispatch(add("Second")).unwrap();
        store.dispatch(add("Third")).unwrap();
        store.dispatch(DoNothing).unwrap();

        assert_eq!(counted.get(), 3);
        assert_eq!(store.state().todos, ["First", "Second", "Third"]);
    }
}

#[test]
fn enrich_normalizes_state_ahead_of_the_append() {
    // Keeps the collection duplicate-free for the append that follows: drop
    // duplicates plus any existing occurrence of the incoming name.
    let dedup = enrich(|mut state: AppState, action: &AddTodo| {
        state.todos.sort();
        state.todos.dedup();
        state.todos.retain(|todo| todo != &action.name);
        state
    });

    let store = todo_store();
    store.register_event_state(vec![dedup], append);

    for _ in 0..3 {
        store.dispatch(add("First")).unwrap();
        store.dispatch(add("Second")).unwrap();
        store.dispatch(add("Third")).unwrap();
    }

    let mut todos = store.state().todos;
    todos.sort();
    assert_eq!(todos, ["First", "Second", "Third"]);
}

#[test]
fn dispatching_an_unregistered_action_is_a_wiring_error() {
    let store: Store<AppState> = Store::new(AppState::default());

    let err = store.dispatch(add("ignored")).unwrap_err();

    assert_matches!(err, UniflowError::UnregisteredAction { action: "AddTodo" });
    assert!(err.is_wiring_error());
}

#[test]
fn declaring_an_effect_without_a_handler_is_a_wiring_error() {
    let store = todo_store();
    store.register_event_effects(vec![], |coeffects, action: &AddTodo| {
        let mut next = coeffects.state().clone();
        next.todos.push(action.name.clone());
        Effects::new()
            .with(effects::STATE, next)
            .with("unwired", true)
    });

    let err = store.dispatch(add("First")).unwrap_err();

    assert_matches!(err, UniflowError::UnhandledEffect { key: "unwired" });
    assert!(err.is_wiring_error());
    // The run aborted before the commit step.
    assert_eq!(store.state(), AppState::default());
}

#[test]
fn effect_value_of_the_wrong_type_is_rejected() {
    let store = todo_store();
    store.register_event_effects(vec![], |coeffects, _action: &AddTodo| {
        Effects::new()
            .with(effects::STATE, coeffects.state().clone())
            .with("counter", "not a number")
    });
    store.register_effect("counter", |_count: &u32| {});

    let err = store.dispatch(add("First")).unwrap_err();

    assert_matches!(err, UniflowError::EffectValueType { key: "counter" });
    assert!(!err.is_wiring_error());
}

#[test]
fn effect_handlers_observe_the_pre_commit_state_and_may_redispatch() {
    struct Submit {
        name: String,
    }

    impl Action for Submit {
        const NAME: &'static str = "Submit";
    }

    let store = Rc::new(todo_store());
    store.register_event_state(vec![], append);
    store.register_event_effects(vec![], |coeffects, action: &Submit| {
        let mut next = coeffects.state().clone();
        next.todos.push(action.name.clone());
        Effects::new().with(effects::STATE, next).with("ping", ())
    });

    let observed = Rc::new(RefCell::new(Vec::new()));
    let handle = Rc::clone(&store);
    let log = Rc::clone(&observed);
    store.register_effect("ping", move |_value: &()| {
        // Commit has not happened yet for the in-flight dispatch.
        log.borrow_mut().push(handle.state());
        handle.dispatch(add("nested")).unwrap();
    });

    store
        .dispatch(Submit {
            name: "outer".to_string(),
        })
        .unwrap();

    assert_eq!(*observed.borrow(), [AppState::default()]);
    // The outer dispatch commits last and wins over the nested one: its
    // chain computed against the pre-dispatch state.
    assert_eq!(store.state().todos, ["outer"]);
}
