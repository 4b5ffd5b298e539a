use std::sync::{Arc, Mutex};

use mockall::predicate::eq;

use fluxide::{ActionLog, DispatchError, ErrorPolicy, MiddlewareError};

use super::{counter_builder, CounterAction, CounterState, MockStageObserver, ObservedStage};

fn recording_stage(
    label: &'static str,
    seen: &Arc<Mutex<Vec<&'static str>>>,
) -> impl Fn(&CounterState, &CounterAction, &mut dyn FnMut()) -> Result<(), MiddlewareError> {
    let seen = seen.clone();
    move |_: &CounterState, _: &CounterAction, next: &mut dyn FnMut()| -> Result<(), MiddlewareError> {
        seen.lock().unwrap().push(label);
        next();
        Ok(())
    }
}

#[test]
fn given_three_stages_should_run_in_order_before_the_publish() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let (dispatch, store) = counter_builder()
        .middleware(recording_stage("m1", &seen))
        .middleware(recording_stage("m2", &seen))
        .middleware(recording_stage("m3", &seen))
        .build()
        .unwrap();
    let probe = seen.clone();
    let _subscription = store.subscribe(move |_: &CounterState| {
        probe.lock().unwrap().push("publish");
    });

    dispatch.dispatch(CounterAction::Increment).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec!["m1", "m2", "m3", "publish"]);
}

#[test]
fn given_a_stage_should_observe_the_candidate_state_and_original_action() {
    let (dispatch, store) = counter_builder()
        .middleware(
            |state: &CounterState,
             action: &CounterAction,
             next: &mut dyn FnMut()|
             -> Result<(), MiddlewareError> {
                assert_eq!(state.count, 1);
                assert_eq!(*action, CounterAction::Increment);
                next();
                Ok(())
            },
        )
        .build()
        .unwrap();

    dispatch.dispatch(CounterAction::Increment).unwrap();

    assert_eq!(store.current().count, 1);
}

#[test]
fn given_an_effective_action_should_invoke_middleware_with_the_candidate_count() {
    let mut observer = MockStageObserver::new();
    observer
        .expect_stage_entered()
        .with(eq("probe"), eq(1))
        .times(1)
        .return_const(());
    let (dispatch, _store) = counter_builder()
        .middleware(ObservedStage {
            label: "probe",
            observer: Arc::new(observer),
        })
        .build()
        .unwrap();

    dispatch.dispatch(CounterAction::Increment).unwrap();
}

#[test]
fn given_an_ineffective_action_should_not_invoke_middleware() {
    let mut observer = MockStageObserver::new();
    observer.expect_stage_entered().times(0);
    let (dispatch, store) = counter_builder()
        .middleware(ObservedStage {
            label: "probe",
            observer: Arc::new(observer),
        })
        .build()
        .unwrap();

    dispatch.dispatch(CounterAction::Noop).unwrap();

    assert_eq!(store.current(), CounterState::default());
}

#[test]
fn given_a_stage_that_skips_next_should_halt_only_that_dispatch() {
    let halt_on_decrement = |_: &CounterState,
                             action: &CounterAction,
                             next: &mut dyn FnMut()|
     -> Result<(), MiddlewareError> {
        if *action != CounterAction::Decrement {
            next();
        }
        Ok(())
    };
    let (dispatch, store) = counter_builder()
        .middleware(halt_on_decrement)
        .build()
        .unwrap();

    dispatch.dispatch(CounterAction::Decrement).unwrap();
    assert_eq!(store.current().count, 0);

    dispatch.dispatch(CounterAction::Increment).unwrap();
    assert_eq!(store.current().count, 1);
}

#[test]
fn given_a_failing_stage_by_default_should_suppress_and_skip_the_publish() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let (dispatch, store) = counter_builder()
        .middleware(
            |_: &CounterState, _: &CounterAction, _: &mut dyn FnMut()| -> Result<(), MiddlewareError> {
                Err("stage exploded".into())
            },
        )
        .middleware(recording_stage("m2", &seen))
        .build()
        .unwrap();

    assert!(dispatch.dispatch(CounterAction::Increment).is_ok());

    assert_eq!(store.current().count, 0);
    assert!(seen.lock().unwrap().is_empty());
}

#[test]
fn given_strict_policy_a_failing_stage_should_surface_the_error() {
    let (dispatch, store) = counter_builder()
        .policy(ErrorPolicy::Strict)
        .middleware(
            |_: &CounterState, _: &CounterAction, _: &mut dyn FnMut()| -> Result<(), MiddlewareError> {
                Err("stage exploded".into())
            },
        )
        .build()
        .unwrap();

    let error = dispatch.dispatch(CounterAction::Increment).unwrap_err();

    assert!(matches!(error, DispatchError::Middleware { index: 0, .. }));
    assert_eq!(store.current().count, 0);
}

#[test]
fn given_a_stage_failing_after_next_should_keep_the_publish() {
    let (dispatch, store) = counter_builder()
        .policy(ErrorPolicy::Strict)
        .middleware(
            |_: &CounterState, _: &CounterAction, next: &mut dyn FnMut()| -> Result<(), MiddlewareError> {
                next();
                Err("late failure".into())
            },
        )
        .build()
        .unwrap();

    let error = dispatch.dispatch(CounterAction::Increment).unwrap_err();

    assert!(matches!(error, DispatchError::Middleware { index: 0, .. }));
    assert_eq!(store.current().count, 1);
}

#[test]
fn given_action_log_should_pass_the_dispatch_through() {
    let (dispatch, store) = counter_builder().middleware(ActionLog).build().unwrap();

    dispatch.dispatch(CounterAction::Increment).unwrap();

    assert_eq!(store.current().count, 1);
}
