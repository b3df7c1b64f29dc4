//! Transition logic of a debounced query.
//!
//! Input changes go through the debounce. Once the input has been stable for
//! the configured delay, the query dispatches: it moves the epoch forward,
//! marks itself loading and calls the service. Every response carries the
//! epoch it was issued under and only the response of the latest epoch is
//! applied, so results never go backwards when the network reorders replies.

use crate::action::QueryAction;
use crate::environment::QueryEnvironment;
use crate::error::QueryError;
use crate::kind::QueryKind;
use crate::metrics::QueryMetrics;
use crate::state::{Epoch, QueryPhase, QueryRequest, QueryState, QueryTerm};
use autocomplete_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::oneshot;

/// Reducer of one query of kind `K`
#[derive(Debug, Clone, Copy)]
pub struct QueryReducer<K> {
    _kind: PhantomData<K>,
}

impl<K> QueryReducer<K> {
    /// Create a reducer
    #[must_use]
    pub const fn new() -> Self {
        Self { _kind: PhantomData }
    }
}

impl<K> Default for QueryReducer<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: QueryKind> QueryReducer<K> {
    fn mount(state: &mut QueryState<K>, env: &QueryEnvironment<K>) {
        state
            .debounce
            .set_delay(env.config.debounce_or(K::DEFAULT_DEBOUNCE));

        if state.service.is_some() {
            tracing::trace!(query = K::NAME, "Already mounted");
            return;
        }

        match env.services.create() {
            Some(service) => {
                tracing::debug!(query = K::NAME, "Service handle created");
                state.service = Some(service);
            },
            None => {
                tracing::warn!(
                    query = K::NAME,
                    "Service unavailable at mount, dispatches will fail"
                );
            },
        }
    }

    /// Abandon whatever is in flight and clear the result
    fn reset(state: &mut QueryState<K>, term: QueryTerm<K>) -> Effect<QueryAction<K>> {
        let cancel = state.debounce.reset(term);
        state.epoch = state.epoch.next();
        state.phase = QueryPhase::Idle;
        state.data = K::Data::default();
        state.status = None;
        state.error = None;
        state.resolved_at = None;
        cancel
    }

    fn dispatch(
        state: &mut QueryState<K>,
        request: QueryRequest<K>,
    ) -> SmallVec<[Effect<QueryAction<K>>; 4]> {
        if K::is_empty(&request.debounced_input) {
            tracing::trace!(query = K::NAME, "Empty input, nothing to dispatch");
            return smallvec![Effect::None];
        }

        let Some(service) = state.service.clone() else {
            let error = QueryError::ServiceNotReady { query: K::NAME };
            tracing::error!(query = K::NAME, %error, "Dispatch without service");
            QueryMetrics::record_not_ready(K::NAME);
            state.phase = QueryPhase::Errored;
            state.error = Some(error.to_string());
            return smallvec![Effect::None];
        };

        state.epoch = state.epoch.next();
        state.phase = QueryPhase::Loading;
        state.error = None;

        tracing::debug!(
            query = K::NAME,
            epoch = %state.epoch,
            input = ?request.debounced_input,
            "Dispatching"
        );
        QueryMetrics::record_dispatch(K::NAME);

        smallvec![call_service(service, state.epoch, request)]
    }
}

/// Issue the service call and turn its callback into a `Responded` action
fn call_service<K: QueryKind>(
    service: Arc<K::Service>,
    epoch: Epoch,
    request: QueryRequest<K>,
) -> Effect<QueryAction<K>> {
    Effect::Future(Box::pin(async move {
        let (tx, rx) = oneshot::channel();

        K::request(
            &service,
            request.debounced_input,
            request.options,
            Box::new(move |output, status| {
                // The receiver is gone when the store was dropped
                let _ = tx.send((K::into_data(output), status));
            }),
        );

        match rx.await {
            Ok((data, status)) => Some(QueryAction::Responded {
                epoch,
                data,
                status,
            }),
            Err(_) => {
                tracing::warn!(
                    query = K::NAME,
                    %epoch,
                    "Service dropped its callback without answering"
                );
                None
            },
        }
    }))
}

impl<K: QueryKind> Reducer for QueryReducer<K> {
    type State = QueryState<K>;
    type Action = QueryAction<K>;
    type Environment = QueryEnvironment<K>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            QueryAction::Mount => {
                Self::mount(state, env);
                smallvec![Effect::None]
            },

            QueryAction::InputChanged { input, options } => {
                state.raw_input = input.clone();

                if K::is_empty(&input) {
                    tracing::debug!(query = K::NAME, "Input cleared");
                    return smallvec![Self::reset(state, QueryTerm { input, options })];
                }

                state
                    .debounce
                    .update(QueryTerm { input, options }, |generation| {
                        QueryAction::DebounceElapsed { generation }
                    })
                    .into_iter()
                    .collect()
            },

            QueryAction::DebounceElapsed { generation } => {
                let Some(term) = state.debounce.settle(generation).cloned() else {
                    tracing::trace!(query = K::NAME, generation, "Debounce settled unchanged");
                    return smallvec![Effect::None];
                };

                let request = QueryRequest {
                    raw_input: state.raw_input.clone(),
                    debounced_input: term.input,
                    options: term.options,
                };
                Self::dispatch(state, request)
            },

            QueryAction::Dispatch(request) => Self::dispatch(state, request),

            QueryAction::Responded {
                epoch,
                data,
                status,
            } => {
                if epoch != state.epoch {
                    tracing::debug!(
                        query = K::NAME,
                        %epoch,
                        current = %state.epoch,
                        "Discarding stale response"
                    );
                    QueryMetrics::record_stale(K::NAME);
                    return smallvec![Effect::None];
                }

                tracing::debug!(query = K::NAME, %epoch, %status, "Response accepted");
                QueryMetrics::record_resolved(K::NAME, status.to_string());

                state.phase = QueryPhase::Resolved;
                state.data = data;
                state.status = Some(status);
                state.error = None;
                state.resolved_at = Some(env.clock.now());
                smallvec![Effect::None]
            },

            QueryAction::Unmount => {
                tracing::debug!(query = K::NAME, epoch = %state.epoch, "Unmounting");
                state.service = None;
                state.raw_input = K::Input::default();
                smallvec![Self::reset(state, QueryTerm::default())]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QueryConfig;
    use crate::kind::{Directions, PlacePredictions};
    use crate::request::{
        AutocompletionRequest, Location, PlaceOptions, QueryAutocompletionRequest, RouteQuery,
    };
    use crate::service::{AutocompleteService, Unavailable};
    use crate::state::DEBOUNCE_TIMER;
    use crate::status::{DirectionsStatus, PlacesServiceStatus};
    use crate::types::{AutocompletePrediction, QueryAutocompletePrediction};
    use autocomplete_core::environment::{Callback, Clock};
    use autocomplete_testing::{PendingCalls, ReducerTest, assertions, test_clock};
    use proptest::prelude::*;
    use std::time::Duration;

    struct NeverCalled;

    impl AutocompleteService for NeverCalled {
        fn get_place_predictions(
            &self,
            _request: AutocompletionRequest,
            _callback: Callback<Vec<AutocompletePrediction>, PlacesServiceStatus>,
        ) {
        }

        fn get_query_predictions(
            &self,
            _request: QueryAutocompletionRequest,
            _callback: Callback<Vec<QueryAutocompletePrediction>, PlacesServiceStatus>,
        ) {
        }
    }

    fn places_env() -> QueryEnvironment<PlacePredictions> {
        let service: Arc<dyn AutocompleteService> = Arc::new(NeverCalled);
        QueryEnvironment::new(move || Some(Arc::clone(&service))).with_clock(test_clock())
    }

    fn mounted() -> QueryState<PlacePredictions> {
        let mut state = QueryState::default();
        let _ = QueryReducer::<PlacePredictions>::new().reduce(
            &mut state,
            QueryAction::Mount,
            &places_env(),
        );
        state
    }

    fn typed(input: &str) -> QueryAction<PlacePredictions> {
        QueryAction::InputChanged {
            input: input.to_string(),
            options: PlaceOptions::default(),
        }
    }

    fn request(input: &str) -> QueryRequest<PlacePredictions> {
        QueryRequest {
            raw_input: input.to_string(),
            debounced_input: input.to_string(),
            options: PlaceOptions::default(),
        }
    }

    fn responded(epoch: u64, description: &str) -> QueryAction<PlacePredictions> {
        QueryAction::Responded {
            epoch: Epoch::new(epoch),
            data: vec![AutocompletePrediction::new(description, description)],
            status: PlacesServiceStatus::Ok,
        }
    }

    #[test]
    fn mount_acquires_service_and_applies_config() {
        let env = places_env()
            .with_config(QueryConfig::new().with_debounce(Duration::from_millis(20)));

        ReducerTest::new(QueryReducer::<PlacePredictions>::new())
            .with_env(env)
            .given_state(QueryState::default())
            .when_action(QueryAction::Mount)
            .then_state(|state: &QueryState<PlacePredictions>| {
                assert!(state.has_service());
                assert_eq!(state.debounce_delay(), Duration::from_millis(20));
                assert_eq!(state.phase(), QueryPhase::Idle);
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn mount_without_vendor_leaves_no_service() {
        ReducerTest::new(QueryReducer::<PlacePredictions>::new())
            .with_env(QueryEnvironment::<PlacePredictions>::new(Unavailable))
            .given_state(QueryState::default())
            .when_action(QueryAction::Mount)
            .then_state(|state: &QueryState<PlacePredictions>| assert!(!state.has_service()))
            .run();
    }

    #[test]
    fn typing_schedules_debounce_timer() {
        ReducerTest::new(QueryReducer::<PlacePredictions>::new())
            .with_env(places_env())
            .given_state(mounted())
            .when_action(typed("S"))
            .when_action(typed("Se"))
            .then_state(|state| {
                assert_eq!(state.raw_input(), "Se");
                assert_eq!(state.debounced_input(), "");
                assert!(state.is_debouncing());
                assert!(!state.is_loading());
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assert_eq!(
                    assertions::scheduled_action(effects),
                    Some(&QueryAction::DebounceElapsed { generation: 2 })
                );
            })
            .run();
    }

    #[test]
    fn same_input_twice_schedules_nothing_new() {
        ReducerTest::new(QueryReducer::<PlacePredictions>::new())
            .with_env(places_env())
            .given_state(mounted())
            .when_action(typed("Sea"))
            .when_action(typed("Sea"))
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn superseded_timer_is_ignored() {
        ReducerTest::new(QueryReducer::<PlacePredictions>::new())
            .with_env(places_env())
            .given_state(mounted())
            .when_action(typed("S"))
            .when_action(typed("Se"))
            .when_action(QueryAction::DebounceElapsed { generation: 1 })
            .then_state(|state| {
                assert_eq!(state.debounced_input(), "");
                assert_eq!(state.epoch(), Epoch::default());
                assert!(!state.is_loading());
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn settled_input_dispatches() {
        ReducerTest::new(QueryReducer::<PlacePredictions>::new())
            .with_env(places_env())
            .given_state(mounted())
            .when_action(typed("Sea"))
            .when_action(QueryAction::DebounceElapsed { generation: 1 })
            .then_state(|state| {
                assert_eq!(state.debounced_input(), "Sea");
                assert_eq!(state.epoch(), Epoch::new(1));
                assert_eq!(state.phase(), QueryPhase::Loading);
                assert!(state.error().is_none());
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn empty_dispatch_is_noop() {
        let mut state = mounted();
        state.phase = QueryPhase::Resolved;
        state.data = vec![AutocompletePrediction::new("p1", "Seattle")];

        ReducerTest::new(QueryReducer::<PlacePredictions>::new())
            .with_env(places_env())
            .given_state(state)
            .when_action(QueryAction::Dispatch(request("")))
            .then_state(|state| {
                assert_eq!(state.phase(), QueryPhase::Resolved);
                assert_eq!(state.data().len(), 1);
                assert_eq!(state.epoch(), Epoch::default());
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn dispatch_without_service_reports_not_ready() {
        ReducerTest::new(QueryReducer::<PlacePredictions>::new())
            .with_env(QueryEnvironment::<PlacePredictions>::new(Unavailable))
            .given_state(QueryState::default())
            .when_action(QueryAction::Mount)
            .when_action(QueryAction::Dispatch(request("Sea")))
            .then_state(|state| {
                assert_eq!(state.phase(), QueryPhase::Errored);
                assert_eq!(state.error(), Some("place_predictions service not initialized"));
                assert!(!state.is_loading());
                assert!(state.data().is_empty());
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn latest_epoch_response_is_applied() {
        ReducerTest::new(QueryReducer::<PlacePredictions>::new())
            .with_env(places_env())
            .given_state(mounted())
            .when_action(QueryAction::Dispatch(request("Sea")))
            .when_action(responded(1, "Seattle"))
            .then_state(|state| {
                assert_eq!(state.phase(), QueryPhase::Resolved);
                assert_eq!(state.data()[0].description, "Seattle");
                assert_eq!(state.status(), Some(&PlacesServiceStatus::Ok));
                assert_eq!(state.snapshot().resolved_at, Some(test_clock().now()));
            })
            .run();
    }

    #[test]
    fn stale_response_is_discarded() {
        ReducerTest::new(QueryReducer::<PlacePredictions>::new())
            .with_env(places_env())
            .given_state(mounted())
            .when_action(QueryAction::Dispatch(request("S")))
            .when_action(QueryAction::Dispatch(request("Sea")))
            .when_action(responded(1, "Santa Cruz"))
            .then_state(|state| {
                assert!(state.is_loading());
                assert!(state.data().is_empty());
                assert_eq!(state.epoch(), Epoch::new(2));
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn clearing_input_resets_and_cancels_timer() {
        ReducerTest::new(QueryReducer::<PlacePredictions>::new())
            .with_env(places_env())
            .given_state(mounted())
            .when_action(QueryAction::Dispatch(request("Sea")))
            .when_action(responded(1, "Seattle"))
            .when_action(typed("Seat"))
            .when_action(typed(""))
            .then_state(|state| {
                assert_eq!(state.phase(), QueryPhase::Idle);
                assert!(state.data().is_empty());
                assert!(state.status().is_none());
                assert!(!state.is_debouncing());
                assert!(state.has_service());
                assert_eq!(state.epoch(), Epoch::new(2));
            })
            .then_effects(|effects| assertions::assert_cancels(effects, &DEBOUNCE_TIMER))
            .run();
    }

    #[test]
    fn response_after_unmount_is_discarded() {
        ReducerTest::new(QueryReducer::<PlacePredictions>::new())
            .with_env(places_env())
            .given_state(mounted())
            .when_action(QueryAction::Dispatch(request("Sea")))
            .when_action(QueryAction::Unmount)
            .when_action(responded(1, "Seattle"))
            .then_state(|state| {
                assert!(!state.has_service());
                assert_eq!(state.phase(), QueryPhase::Idle);
                assert!(state.data().is_empty());
                assert_eq!(state.raw_input(), "");
            })
            .run();
    }

    #[test]
    fn unmount_cancels_pending_timer() {
        ReducerTest::new(QueryReducer::<PlacePredictions>::new())
            .with_env(places_env())
            .given_state(mounted())
            .when_action(typed("Sea"))
            .when_action(QueryAction::Unmount)
            .then_state(|state| assert!(!state.is_debouncing()))
            .then_effects(|effects| assertions::assert_cancels(effects, &DEBOUNCE_TIMER))
            .run();
    }

    #[test]
    fn options_change_alone_redispatches() {
        let biased = PlaceOptions {
            language: Some("fr".into()),
            ..PlaceOptions::default()
        };

        ReducerTest::new(QueryReducer::<PlacePredictions>::new())
            .with_env(places_env())
            .given_state(mounted())
            .when_action(typed("Sea"))
            .when_action(QueryAction::DebounceElapsed { generation: 1 })
            .when_action(QueryAction::InputChanged {
                input: "Sea".into(),
                options: biased,
            })
            .when_action(QueryAction::DebounceElapsed { generation: 2 })
            .then_state(|state| {
                assert_eq!(state.epoch(), Epoch::new(2));
                assert_eq!(state.options().language.as_deref(), Some("fr"));
            })
            .then_effects(|effects| assertions::assert_has_future_effect(effects))
            .run();
    }

    fn route_request(route: RouteQuery) -> QueryRequest<Directions> {
        QueryRequest {
            raw_input: route.clone(),
            debounced_input: route,
            options: crate::request::DirectionsOptions::default(),
        }
    }

    fn directions_env() -> QueryEnvironment<Directions> {
        struct NoRoutes;
        impl crate::service::DirectionsService for NoRoutes {
            fn route(
                &self,
                _request: crate::request::DirectionsRequest,
                _callback: Callback<crate::types::DirectionsResult, DirectionsStatus>,
            ) {
            }
        }

        QueryEnvironment::new(|| -> Option<Arc<dyn crate::service::DirectionsService>> {
            Some(Arc::new(NoRoutes))
        })
    }

    #[test]
    fn directions_dispatch_with_one_endpoint() {
        let half = RouteQuery {
            origin: Some(Location::Address("Seattle".into())),
            destination: None,
        };

        ReducerTest::new(QueryReducer::<Directions>::new())
            .with_env(directions_env())
            .given_state(QueryState::default())
            .when_action(QueryAction::Mount)
            .when_action(QueryAction::Dispatch(route_request(half)))
            .then_state(|state| {
                assert_eq!(state.phase(), QueryPhase::Loading);
                assert_eq!(state.epoch(), Epoch::new(1));
            })
            .then_effects(|effects| assertions::assert_has_future_effect(effects))
            .run();
    }

    #[test]
    fn directions_without_endpoints_stay_idle() {
        ReducerTest::new(QueryReducer::<Directions>::new())
            .with_env(directions_env())
            .given_state(QueryState::default())
            .when_action(QueryAction::Mount)
            .when_action(QueryAction::Dispatch(route_request(RouteQuery::default())))
            .then_state(|state| {
                assert_eq!(state.phase(), QueryPhase::Idle);
                assert_eq!(state.data(), &None);
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[tokio::test]
    async fn service_callback_becomes_responded_action() {
        type Calls =
            PendingCalls<AutocompletionRequest, Vec<AutocompletePrediction>, PlacesServiceStatus>;

        struct Recording(Calls);
        impl AutocompleteService for Recording {
            fn get_place_predictions(
                &self,
                request: AutocompletionRequest,
                callback: Callback<Vec<AutocompletePrediction>, PlacesServiceStatus>,
            ) {
                self.0.record(request, callback);
            }

            fn get_query_predictions(
                &self,
                _request: QueryAutocompletionRequest,
                _callback: Callback<Vec<QueryAutocompletePrediction>, PlacesServiceStatus>,
            ) {
            }
        }

        let calls = Calls::new();
        let effect = call_service::<PlacePredictions>(
            Arc::new(Recording(calls.clone())),
            Epoch::new(4),
            request("Sea"),
        );
        let Effect::Future(future) = effect else {
            unreachable!("service calls are futures");
        };

        let handle = tokio::spawn(future);
        tokio::task::yield_now().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls.request(0).map(|r| r.input), Some("Sea".to_string()));

        assert!(calls.respond(0, None, PlacesServiceStatus::ZeroResults));
        let action = handle.await.ok().flatten();
        assert_eq!(
            action,
            Some(QueryAction::Responded {
                epoch: Epoch::new(4),
                data: Vec::new(),
                status: PlacesServiceStatus::ZeroResults,
            })
        );
    }

    proptest! {
        /// Whatever order responses arrive in, only the last dispatch's data is shown
        #[test]
        fn last_dispatch_wins(order in Just((1..=5u64).collect::<Vec<_>>()).prop_shuffle()) {
            let reducer = QueryReducer::<PlacePredictions>::new();
            let env = places_env();
            let mut state = mounted();

            for n in 1..=5u64 {
                let action = QueryAction::Dispatch(request(&n.to_string()));
                let _ = reducer.reduce(&mut state, action, &env);
            }
            for epoch in order {
                let _ = reducer.reduce(&mut state, responded(epoch, &epoch.to_string()), &env);
            }

            prop_assert_eq!(state.phase(), QueryPhase::Resolved);
            prop_assert_eq!(state.data()[0].description.as_str(), "5");
        }
    }
}
