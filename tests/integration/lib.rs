
use fluxide::{Dispatcher, Store, StoreBuilder};
pub(crate) use counter::*;

mod middleware_tests;

pub(crate) type CounterContainer = (
    Dispatcher<CounterState, CounterAction>,
    Store<CounterState>,
);

pub(crate) fn counter_builder() -> StoreBuilder<CounterState, CounterAction> {
    StoreBuilder::new(CounterState::default())
        .slice(
            "count",
            |s: &CounterState| s.count,
            |s: &mut CounterState, v| s.count = v,
            count,
        )
        .slice(
            "tally",
            |s: &CounterState| s.tally,
            |s: &mut CounterState, v| s.tally = v,
            tally,
        )
}

pub(crate) fn given_a_counter_container() -> CounterContainer {
    counter_builder().build().expect("valid counter registry")
}
