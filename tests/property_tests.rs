//! Property-based tests for event sequencing.
//!
//! These tests use proptest to run random event sequences through a real
//! machine and compare what it publishes against a plain model of the
//! transition table.

use cadence::hooks::sync_hook;
use cadence::table::{TransitionBuilder, TransitionTable};
use cadence::{event_enum, state_enum, Machine, State};
use futures::StreamExt;
use proptest::prelude::*;

state_enum! {
    enum Player {
        Idle,
        Playing,
        Paused,
    }
}

event_enum! {
    enum Control {
        Play,
        Pause,
        Resume,
        Stop,
    }
}

const RULES: [(Player, Control, Player); 5] = [
    (Player::Idle, Control::Play, Player::Playing),
    (Player::Playing, Control::Pause, Player::Paused),
    (Player::Playing, Control::Stop, Player::Idle),
    (Player::Paused, Control::Resume, Player::Playing),
    (Player::Paused, Control::Stop, Player::Idle),
];

fn model_step(state: Player, event: Control) -> Option<Player> {
    RULES
        .iter()
        .find(|(from, on, _)| *from == state && *on == event)
        .map(|(_, _, to)| *to)
}

/// Every transition bumps the context once, on its action hook.
fn player_table() -> TransitionTable<Player, Control, usize> {
    RULES
        .iter()
        .fold(TransitionTable::builder(), |builder, (from, on, to)| {
            builder.transition(
                TransitionBuilder::new()
                    .from(*from)
                    .on(*on)
                    .to(*to)
                    .action(sync_hook(|count: usize| Some(count + 1))),
            )
        })
        .build()
        .unwrap()
}

/// Run `events` from `Idle`; returns published states and the final context.
fn run_machine(events: &[Control]) -> (Vec<Player>, usize, Player) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    runtime.block_on(async {
        let machine = Machine::new(0usize, Player::Idle, player_table());
        let changes = machine.subscribe().unwrap();
        let handle = machine.handle();

        for event in events {
            machine.enqueue(*event).unwrap();
        }
        let context = machine.close().await.unwrap();
        let published: Vec<Player> = changes.collect().await;

        (published, context, handle.state())
    })
}

prop_compose! {
    fn arbitrary_control()(variant in 0..4u8) -> Control {
        match variant {
            0 => Control::Play,
            1 => Control::Pause,
            2 => Control::Resume,
            _ => Control::Stop,
        }
    }
}

proptest! {
    #[test]
    fn published_states_follow_the_model(
        events in prop::collection::vec(arbitrary_control(), 0..24)
    ) {
        let mut state = Player::Idle;
        let mut expected = Vec::new();
        for event in &events {
            if let Some(next) = model_step(state, *event) {
                state = next;
                expected.push(next);
            }
        }

        let (published, context, last) = run_machine(&events);

        prop_assert!(published.len() <= events.len());
        prop_assert_eq!(&published, &expected);
        prop_assert_eq!(context, expected.len());
        prop_assert_eq!(last, state);
    }

    #[test]
    fn unmatched_events_change_nothing(event in arbitrary_control()) {
        let accepted = model_step(Player::Idle, event).is_some();
        let (published, context, last) = run_machine(&[event]);

        if accepted {
            prop_assert_eq!(published.len(), 1);
            prop_assert_eq!(context, 1);
        } else {
            prop_assert!(published.is_empty());
            prop_assert_eq!(context, 0);
            prop_assert_eq!(last, Player::Idle);
        }
    }

    #[test]
    fn lookup_matches_model(from in 0..3u8, event in arbitrary_control()) {
        let state = match from {
            0 => Player::Idle,
            1 => Player::Playing,
            _ => Player::Paused,
        };
        let table = player_table();

        let found = table.lookup(state.kind(), event).map(|t| t.to);
        prop_assert_eq!(found, model_step(state, event));
    }
}
