use drawpoker_core::{
    Event, EventBus, Notice, Phase, SessionError, SessionRules, SessionState, SortOrder, Wake,
    WakeQueue,
};

fn new_session(seed: u64) -> (SessionState, WakeQueue, EventBus) {
    let mut session = SessionState::new(SessionRules::default(), seed);
    let mut events = EventBus::default();
    session.deal(&mut events).unwrap();
    events.drain().count();
    (session, WakeQueue::new(), events)
}

// Delivers every pending wake immediately, including wakes scheduled by
// earlier wakes, and returns the events produced along the way.
fn run_timers(session: &mut SessionState, timers: &mut WakeQueue, events: &mut EventBus) -> Vec<Event> {
    while let Some((_, wake)) = timers.pop() {
        session.wake(wake, timers, events);
    }
    events.drain().collect()
}

#[test]
fn deal_fills_the_hand_and_clears_selection() {
    let (session, _, _) = new_session(1);
    assert_eq!(session.phase(), Phase::Dealt);
    assert_eq!(session.hand().len(), 9);
    assert!(session.selection().is_empty());
    assert_eq!(session.score(), 0);
    assert_eq!(session.deck_len(), 43);
}

#[test]
fn deal_is_only_valid_from_idle() {
    let (mut session, _, mut events) = new_session(1);
    assert!(matches!(
        session.deal(&mut events),
        Err(SessionError::InvalidPhase(Phase::Dealt))
    ));
}

#[test]
fn selection_toggles_and_gates_enablement() {
    let (mut session, _, mut events) = new_session(2);
    assert!(!session.can_play());
    session.toggle_select(0, &mut events).unwrap();
    assert_eq!(session.selection(), [0]);
    assert!(session.can_play());
    assert!(session.can_discard());

    session.toggle_select(0, &mut events).unwrap();
    assert!(session.selection().is_empty());
    assert!(!session.can_play());

    // A sixth selected card disables both actions.
    for pos in 0..6 {
        session.toggle_select(pos, &mut events).unwrap();
    }
    assert_eq!(session.selection().len(), 6);
    assert!(!session.can_play());
    assert!(!session.can_discard());

    assert!(matches!(
        session.toggle_select(9, &mut events),
        Err(SessionError::InvalidPosition(9))
    ));
}

#[test]
fn play_rejects_out_of_range_selections() {
    let (mut session, mut timers, mut events) = new_session(3);
    assert!(matches!(
        session.play(&mut timers, &mut events),
        Err(SessionError::InvalidSelection)
    ));
    for pos in 0..6 {
        session.toggle_select(pos, &mut events).unwrap();
    }
    assert!(matches!(
        session.play(&mut timers, &mut events),
        Err(SessionError::InvalidSelection)
    ));
    assert_eq!(session.hands_played(), 0);
    assert_eq!(session.hand().len(), 9);
}

#[test]
fn short_plays_never_win_and_replenish_the_hand() {
    let (mut session, mut timers, mut events) = new_session(4);
    session.toggle_select(0, &mut events).unwrap();
    session.play(&mut timers, &mut events).unwrap();
    assert_eq!(session.phase(), Phase::Playing);
    assert_eq!(session.hand().len(), 8);
    assert_eq!(session.hands_played(), 1);
    assert_eq!(session.score(), 0);

    let produced = run_timers(&mut session, &mut timers, &mut events);
    assert!(produced.contains(&Event::NoWin));
    assert!(produced.contains(&Event::HandDealt { count: 1 }));
    assert_eq!(session.phase(), Phase::Dealt);
    assert_eq!(session.hand().len(), 9);
}

#[test]
fn five_card_play_scores_payout_plus_card_points() {
    // Seeds are deterministic, but the dealt hand is arbitrary; use the
    // evaluator itself as the oracle for the selected five cards.
    let (mut session, mut timers, mut events) = new_session(5);
    for pos in 0..5 {
        session.toggle_select(pos, &mut events).unwrap();
    }
    let selected: Vec<_> = session.hand()[..5].to_vec();
    let expected = drawpoker_core::evaluate(&selected);
    let expected_total = expected.payout()
        + expected
            .winning
            .iter()
            .map(|&idx| selected[idx].rank.point_value())
            .sum::<i64>();

    session.play(&mut timers, &mut events).unwrap();
    if expected.is_winning() {
        assert_eq!(session.score(), expected_total);
    } else {
        assert_eq!(session.score(), 0);
    }
    run_timers(&mut session, &mut timers, &mut events);
    assert_eq!(session.hand().len(), 9);
}

#[test]
fn discard_replaces_selected_cards_in_place() {
    let (mut session, mut timers, mut events) = new_session(6);
    session.toggle_select(1, &mut events).unwrap();
    session.toggle_select(4, &mut events).unwrap();
    let old = [session.hand()[1], session.hand()[4]];

    session.discard(&mut timers, &mut events).unwrap();
    assert_eq!(session.phase(), Phase::Discarding);

    let produced = run_timers(&mut session, &mut timers, &mut events);
    let replacements = produced
        .iter()
        .find_map(|event| match event {
            Event::CardsReplaced { replacements } => Some(replacements.clone()),
            _ => None,
        })
        .expect("discard must report replacement pairs");
    assert_eq!(replacements.len(), 2);
    assert_eq!(replacements[0].0, old[0]);
    assert_eq!(replacements[1].0, old[1]);

    assert_eq!(session.phase(), Phase::Dealt);
    assert_eq!(session.hand().len(), 9);
    assert!(session.selection().is_empty());
    assert_eq!(session.discards_used(), 1);
    assert_eq!(session.hands_played(), 0);
}

#[test]
fn discard_limit_rejects_with_a_transient_notice() {
    let (mut session, mut timers, mut events) = new_session(7);
    for _ in 0..3 {
        session.toggle_select(0, &mut events).unwrap();
        session.discard(&mut timers, &mut events).unwrap();
        run_timers(&mut session, &mut timers, &mut events);
    }
    assert_eq!(session.discards_used(), 3);

    session.toggle_select(0, &mut events).unwrap();
    assert!(matches!(
        session.discard(&mut timers, &mut events),
        Err(SessionError::NoDiscardsLeft)
    ));
    assert_eq!(session.discards_used(), 3);
    assert_eq!(session.notice(), Some(Notice::DiscardsExhausted));
    assert_eq!(session.phase(), Phase::Dealt);
    assert_eq!(session.selection(), [0]);

    let produced = run_timers(&mut session, &mut timers, &mut events);
    assert!(produced.contains(&Event::NoticeShown {
        notice: Notice::DiscardsExhausted
    }));
    assert!(produced.contains(&Event::NoticeCleared));
    assert_eq!(session.notice(), None);
}

#[test]
fn busy_transition_rejects_all_actions() {
    let (mut session, mut timers, mut events) = new_session(8);
    session.toggle_select(0, &mut events).unwrap();
    session.discard(&mut timers, &mut events).unwrap();

    let hand_before: Vec<_> = session.hand().to_vec();
    assert!(matches!(
        session.play(&mut timers, &mut events),
        Err(SessionError::Busy)
    ));
    assert!(matches!(
        session.discard(&mut timers, &mut events),
        Err(SessionError::Busy)
    ));
    assert!(matches!(
        session.toggle_select(2, &mut events),
        Err(SessionError::Busy)
    ));
    assert!(matches!(
        session.sort_toggle(&mut events),
        Err(SessionError::Busy)
    ));
    assert_eq!(session.hand(), hand_before.as_slice());
    assert_eq!(session.hands_played(), 0);
    assert_eq!(session.discards_used(), 0);
    assert_eq!(session.selection(), [0]);

    run_timers(&mut session, &mut timers, &mut events);
    assert_eq!(session.phase(), Phase::Dealt);
    assert_eq!(session.discards_used(), 1);
}

#[test]
fn stale_wakes_are_dropped() {
    let (mut session, mut timers, mut events) = new_session(9);
    let before = session.snapshot();
    session.wake(Wake::Replenish, &mut timers, &mut events);
    session.wake(Wake::Reset, &mut timers, &mut events);
    session.wake(Wake::FinishDiscard, &mut timers, &mut events);
    assert_eq!(session.phase(), before.phase);
    assert_eq!(session.hand(), before.hand.as_slice());
    assert_eq!(session.score(), before.score);
    assert!(timers.is_empty());
}

#[test]
fn session_ends_after_five_plays_and_resets_to_zero() {
    let (mut session, mut timers, mut events) = new_session(10);
    let mut ended = Vec::new();
    for play in 0..5 {
        session.toggle_select(0, &mut events).unwrap();
        session.play(&mut timers, &mut events).unwrap();
        if play == 4 {
            assert_eq!(session.phase(), Phase::Ended);
        }
        ended.extend(run_timers(&mut session, &mut timers, &mut events));
    }
    assert!(ended.contains(&Event::SessionEnded {
        score: 0,
        won: false
    }));
    assert!(ended.contains(&Event::SessionReset));
    // The scheduled reset re-enters play with a fresh session.
    assert_eq!(session.phase(), Phase::Dealt);
    assert_eq!(session.score(), 0);
    assert_eq!(session.hands_played(), 0);
    assert_eq!(session.discards_used(), 0);
    assert_eq!(session.hand().len(), 9);
}

#[test]
fn win_verdict_compares_score_to_threshold() {
    let rules = SessionRules {
        win_threshold: 0,
        ..SessionRules::default()
    };
    let mut session = SessionState::new(rules, 11);
    let mut timers = WakeQueue::new();
    let mut events = EventBus::default();
    session.deal(&mut events).unwrap();
    let mut produced = Vec::new();
    for _ in 0..5 {
        session.toggle_select(0, &mut events).unwrap();
        session.play(&mut timers, &mut events).unwrap();
        produced.extend(run_timers(&mut session, &mut timers, &mut events));
    }
    assert!(produced
        .iter()
        .any(|event| matches!(event, Event::SessionEnded { won: true, .. })));
}

#[test]
fn sort_toggle_alternates_direction_and_keeps_selection() {
    let (mut session, _, mut events) = new_session(12);
    session.toggle_select(3, &mut events).unwrap();
    let selected_card = session.hand()[3];

    session.sort_toggle(&mut events).unwrap();
    assert_eq!(session.sort_order(), Some(SortOrder::Ascending));
    let values: Vec<u8> = session.hand().iter().map(|c| c.rank.value()).collect();
    assert!(values.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(session.selection().len(), 1);
    assert_eq!(session.hand()[session.selection()[0]], selected_card);

    session.sort_toggle(&mut events).unwrap();
    assert_eq!(session.sort_order(), Some(SortOrder::Descending));
    let values: Vec<u8> = session.hand().iter().map(|c| c.rank.value()).collect();
    assert!(values.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(session.hand()[session.selection()[0]], selected_card);
}

#[test]
fn active_sort_order_applies_to_replenished_hands() {
    let (mut session, mut timers, mut events) = new_session(13);
    session.sort_toggle(&mut events).unwrap();
    session.toggle_select(0, &mut events).unwrap();
    session.toggle_select(1, &mut events).unwrap();
    session.play(&mut timers, &mut events).unwrap();
    run_timers(&mut session, &mut timers, &mut events);

    assert_eq!(session.hand().len(), 9);
    let values: Vec<u8> = session.hand().iter().map(|c| c.rank.value()).collect();
    assert!(values.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn many_discards_and_plays_survive_deck_reconstruction() {
    // Five 5-card plays plus three 5-card discards burn through more than
    // one 52-card deck; the session must keep dealing without complaint.
    let rules = SessionRules::default();
    let mut session = SessionState::new(rules, 14);
    let mut timers = WakeQueue::new();
    let mut events = EventBus::default();
    session.deal(&mut events).unwrap();
    for round in 0..5 {
        if round < 3 {
            for pos in 0..5 {
                session.toggle_select(pos, &mut events).unwrap();
            }
            session.discard(&mut timers, &mut events).unwrap();
            run_timers(&mut session, &mut timers, &mut events);
        }
        for pos in 0..5 {
            session.toggle_select(pos, &mut events).unwrap();
        }
        session.play(&mut timers, &mut events).unwrap();
        run_timers(&mut session, &mut timers, &mut events);
    }
    assert_eq!(session.hand().len(), 9);
    assert_eq!(session.hands_played(), 0);
    assert_eq!(session.phase(), Phase::Dealt);
}
