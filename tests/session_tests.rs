//! Сессия стола: таймеры, отключения, grace, права на место, несколько столов.

mod common;

use common::{funded_ledger, init_logging, table_with_stacks, test_config};
use poker_hand_engine::domain::chips::Chips;
use poker_hand_engine::domain::hand::Stage;
use poker_hand_engine::domain::player::PlayerStatus;
use poker_hand_engine::domain::{PlayerId, SeatIndex};
use poker_hand_engine::engine::{
    EngineError, ForcedReason, HandEventKind, HandStatus, PlayerAction, PlayerActionKind, TableManager,
    TableSession,
};
use poker_hand_engine::infra::{AllowAllSeats, InMemoryLedger, NoShuffle, SeatRegistry};

fn session_with(stacks: &[u64]) -> (TableSession, InMemoryLedger) {
    init_logging();
    let table = table_with_stacks(stacks);
    let ledger = funded_ledger(&table);
    let session = TableSession::new(table, Box::new(ledger.clone()), Box::new(AllowAllSeats));
    (session, ledger)
}

fn action(player_id: PlayerId, seat: SeatIndex, kind: PlayerActionKind) -> PlayerAction {
    PlayerAction::new(player_id, seat, kind)
}

fn status_of(session: &TableSession, seat: SeatIndex) -> PlayerStatus {
    session.table().player(seat).expect("игрок").status
}

fn forced(session: &TableSession, player_id: PlayerId, reason: ForcedReason) -> usize {
    session
        .hand()
        .map(|h| h.history.forced_count(player_id, reason))
        .or_else(|| session.last_history().map(|h| h.forced_count(player_id, reason)))
        .unwrap_or(0)
}

#[test]
fn action_clock_uses_base_time_then_bank() {
    let (mut session, _) = session_with(&[1000, 1000, 1000]);
    session.start_hand(&mut NoShuffle, 1).unwrap();
    assert_eq!(session.hand().unwrap().current_actor(), Some(0));

    // 20 сек базового времени + 5 сек из банка (выдан шаг в 10).
    assert_eq!(session.on_time_passed(25).unwrap(), None);
    assert_eq!(session.time().bank.remaining_for(1), 50);
    assert_eq!(status_of(&session, 0), PlayerStatus::Active);

    // Банк исчерпан – авто-fold (есть что уравнивать).
    let status = session.on_time_passed(100).unwrap();
    assert_eq!(status, Some(HandStatus::Ongoing));
    assert_eq!(status_of(&session, 0), PlayerStatus::Folded);
    assert_eq!(forced(&session, 1, ForcedReason::Timeout), 1);
    assert_eq!(session.time().bank.remaining_for(1), 0);
    assert_eq!(session.hand().unwrap().current_actor(), Some(1));
}

#[test]
fn disconnected_actor_is_folded_exactly_once_after_grace() {
    let (mut session, _) = session_with(&[1000, 1000, 1000]);
    session.start_hand(&mut NoShuffle, 1).unwrap();

    assert_eq!(session.on_disconnect(1).unwrap(), None);
    assert_eq!(status_of(&session, 0), PlayerStatus::Disconnected);

    // Пока идёт grace, ход не отнимается (и таймер хода не тикает).
    assert_eq!(session.on_time_passed(29).unwrap(), None);
    assert_eq!(session.hand().unwrap().current_actor(), Some(0));

    let status = session.on_time_passed(1).unwrap();
    assert_eq!(status, Some(HandStatus::Ongoing));
    assert_eq!(status_of(&session, 0), PlayerStatus::Folded);
    assert_eq!(forced(&session, 1, ForcedReason::Disconnected), 1);
    assert_eq!(forced(&session, 1, ForcedReason::Timeout), 0);

    // Дальше по времени – больше ничего за него не делается.
    session.on_time_passed(5).unwrap();
    assert_eq!(forced(&session, 1, ForcedReason::Disconnected), 1);
}

#[test]
fn disconnected_player_with_nothing_to_call_is_checked_each_turn() {
    let (mut session, _) = session_with(&[1000, 1000]);
    session.start_hand(&mut NoShuffle, 1).unwrap();

    // BB (место 1) отключается до своего хода.
    session.on_disconnect(2).unwrap();
    session.submit_action(1, action(1, 0, PlayerActionKind::Call)).unwrap();
    assert_eq!(session.hand().unwrap().current_actor(), Some(1));

    // Grace вышел: check на префлопе и сразу check первым на флопе.
    let status = session.on_time_passed(30).unwrap();
    assert_eq!(status, Some(HandStatus::Ongoing));
    let hand = session.hand().unwrap();
    assert_eq!(hand.stage, Stage::Flop);
    assert_eq!(hand.current_actor(), Some(0));
    assert_eq!(forced(&session, 2, ForcedReason::Disconnected), 2);
    // Отключённый остаётся в раздаче и претендует на банк.
    assert_eq!(status_of(&session, 1), PlayerStatus::Disconnected);

    // Доигрываем: за отключённого всё время подставляется check.
    let mut last = HandStatus::Ongoing;
    while !last.is_over() {
        last = session.submit_action(1, action(1, 0, PlayerActionKind::Check)).unwrap();
    }
    assert!(matches!(last, HandStatus::Finished(..)));
    assert_eq!(forced(&session, 2, ForcedReason::Disconnected), 4);
}

#[test]
fn reconnect_within_grace_keeps_control() {
    let (mut session, _) = session_with(&[1000, 1000, 1000]);
    session.start_hand(&mut NoShuffle, 1).unwrap();

    session.on_disconnect(1).unwrap();
    session.on_time_passed(20).unwrap();
    session.on_reconnect(1).unwrap();
    assert_eq!(status_of(&session, 0), PlayerStatus::Active);

    // Время, пока игрок был отключён, с таймера хода не списано.
    assert_eq!(session.on_time_passed(15).unwrap(), None);
    session.submit_action(1, action(1, 0, PlayerActionKind::Call)).unwrap();

    assert_eq!(forced(&session, 1, ForcedReason::Disconnected), 0);
    let history = &session.hand().unwrap().history;
    assert!(history
        .events
        .iter()
        .any(|e| e.kind == HandEventKind::PlayerReconnected { player_id: 1 }));
}

#[test]
fn reconnect_does_not_undo_forced_fold() {
    let (mut session, _) = session_with(&[1000, 1000, 1000]);
    session.start_hand(&mut NoShuffle, 1).unwrap();

    session.on_disconnect(1).unwrap();
    session.on_time_passed(30).unwrap();
    assert_eq!(status_of(&session, 0), PlayerStatus::Folded);

    session.on_reconnect(1).unwrap();
    assert_eq!(status_of(&session, 0), PlayerStatus::Folded);
    assert!(matches!(
        session.submit_action(1, action(1, 0, PlayerActionKind::Call)),
        Err(EngineError::OutOfTurnAction(1))
    ));
}

#[test]
fn action_from_disconnected_actor_reconnects_the_player() {
    let (mut session, _) = session_with(&[1000, 1000, 1000]);
    session.start_hand(&mut NoShuffle, 1).unwrap();

    session.on_disconnect(1).unwrap();
    session.on_time_passed(10).unwrap();
    session.submit_action(1, action(1, 0, PlayerActionKind::Call)).unwrap();

    assert_eq!(status_of(&session, 0), PlayerStatus::Active);
    assert!(!session.time().grace.is_tracking(1));
}

#[test]
fn disconnect_after_fold_takes_effect_after_hand() {
    let (mut session, _) = session_with(&[1000, 1000, 1000]);
    session.start_hand(&mut NoShuffle, 1).unwrap();

    session.submit_action(1, action(1, 0, PlayerActionKind::Fold)).unwrap();
    session.on_disconnect(1).unwrap();
    assert_eq!(status_of(&session, 0), PlayerStatus::Folded);

    let status = session.submit_action(2, action(2, 1, PlayerActionKind::Fold)).unwrap();
    assert!(status.is_over());
    assert!(session.hand().is_none());
    assert_eq!(status_of(&session, 0), PlayerStatus::Disconnected);

    // Следующая раздача идёт без него.
    session.start_hand(&mut NoShuffle, 2).unwrap();
    assert_eq!(status_of(&session, 0), PlayerStatus::SittingOut);
    let dealt: Vec<SeatIndex> = session.hand().unwrap().participants().collect();
    assert_eq!(dealt, vec![1, 2]);
}

#[test]
fn reconnect_during_next_hand_returns_player_after_it() {
    let (mut session, _) = session_with(&[1000, 1000, 1000]);
    session.start_hand(&mut NoShuffle, 1).unwrap();
    session.submit_action(1, action(1, 0, PlayerActionKind::Fold)).unwrap();
    session.on_disconnect(1).unwrap();
    session.submit_action(2, action(2, 1, PlayerActionKind::Fold)).unwrap();
    assert_eq!(status_of(&session, 0), PlayerStatus::Disconnected);

    session.start_hand(&mut NoShuffle, 2).unwrap();
    assert_eq!(status_of(&session, 0), PlayerStatus::SittingOut);

    // Вернулся посреди раздачи, в которую его не сдали: ждёт её конца.
    session.on_reconnect(1).unwrap();
    assert_eq!(status_of(&session, 0), PlayerStatus::SittingOut);
    assert!(matches!(session.sit_in(0), Err(EngineError::HandAlreadyInProgress)));

    let seat = session.hand().unwrap().current_actor().unwrap();
    let player_id = session.table().player(seat).unwrap().player_id;
    let status = session.submit_action(player_id, action(player_id, seat, PlayerActionKind::Fold)).unwrap();
    assert!(status.is_over());
    assert_eq!(status_of(&session, 0), PlayerStatus::Active);

    session.start_hand(&mut NoShuffle, 3).unwrap();
    let dealt: Vec<SeatIndex> = session.hand().unwrap().participants().collect();
    assert_eq!(dealt, vec![0, 1, 2]);
}

#[test]
fn reconnect_between_hands_sits_the_player_back_in() {
    let (mut session, _) = session_with(&[1000, 1000]);
    session.on_disconnect(1).unwrap();
    assert_eq!(status_of(&session, 0), PlayerStatus::Disconnected);

    assert!(matches!(session.start_hand(&mut NoShuffle, 1), Err(EngineError::NotEnoughPlayers)));
    assert_eq!(status_of(&session, 0), PlayerStatus::SittingOut);

    session.on_reconnect(1).unwrap();
    assert_eq!(status_of(&session, 0), PlayerStatus::Active);
    session.start_hand(&mut NoShuffle, 2).unwrap();
    assert!(session.hand().is_some());
}

#[test]
fn actor_must_control_the_seat() {
    init_logging();
    let table = table_with_stacks(&[1000, 1000, 1000]);
    let ledger = funded_ledger(&table);
    let registry = SeatRegistry::new();
    registry.grant(1, 0);
    registry.grant(2, 1);
    let mut session = TableSession::new(table, Box::new(ledger), Box::new(registry.clone()));
    session.start_hand(&mut NoShuffle, 1).unwrap();

    // Чужой игрок от имени места 0.
    assert!(matches!(
        session.submit_action(2, action(1, 0, PlayerActionKind::Fold)),
        Err(EngineError::Unauthorized(2))
    ));
    // Права отозваны.
    registry.revoke(1);
    assert!(matches!(
        session.submit_action(1, action(1, 0, PlayerActionKind::Fold)),
        Err(EngineError::Unauthorized(1))
    ));
    registry.grant(1, 0);
    assert_eq!(
        session.submit_action(1, action(1, 0, PlayerActionKind::Fold)).unwrap(),
        HandStatus::Ongoing
    );
}

#[test]
fn ledger_failure_blocks_table_until_review_cleared() {
    let (mut session, ledger) = session_with(&[1000, 1000, 1000]);
    session.start_hand(&mut NoShuffle, 1).unwrap();

    // Fold (без операций) и фолд SB: возврат неуравненного (1), выплата (2) – падает.
    session.submit_action(1, action(1, 0, PlayerActionKind::Fold)).unwrap();
    ledger.fail_after(2);
    let status = session.submit_action(2, action(2, 1, PlayerActionKind::Fold)).unwrap();
    assert!(matches!(status, HandStatus::Aborted(_)));

    for p in session.table().seats.iter().flatten() {
        assert_eq!(p.stack, Chips(1000));
        assert_eq!(ledger.balance(p.player_id), Chips(1000));
    }
    assert!(session
        .last_history()
        .unwrap()
        .events
        .iter()
        .any(|e| matches!(e.kind, HandEventKind::HandAborted { .. })));

    assert!(matches!(
        session.start_hand(&mut NoShuffle, 2),
        Err(EngineError::TableUnderReview(_))
    ));
    assert_eq!(session.clear_review().map(|f| f.hand_id), Some(1));
    assert!(session.start_hand(&mut NoShuffle, 2).is_ok());
}

#[test]
fn stage_events_name_the_actor() {
    let (mut session, _) = session_with(&[1000, 1000]);
    session.start_hand(&mut NoShuffle, 1).unwrap();
    let events = session.drain_events();
    let last = events.last().expect("событие старта");
    assert_eq!(last.stage, Stage::Preflop);
    assert_eq!(last.acting_seat, Some(0));
    assert_eq!(last.acting_player, Some(1));
    assert!(session.drain_events().is_empty());
}

#[test]
fn seating_changes_blocked_during_hand() {
    let (mut session, _) = session_with(&[1000, 1000]);
    session.start_hand(&mut NoShuffle, 1).unwrap();
    assert!(matches!(session.remove_player(0), Err(EngineError::HandAlreadyInProgress)));
    assert!(matches!(
        session.start_hand(&mut NoShuffle, 2),
        Err(EngineError::HandAlreadyInProgress)
    ));
    assert!(session.legal_actions(0).unwrap().can_call);
}

#[test]
fn tables_are_independent() {
    init_logging();
    let mut manager = TableManager::new();
    let mut ledgers = Vec::new();
    for name in ["A", "B"] {
        let ledger = InMemoryLedger::new();
        let id = manager.create_table(name, test_config(), Box::new(ledger.clone()), Box::new(AllowAllSeats));
        for seat in 0..3u8 {
            let pid = seat as u64 + 1;
            ledger.deposit(pid, Chips(1000));
            manager.session_mut(id).unwrap().seat_player(seat, pid, Chips(1000)).unwrap();
        }
        ledgers.push((id, ledger));
    }
    let (a, b) = (ledgers[0].0, ledgers[1].0);
    assert_eq!(manager.table_ids(), vec![a, b]);

    let (hand_a, _) = manager.start_hand(a, &mut NoShuffle).unwrap();
    let (hand_b, _) = manager.start_hand(b, &mut NoShuffle).unwrap();
    assert_ne!(hand_a, hand_b);

    manager.session_mut(a).unwrap().on_disconnect(1).unwrap();
    let results = manager.tick_all(30);
    assert_eq!(results.len(), 2);
    for (id, res) in results {
        let res = res.unwrap();
        if id == a {
            assert_eq!(res, Some(HandStatus::Ongoing));
        } else {
            // На B у игрока 1 просто ушла часть таймбанка.
            assert_eq!(res, None);
        }
    }

    assert_eq!(manager.session(a).unwrap().table().player(0).unwrap().status, PlayerStatus::Folded);
    assert_eq!(manager.session(b).unwrap().table().player(0).unwrap().status, PlayerStatus::Active);
    assert_eq!(manager.session(b).unwrap().hand().unwrap().current_actor(), Some(0));

    manager
        .submit_action(b, 1, action(1, 0, PlayerActionKind::Call))
        .unwrap();
    assert!(matches!(manager.session(99), Err(EngineError::TableNotFound(99))));
}
