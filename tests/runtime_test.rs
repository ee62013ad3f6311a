//! Актёр стола поверх tokio: команды, подписка на события, автотик.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{funded_ledger, init_logging, table_with_stacks};
use poker_hand_engine::api::{ApiError, CommandResponse, TableCommand, TableViewDto};
use poker_hand_engine::domain::player::PlayerStatus;
use poker_hand_engine::domain::hand::Stage;
use poker_hand_engine::engine::{PlayerAction, PlayerActionKind, TableSession};
use poker_hand_engine::infra::{AllowAllSeats, IdGenerator, NoShuffle};
use poker_hand_engine::runtime::{spawn_table, TableHandle};

fn spawn(stacks: &[u64], tick: Option<Duration>) -> TableHandle {
    init_logging();
    let table = table_with_stacks(stacks);
    let ledger = funded_ledger(&table);
    let session = TableSession::new(table, Box::new(ledger), Box::new(AllowAllSeats));
    spawn_table(session, NoShuffle, Arc::new(IdGenerator::starting_at(100)), tick)
}

async fn view(handle: &TableHandle, viewer: Option<u64>) -> TableViewDto {
    match handle.send(TableCommand::View { viewer }).await.unwrap() {
        CommandResponse::TableState(view) => view,
        other => panic!("ожидали состояние стола, получили {other:?}"),
    }
}

#[tokio::test]
async fn commands_are_processed_in_order() {
    let handle = spawn(&[1000, 1000, 1000], None);
    let mut events = handle.subscribe();

    let started = handle.send(TableCommand::StartHand).await.unwrap();
    assert!(matches!(started, CommandResponse::TableState(ref v) if v.hand_in_progress));

    let event = events.recv().await.unwrap();
    assert_eq!(event.table_id, handle.table_id());
    assert_eq!(event.stage, Stage::Preflop);
    assert_eq!(event.acting_seat, Some(0));

    // Свои карманные карты видны, чужие – нет.
    let v = view(&handle, Some(1)).await;
    assert!(v.players[0].hole_cards.is_some());
    assert!(v.players[1].hole_cards.is_none());
    assert_eq!(v.current_actor_seat, Some(0));
    assert_eq!(v.hand_id, Some(100));

    let err = handle
        .send(TableCommand::Act {
            actor: 2,
            action: PlayerAction::new(1, 0, PlayerActionKind::Fold),
        })
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Forbidden(2));

    let err = handle
        .send(TableCommand::Act {
            actor: 2,
            action: PlayerAction::new(2, 1, PlayerActionKind::Fold),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Rejected(_)));

    handle
        .send(TableCommand::Act {
            actor: 1,
            action: PlayerAction::new(1, 0, PlayerActionKind::Fold),
        })
        .await
        .unwrap();
    let finished = handle
        .send(TableCommand::Act {
            actor: 2,
            action: PlayerAction::new(2, 1, PlayerActionKind::Fold),
        })
        .await
        .unwrap();
    match finished {
        CommandResponse::HandFinished { table, result } => {
            assert!(!table.hand_in_progress);
            assert_eq!(result.winners(), vec![3]);
        }
        other => panic!("ожидали конец раздачи, получили {other:?}"),
    }
}

#[tokio::test]
async fn manual_tick_applies_forced_fold() {
    let handle = spawn(&[1000, 1000, 1000], None);
    handle.send(TableCommand::StartHand).await.unwrap();
    handle.send(TableCommand::Disconnect { player_id: 1 }).await.unwrap();

    let resp = handle.send(TableCommand::Tick { delta_secs: 30 }).await.unwrap();
    assert!(matches!(resp, CommandResponse::TableState(_)));
    let v = view(&handle, None).await;
    assert_eq!(v.players[0].status, PlayerStatus::Folded);
    assert_eq!(v.current_actor_seat, Some(1));
}

#[tokio::test(start_paused = true)]
async fn periodic_tick_drives_grace_period() {
    let handle = spawn(&[1000, 1000, 1000], Some(Duration::from_secs(1)));
    handle.send(TableCommand::StartHand).await.unwrap();
    handle.send(TableCommand::Disconnect { player_id: 1 }).await.unwrap();

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(view(&handle, None).await.players[0].status, PlayerStatus::Disconnected);

    tokio::time::sleep(Duration::from_secs(25)).await;
    assert_eq!(view(&handle, None).await.players[0].status, PlayerStatus::Folded);
}

#[tokio::test(start_paused = true)]
async fn sub_second_tick_keeps_logical_time_at_wall_speed() {
    let handle = spawn(&[1000, 1000, 1000], Some(Duration::from_millis(100)));
    handle.send(TableCommand::StartHand).await.unwrap();
    handle.send(TableCommand::Disconnect { player_id: 1 }).await.unwrap();

    tokio::time::sleep(Duration::from_millis(3_500)).await;
    assert_eq!(view(&handle, None).await.players[0].status, PlayerStatus::Disconnected);

    tokio::time::sleep(Duration::from_secs(25)).await;
    assert_eq!(view(&handle, None).await.players[0].status, PlayerStatus::Disconnected);

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(view(&handle, None).await.players[0].status, PlayerStatus::Folded);
}

#[tokio::test(start_paused = true)]
async fn fractional_tick_period_does_not_lose_time() {
    let handle = spawn(&[1000, 1000, 1000], Some(Duration::from_millis(1_500)));
    handle.send(TableCommand::StartHand).await.unwrap();
    handle.send(TableCommand::Disconnect { player_id: 1 }).await.unwrap();

    // С потерей полсекунды на тике к 31.5 с набралось бы только 21 с.
    tokio::time::sleep(Duration::from_millis(31_600)).await;
    assert_eq!(view(&handle, None).await.players[0].status, PlayerStatus::Folded);
}

#[tokio::test]
async fn shutdown_stops_the_actor() {
    let handle = spawn(&[1000, 1000], None);
    handle.shutdown().await;
    let err = handle.send(TableCommand::StartHand).await.unwrap_err();
    assert!(matches!(err, ApiError::Internal(_)));
}
