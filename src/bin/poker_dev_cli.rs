// src/bin/poker_dev_cli.rs
//
// Мульти-табличная симуляция с ботами: несколько независимых столов,
// таймауты, отключения и возвраты игроков.
//
// Запуск: RUST_LOG=poker_hand_engine=debug cargo run --bin poker_dev_cli -- [hands] [seed]

use poker_hand_engine::api::build_table_view;
use poker_hand_engine::domain::blinds::TableStakes;
use poker_hand_engine::domain::chips::Chips;
use poker_hand_engine::domain::player::PlayerStatus;
use poker_hand_engine::domain::table::TableConfig;
use poker_hand_engine::domain::{PlayerId, SeatIndex, TableId};
use poker_hand_engine::engine::{EngineError, HandStatus, PlayerAction, PlayerActionKind, TableManager};
use poker_hand_engine::infra::{AllowAllSeats, DeterministicRng, IdGenerator, InMemoryLedger};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

const START_STACK: u64 = 10_000;
const MAX_STEPS_PER_HAND: u32 = 500;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let mut args = std::env::args().skip(1);
    let hands: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(5);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    println!("poker_dev_cli: {hands} раздач на стол, seed={seed}");

    let ids = IdGenerator::new();
    let mut rng = DeterministicRng::from_seed(seed);
    let mut bot_rng = StdRng::seed_from_u64(seed ^ 0x5eed);
    let ledger = InMemoryLedger::new();
    let mut manager = TableManager::new();

    // Три стола с 3, 4, 6 игроками.
    let mut table_ids: Vec<TableId> = Vec::new();
    for (n, players) in [3u8, 4, 6].into_iter().enumerate() {
        let config = TableConfig::new(6, TableStakes::from_big_blind(100 * (n as u64 + 1)));
        let table_id = manager.create_table(
            format!("AUTO TABLE {}", n + 1),
            config,
            Box::new(ledger.clone()),
            Box::new(AllowAllSeats),
        );
        for seat in 0..players {
            let pid = ids.next_player_id();
            ledger.deposit(pid, Chips::new(START_STACK));
            if let Err(e) = manager
                .session_mut(table_id)
                .and_then(|s| s.seat_player(seat, pid, Chips::new(START_STACK)))
            {
                println!("[CLI] не удалось посадить игрока {pid}: {e}");
            }
        }
        table_ids.push(table_id);
    }

    for round in 1..=hands {
        for &table_id in &table_ids {
            println!();
            println!("================ TABLE {table_id} | HAND #{round} ================");
            if let Err(e) = play_hand(&mut manager, table_id, &mut rng, &mut bot_rng) {
                println!("[CLI] ОШИБКА на столе {table_id}: {e}");
            }
            print_table(&manager, table_id);
        }
    }

    println!();
    println!("[CLI] Балансы в ledger:");
    for pid in 1..ids.next_player_id() {
        println!("  player_id={pid} balance={}", ledger.balance(pid));
    }
}

fn play_hand(
    manager: &mut TableManager,
    table_id: TableId,
    rng: &mut DeterministicRng,
    bot_rng: &mut StdRng,
) -> Result<(), EngineError> {
    // Вернуть всех, кто пропустил прошлую раздачу.
    let session = manager.session_mut(table_id)?;
    let sitting_out: Vec<SeatIndex> = session
        .table()
        .seats
        .iter()
        .enumerate()
        .filter_map(|(seat, p)| p.as_ref().map(|p| (seat as SeatIndex, p)))
        .filter(|(_, p)| p.status == PlayerStatus::SittingOut && !p.stack.is_zero())
        .map(|(seat, _)| seat)
        .collect();
    for seat in sitting_out {
        match session.sit_in(seat) {
            Ok(()) => println!("[CLI] seat {seat} снова в игре"),
            Err(e) => println!("[CLI] sit_in seat {seat} не удался: {e}"),
        }
    }

    let (hand_id, mut status) = manager.start_hand(table_id, rng)?;
    println!("[CLI] start_hand: hand_id={hand_id}");

    let mut step = 0;
    while !status.is_over() {
        step += 1;
        if step > MAX_STEPS_PER_HAND {
            println!("[CLI] превышен лимит шагов ({MAX_STEPS_PER_HAND}), выходим");
            break;
        }

        let session = manager.session_mut(table_id)?;
        let Some(seat) = session.hand().and_then(|h| h.current_actor()) else {
            break;
        };
        let player = session.table().player(seat)?;
        let player_id: PlayerId = player.player_id;

        // Иногда бот "думает" слишком долго или теряет связь.
        let roll: u32 = bot_rng.gen_range(0..100);
        if roll < 3 {
            println!("[CLI] seat={seat} player_id={player_id} уснул, тикаем время");
            if let Some(s) = session.on_time_passed(session.time().rules.base_action_secs + 60)? {
                status = s;
            }
            continue;
        }
        if roll < 5 && !player.is_disconnected() {
            println!("[CLI] seat={seat} player_id={player_id} отключился");
            if let Some(s) = session.on_disconnect(player_id)? {
                status = s;
            }
            let grace = session.time().rules.reconnect_grace_secs;
            let wait = if bot_rng.gen_bool(0.5) { grace / 2 } else { grace + 1 };
            if let Some(s) = session.on_time_passed(wait)? {
                status = s;
            }
            session.on_reconnect(player_id)?;
            continue;
        }

        let legal = session.legal_actions(seat)?;
        let kind = if legal.can_check {
            match legal.min_raise_to {
                Some(min_to) if legal.can_bet && roll < 25 => PlayerActionKind::Bet(min_to),
                _ => PlayerActionKind::Check,
            }
        } else if roll < 15 {
            PlayerActionKind::Fold
        } else if let (Some(min_to), true) = (legal.min_raise_to, roll > 90) {
            PlayerActionKind::Raise(min_to)
        } else {
            PlayerActionKind::Call
        };

        println!("[CLI] step={step} seat={seat} player_id={player_id} -> {kind:?}");
        status = session.submit_action(player_id, PlayerAction::new(player_id, seat, kind))?;
    }

    match status {
        HandStatus::Finished(result, history) => {
            println!(
                "=== РАЗДАЧА ЗАВЕРШЕНА: stage={} pot={} board={:?} событий={} ===",
                result.stage_reached,
                result.total_pot,
                result.board,
                history.events.len()
            );
            for p in &result.players {
                println!(
                    "  player_id={} seat={} поставил={} выиграл={} winner={}",
                    p.player_id, p.seat, p.contributed, p.won, p.is_winner
                );
            }
        }
        HandStatus::Aborted(report) => {
            println!("=== РАЗДАЧА АННУЛИРОВАНА: {} ===", report.reason);
        }
        HandStatus::Ongoing => {}
    }
    Ok(())
}

fn print_table(manager: &TableManager, table_id: TableId) {
    let Ok(session) = manager.session(table_id) else {
        println!("[DEBUG] стол {table_id} не найден");
        return;
    };
    let dto = build_table_view(session, None);
    println!(
        "table_id={} name={} hand_in_progress={} dealer_button={:?}",
        dto.table_id, dto.name, dto.hand_in_progress, dto.dealer_button
    );
    for p in &dto.players {
        println!(
            "  seat {} | id={} | stack={} | status={:?}",
            p.seat_index, p.player_id, p.stack, p.status
        );
    }
}
