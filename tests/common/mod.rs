//! Общие помощники для интеграционных тестов.
#![allow(dead_code)]

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use poker_hand_engine::domain::blinds::TableStakes;
use poker_hand_engine::domain::card::{parse_cards, Card};
use poker_hand_engine::domain::chips::Chips;
use poker_hand_engine::domain::deck::Deck;
use poker_hand_engine::domain::table::{Table, TableConfig};
use poker_hand_engine::domain::SeatIndex;
use poker_hand_engine::engine::HandEngine;
use poker_hand_engine::infra::InMemoryLedger;

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Логи в тестах: TEST_LOG -> RUST_LOG -> "warn".
pub fn init_logging() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

pub fn cards(s: &str) -> Vec<Card> {
    parse_cards(s).expect("валидные карты в тесте")
}

/// Конфиг на 6 мест, блайнды 50/100.
pub fn test_config() -> TableConfig {
    TableConfig::new(6, TableStakes::from_big_blind(100))
}

/// Стол на 6 мест, блайнды 50/100. Игрок на месте i имеет id = i + 1.
pub fn table_with_stacks(stacks: &[u64]) -> Table {
    let mut table = Table::new(1, "TEST".to_string(), test_config());
    for (seat, stack) in stacks.iter().enumerate() {
        table
            .seat_player(seat as SeatIndex, seat as u64 + 1, Chips(*stack))
            .expect("посадка игрока");
    }
    table
}

/// Ledger, в котором у каждого игрока ровно его стек.
pub fn funded_ledger(table: &Table) -> InMemoryLedger {
    let ledger = InMemoryLedger::new();
    for p in table.seats.iter().flatten() {
        ledger.deposit(p.player_id, p.stack);
    }
    ledger
}

/// Подложить карманные карты и весь будущий борд (до открытия флопа).
///
/// Порядок выдачи из колоды: burn, flop x3, burn, turn, burn, river.
pub fn rig(table: &mut Table, engine: &mut HandEngine, hole: &[(SeatIndex, &str)], board: &str) {
    assert!(engine.board.is_empty(), "rig только до флопа");

    let mut used = Vec::new();
    for (seat, hand) in hole {
        let hc = cards(hand);
        used.extend_from_slice(&hc);
        table.player_mut(*seat).expect("игрок на месте").hole_cards = hc;
    }
    let board = cards(board);
    assert_eq!(board.len(), 5);
    used.extend_from_slice(&board);

    let mut deck = Deck::standard_52();
    deck.remove_cards(&used);
    let mut burns = deck.cards.split_off(deck.cards.len() - 3);

    let mut order = Vec::new();
    order.push(burns.pop().expect("burn"));
    order.extend_from_slice(&board[0..3]);
    order.push(burns.pop().expect("burn"));
    order.push(board[3]);
    order.push(burns.pop().expect("burn"));
    order.push(board[4]);

    // Верх колоды – конец вектора.
    order.reverse();
    deck.cards.extend(order);
    engine.deck = deck;
}
