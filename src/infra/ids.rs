use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{HandId, PlayerId, TableId};

/// Монотонный счётчик; безопасен для вызова из разных тасков.
#[derive(Debug)]
struct Counter(AtomicU64);

impl Counter {
    fn starting_at(first: u64) -> Self {
        Counter(AtomicU64::new(first))
    }

    fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

/// Выдача id столов, игроков и раздач.
///
/// Один генератор на процесс (в рантайме – за `Arc`): id раздач
/// уникальны между всеми столами, даже если столы живут в разных тасках.
#[derive(Debug)]
pub struct IdGenerator {
    tables: Counter,
    players: Counter,
    hands: Counter,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    /// Все счётчики начинаются с 1 (0 не выдаётся никогда).
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Начать с заданного значения – например, после рестарта,
    /// чтобы не пересечься с уже записанными историями раздач.
    pub fn starting_at(first: u64) -> Self {
        Self {
            tables: Counter::starting_at(first),
            players: Counter::starting_at(first),
            hands: Counter::starting_at(first),
        }
    }

    pub fn next_table_id(&self) -> TableId {
        self.tables.next()
    }

    pub fn next_player_id(&self) -> PlayerId {
        self.players.next()
    }

    pub fn next_hand_id(&self) -> HandId {
        self.hands.next()
    }
}
