// src/time_ctrl/mod.rs
//! Контроль времени стола (shot clock + time bank + reconnect grace).
//!
//! Время логическое: рантайм сообщает, сколько секунд прошло.

pub mod clock;
pub mod grace;
pub mod time_bank;
pub mod time_rules;

pub use clock::{TimeoutState, TurnClock};
pub use grace::GraceTimers;
pub use time_bank::{PlayerTimeBank, TimeBank};
pub use time_rules::{TimeProfile, TimeRules};

use crate::domain::PlayerId;

/// Какое авто-действие нужно сделать при полном истечении времени.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoActionDecision {
    /// Время не вышло – действий со стороны движка не требуется.
    None,
    /// Время полностью истекло – движок делает авто-check / авто-fold.
    TimeoutCheckOrFold,
}

/// Контроллер времени одного стола.
#[derive(Clone, Debug)]
pub struct TimeController {
    pub rules: TimeRules,
    pub bank: TimeBank,
    pub clock: TurnClock,
    pub grace: GraceTimers,
}

impl TimeController {
    pub fn new(rules: TimeRules) -> Self {
        Self {
            bank: TimeBank::new(rules.bank_per_player_secs),
            clock: TurnClock::new(),
            grace: GraceTimers::new(),
            rules,
        }
    }

    /// Начать ход игрока, если таймер сейчас не на нём.
    pub fn ensure_turn(&mut self, player_id: PlayerId) {
        if self.clock.current_player != Some(player_id) {
            self.clock.start_turn(player_id, &self.rules);
        }
    }

    /// Игрок походил – таймер хода сбрасывается.
    pub fn on_action(&mut self, player_id: PlayerId) {
        if self.clock.current_player == Some(player_id) {
            self.clock.clear();
        }
    }

    /// Протекание времени для текущего актёра.
    pub fn on_time_passed(&mut self, delta_secs: u32) -> AutoActionDecision {
        match self.clock.elapse_for_current(delta_secs, &self.rules, &mut self.bank) {
            TimeoutState::TimedOut => AutoActionDecision::TimeoutCheckOrFold,
            TimeoutState::Ongoing | TimeoutState::NoActivePlayer | TimeoutState::UsedExtraTime { .. } => {
                AutoActionDecision::None
            }
        }
    }

    pub fn grace_expired(&self, player_id: PlayerId, now_secs: u64) -> bool {
        self.grace.is_expired(player_id, now_secs, self.rules.reconnect_grace_secs)
    }
}
