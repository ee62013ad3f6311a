// src/time_ctrl/clock.rs
//! Таймер хода (shot clock) для текущего игрока.

use serde::{Deserialize, Serialize};

use crate::domain::PlayerId;

use super::{TimeBank, TimeRules};

/// Состояние таймера текущего хода.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TurnClock {
    /// Какой игрок сейчас должен сделать ход (None, если сейчас нет активного хода).
    pub current_player: Option<PlayerId>,
    /// Сколько секунд базового времени ещё осталось на этот ход.
    pub remaining_action_secs: u32,
    /// Сколько секунд дополнительного времени (из банка) ещё осталось на этот ход.
    pub remaining_extra_secs: u32,
}

/// Результат "протекания" времени.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimeoutState {
    /// Время ещё не вышло, игрок может думать дальше.
    Ongoing,
    /// Был подключён таймбанк, но игрок ещё не вылетел по времени.
    UsedExtraTime { granted_secs: u32 },
    /// Базовое время и таймбанк исчерпаны – нужен авто-check/fold.
    TimedOut,
    /// Сейчас нет активного игрока, на кого вешать таймер.
    NoActivePlayer,
}

impl TurnClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Начать ход нового игрока согласно правилам.
    pub fn start_turn(&mut self, player_id: PlayerId, rules: &TimeRules) {
        self.current_player = Some(player_id);
        self.remaining_action_secs = rules.base_action_secs;
        self.remaining_extra_secs = 0;
    }

    /// Очистить состояние таймера (например, после того, как игрок сделал действие).
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Протекание `delta_secs` времени для текущего игрока:
    /// сначала base-время, потом кусками из таймбанка.
    pub fn elapse_for_current(&mut self, delta_secs: u32, rules: &TimeRules, bank: &mut TimeBank) -> TimeoutState {
        let Some(player_id) = self.current_player else {
            return TimeoutState::NoActivePlayer;
        };
        if delta_secs == 0 {
            return TimeoutState::Ongoing;
        }

        let mut remaining = delta_secs;

        // 1. Тратим оставшееся базовое время.
        if remaining < self.remaining_action_secs {
            self.remaining_action_secs -= remaining;
            return TimeoutState::Ongoing;
        }
        remaining -= self.remaining_action_secs;
        self.remaining_action_secs = 0;

        // 2. Extra-time: добираем из банка, пока хватает.
        let mut granted_total = 0;
        loop {
            if remaining < self.remaining_extra_secs {
                self.remaining_extra_secs -= remaining;
                return if granted_total > 0 {
                    TimeoutState::UsedExtraTime {
                        granted_secs: granted_total,
                    }
                } else {
                    TimeoutState::Ongoing
                };
            }
            remaining -= self.remaining_extra_secs;
            self.remaining_extra_secs = 0;

            let granted = bank.grant_for_turn(player_id, rules.bank_step_secs);
            if granted == 0 {
                return TimeoutState::TimedOut;
            }
            granted_total += granted;
            self.remaining_extra_secs = granted;
        }
    }
}
