// src/time_ctrl/time_rules.rs
//! Конфигурация тайминга стола: shot-clock, таймбанк, grace при отключении.
//!
//! Здесь описываем только "правила", без состояния и без привязки к конкретному столу.

use serde::{Deserialize, Serialize};

/// Профиль тайминга.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimeProfile {
    /// 20 сек на ход + time bank по 10 сек.
    Standard,
    /// 10 сек на ход + time bank по 5 сек.
    Turbo,
}

/// Правила тайминга для одного стола.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeRules {
    /// Сколько секунд даётся на базовое решение (каждый ход).
    #[serde(default = "default_base_action_secs")]
    pub base_action_secs: u32,
    /// Сколько секунд time bank доступно каждому игроку на сессию.
    #[serde(default = "default_bank_per_player_secs")]
    pub bank_per_player_secs: u32,
    /// Какой "кусок" банка выдаётся за раз, когда base-время кончилось.
    #[serde(default = "default_bank_step_secs")]
    pub bank_step_secs: u32,
    /// Сколько секунд отключённый игрок сохраняет контроль над местом.
    #[serde(default = "default_reconnect_grace_secs")]
    pub reconnect_grace_secs: u32,
}

fn default_base_action_secs() -> u32 {
    20
}

fn default_bank_per_player_secs() -> u32 {
    60
}

fn default_bank_step_secs() -> u32 {
    10
}

fn default_reconnect_grace_secs() -> u32 {
    30
}

impl TimeRules {
    /// Строгий конструктор.
    pub const fn new(
        base_action_secs: u32,
        bank_per_player_secs: u32,
        bank_step_secs: u32,
        reconnect_grace_secs: u32,
    ) -> Self {
        Self {
            base_action_secs,
            bank_per_player_secs,
            bank_step_secs,
            reconnect_grace_secs,
        }
    }

    /// Стандартный профиль: 20 сек на ход, 60 сек банка по 10 сек, 30 сек grace.
    pub const fn standard() -> Self {
        Self::new(20, 60, 10, 30)
    }

    pub const fn turbo() -> Self {
        Self::new(10, 30, 5, 30)
    }

    /// Получить правила по профилю.
    pub const fn from_profile(profile: TimeProfile) -> Self {
        match profile {
            TimeProfile::Standard => Self::standard(),
            TimeProfile::Turbo => Self::turbo(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base_action_secs == 0 {
            return Err("base_action_secs должно быть больше нуля".to_string());
        }
        if self.bank_per_player_secs > 0 && self.bank_step_secs == 0 {
            return Err("bank_step_secs = 0 при ненулевом таймбанке".to_string());
        }
        Ok(())
    }
}

impl Default for TimeRules {
    fn default() -> Self {
        Self::standard()
    }
}
