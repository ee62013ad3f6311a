// src/domain/blinds.rs

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;

/// Тип анте.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum AnteType {
    /// Без анте.
    #[default]
    None,
    /// Классическое анте с каждого игрока.
    Classic,
    /// Big Blind Ante – анте платит только биг-блайнд.
    BigBlind,
}

/// Стейки стола (SB/BB/ante).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableStakes {
    pub small_blind: Chips,
    pub big_blind: Chips,
    #[serde(default)]
    pub ante_type: AnteType,
    #[serde(default)]
    pub ante: Chips,
}

impl TableStakes {
    pub fn new(sb: Chips, bb: Chips, ante_type: AnteType, ante: Chips) -> Self {
        Self {
            small_blind: sb,
            big_blind: bb,
            ante_type,
            ante,
        }
    }

    /// Блайнды без анте; SB = половина BB (с округлением вниз, минимум 1).
    pub fn from_big_blind(bb: u64) -> Self {
        Self::new(
            Chips((bb / 2).max(1)),
            Chips(bb),
            AnteType::None,
            Chips::ZERO,
        )
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.small_blind.is_zero() {
            return Err("small_blind = 0".into());
        }
        if self.big_blind.0 < self.small_blind.0 {
            return Err(format!(
                "big_blind ({}) < small_blind ({})",
                self.big_blind, self.small_blind
            ));
        }
        if self.ante_type != AnteType::None && self.ante.is_zero() {
            return Err("ante_type задан, но ante = 0".into());
        }
        Ok(())
    }
}

impl Default for TableStakes {
    fn default() -> Self {
        Self::from_big_blind(100)
    }
}
