// src/time_ctrl/grace.rs
//! Grace-период для отключившихся игроков.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::PlayerId;

/// Кто и когда (логическое время стола, сек) отключился.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GraceTimers {
    disconnected_at: HashMap<PlayerId, u64>,
}

impl GraceTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Зафиксировать отключение. Повторное отключение не сдвигает отсчёт.
    pub fn start(&mut self, player_id: PlayerId, now_secs: u64) {
        self.disconnected_at.entry(player_id).or_insert(now_secs);
    }

    /// Игрок вернулся. true – он действительно был в списке отключённых.
    pub fn cancel(&mut self, player_id: PlayerId) -> bool {
        self.disconnected_at.remove(&player_id).is_some()
    }

    pub fn is_tracking(&self, player_id: PlayerId) -> bool {
        self.disconnected_at.contains_key(&player_id)
    }

    /// Истёк ли grace у игрока к моменту `now_secs`.
    pub fn is_expired(&self, player_id: PlayerId, now_secs: u64, grace_secs: u32) -> bool {
        self.disconnected_at
            .get(&player_id)
            .map(|at| now_secs.saturating_sub(*at) >= u64::from(grace_secs))
            .unwrap_or(false)
    }

    /// Все отключённые (порядок не гарантирован).
    pub fn tracked(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.disconnected_at.keys().copied()
    }
}
