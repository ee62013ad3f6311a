//! In-memory учёт фишек: для локальных столов, CLI и тестов.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::trace;

use crate::domain::{Chips, PlayerId};
use crate::engine::{ChipLedger, LedgerError};

#[derive(Debug, Default)]
struct LedgerInner {
    balances: HashMap<PlayerId, Chips>,
    /// Если задано – следующая операция с этим номером упадёт (для проверки отката).
    fail_at_op: Option<u64>,
    ops: u64,
}

/// Балансы игроков в памяти. Клоны делят одно хранилище,
/// так что тест может держать копию и смотреть балансы снаружи стола.
#[derive(Clone, Debug, Default)]
pub struct InMemoryLedger {
    inner: Arc<Mutex<LedgerInner>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Открыть счёт (или пополнить существующий).
    pub fn deposit(&self, player_id: PlayerId, amount: Chips) {
        if let Ok(mut inner) = self.inner.lock() {
            *inner.balances.entry(player_id).or_insert(Chips::ZERO) += amount;
        }
    }

    pub fn balance(&self, player_id: PlayerId) -> Chips {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| inner.balances.get(&player_id).copied())
            .unwrap_or(Chips::ZERO)
    }

    /// Сломать операцию номер `n` (считая с 1, от текущего момента).
    pub fn fail_after(&self, n: u64) {
        if let Ok(mut inner) = self.inner.lock() {
            let target = inner.ops + n;
            inner.fail_at_op = Some(target);
        }
    }

    fn apply<F>(&self, player_id: PlayerId, op: F) -> Result<(), LedgerError>
    where
        F: FnOnce(Chips) -> Result<Chips, LedgerError>,
    {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| LedgerError::Unavailable("ledger mutex poisoned".to_string()))?;
        inner.ops += 1;
        if inner.fail_at_op == Some(inner.ops) {
            inner.fail_at_op = None;
            return Err(LedgerError::Unavailable(format!("операция #{} отклонена", inner.ops)));
        }
        let current = *inner
            .balances
            .get(&player_id)
            .ok_or(LedgerError::UnknownAccount(player_id))?;
        let next = op(current)?;
        inner.balances.insert(player_id, next);
        Ok(())
    }
}

impl ChipLedger for InMemoryLedger {
    fn deduct(&mut self, player_id: PlayerId, amount: Chips) -> Result<(), LedgerError> {
        trace!(player_id, %amount, "ledger deduct");
        self.apply(player_id, |balance| {
            balance.checked_sub(amount).ok_or(LedgerError::InsufficientBalance {
                player_id,
                requested: amount,
                available: balance,
            })
        })
    }

    fn credit(&mut self, player_id: PlayerId, amount: Chips) -> Result<(), LedgerError> {
        trace!(player_id, %amount, "ledger credit");
        self.apply(player_id, |balance| Ok(balance + amount))
    }
}
