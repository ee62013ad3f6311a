use serde::{Deserialize, Serialize};

use crate::domain::blinds::TableStakes;
use crate::domain::chips::Chips;
use crate::domain::player::{PlayerAtTable, PlayerStatus};
use crate::domain::{HandId, PlayerId, TableId};
use crate::engine::errors::EngineError;
use crate::time_ctrl::TimeRules;

/// Индекс места за столом (0..max_seats-1).
pub type SeatIndex = u8;

/// Кому отдаётся неделимый остаток при сплите банка.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum OddChipRule {
    /// По одной фишке победителям по кругу, начиная с первого слева от баттона.
    #[default]
    LeftOfButton,
    /// По одной фишке победителям в порядке возрастания номера места.
    LowestSeat,
}

/// Конфиг стола: сколько мест, какие блайнды, тайминг, правило остатка.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableConfig {
    /// Максимальное количество мест за столом (2–10).
    pub max_seats: u8,
    #[serde(default)]
    pub stakes: TableStakes,
    #[serde(default)]
    pub time: TimeRules,
    #[serde(default)]
    pub odd_chip: OddChipRule,
}

impl TableConfig {
    pub fn new(max_seats: u8, stakes: TableStakes) -> Self {
        Self {
            max_seats,
            stakes,
            time: TimeRules::standard(),
            odd_chip: OddChipRule::default(),
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new(9, TableStakes::default())
    }
}

/// Пометка "стол требует ручной проверки" после сбоя ledger.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewFlag {
    pub hand_id: HandId,
    pub reason: String,
}

/// Основное состояние стола (то, что живёт между раздачами).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub config: TableConfig,

    /// Места за столом: индекс вектора = SeatIndex. None – место пустое.
    pub seats: Vec<Option<PlayerAtTable>>,

    /// Дилерская кнопка или None, если раздач ещё не было.
    pub dealer_button: Option<SeatIndex>,

    /// ID текущей/последней раздачи.
    pub current_hand_id: Option<HandId>,

    /// Идёт ли сейчас раздача.
    pub hand_in_progress: bool,

    /// Если Some – новые раздачи запрещены до ручной проверки.
    pub review: Option<ReviewFlag>,
}

impl Table {
    /// Создать пустой стол с заданной конфигурацией.
    pub fn new(id: TableId, name: String, config: TableConfig) -> Self {
        let seats = vec![None; config.max_seats as usize];
        Self {
            id,
            name,
            config,
            seats,
            dealer_button: None,
            current_hand_id: None,
            hand_in_progress: false,
            review: None,
        }
    }

    pub fn max_seats(&self) -> u8 {
        self.config.max_seats
    }

    pub fn seated_count(&self) -> usize {
        self.seats.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_seat_empty(&self, index: SeatIndex) -> bool {
        self.seats
            .get(index as usize)
            .map(|s| s.is_none())
            .unwrap_or(true)
    }

    /// Посадить игрока на свободное место.
    pub fn seat_player(&mut self, seat: SeatIndex, player_id: PlayerId, stack: Chips) -> Result<(), EngineError> {
        if self.seat_of(player_id).is_some() {
            return Err(EngineError::AlreadySeated(player_id));
        }
        let slot = self
            .seats
            .get_mut(seat as usize)
            .ok_or(EngineError::InvalidSeat(seat))?;
        if slot.is_some() {
            return Err(EngineError::SeatOccupied(seat));
        }
        let mut player = PlayerAtTable::new(player_id, stack);
        if stack.is_zero() {
            player.status = PlayerStatus::SittingOut;
        }
        *slot = Some(player);
        Ok(())
    }

    /// Снять игрока со стола. Во время раздачи нельзя – только fold/отключение.
    pub fn remove_player(&mut self, seat: SeatIndex) -> Result<PlayerAtTable, EngineError> {
        if self.hand_in_progress {
            return Err(EngineError::HandAlreadyInProgress);
        }
        self.seats
            .get_mut(seat as usize)
            .ok_or(EngineError::InvalidSeat(seat))?
            .take()
            .ok_or(EngineError::EmptySeat)
    }

    /// Вернуть игрока из SittingOut в игру (со следующей раздачи).
    pub fn sit_in(&mut self, seat: SeatIndex) -> Result<(), EngineError> {
        if self.hand_in_progress {
            return Err(EngineError::HandAlreadyInProgress);
        }
        let player = self.player_mut(seat)?;
        if player.status == PlayerStatus::SittingOut && !player.stack.is_zero() {
            player.status = PlayerStatus::Active;
            Ok(())
        } else {
            Err(EngineError::IllegalAction("sit in возможен только из sitting out с фишками"))
        }
    }

    pub fn player(&self, seat: SeatIndex) -> Result<&PlayerAtTable, EngineError> {
        self.seats
            .get(seat as usize)
            .ok_or(EngineError::InvalidSeat(seat))?
            .as_ref()
            .ok_or(EngineError::EmptySeat)
    }

    pub fn player_mut(&mut self, seat: SeatIndex) -> Result<&mut PlayerAtTable, EngineError> {
        self.seats
            .get_mut(seat as usize)
            .ok_or(EngineError::InvalidSeat(seat))?
            .as_mut()
            .ok_or(EngineError::EmptySeat)
    }

    /// Найти место игрока по его id.
    pub fn seat_of(&self, player_id: PlayerId) -> Option<SeatIndex> {
        self.seats.iter().enumerate().find_map(|(idx, s)| {
            s.as_ref()
                .filter(|p| p.player_id == player_id)
                .map(|_| idx as SeatIndex)
        })
    }

    /// Сумма всех стеков и ставок в раздаче – для проверок сохранения фишек.
    pub fn chips_in_play(&self) -> Chips {
        self.seats
            .iter()
            .flatten()
            .map(|p| p.stack + p.total_bet)
            .sum()
    }
}
