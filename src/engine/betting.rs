use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::Stage;
use crate::domain::player::PlayerAtTable;
use crate::domain::{SeatIndex, Table};
use crate::engine::positions::seats_from;

/// Чем закончился раунд ставок.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BettingRoundResult {
    /// Остался один не сфолдивший игрок – он забирает банк без вскрытия.
    FoldedToOne(SeatIndex),
    /// Все, кто может ходить, уравняли ставку после полного круга.
    BetsMatched,
    /// Ходить может не больше одного игрока, остальные в олл-ине.
    AllInStandoff,
}

/// Состояние раунда ставок (на конкретной улице).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BettingState {
    /// Улица, к которой относится этот раунд.
    pub street: Stage,
    /// Текущая целевая ставка, до которой должны дотянуться игроки.
    pub current_bet: Chips,
    /// Минимальный размер повышающей части рейза.
    pub min_raise: Chips,
    /// Seat последнего агрессора (bet/raise/all-in сверху).
    pub last_aggressor: Option<SeatIndex>,
    /// Очередь ходящих: кто ещё должен сделать действие на этой улице.
    /// Голова очереди – текущий актёр.
    pub to_act: Vec<SeatIndex>,
    /// Уровень ставки после последнего хода каждого походившего на улице.
    pub acted_at: Vec<(SeatIndex, Chips)>,
}

impl BettingState {
    pub fn new(street: Stage, current_bet: Chips, min_raise: Chips, to_act: Vec<SeatIndex>) -> Self {
        Self {
            street,
            current_bet,
            min_raise,
            last_aggressor: None,
            to_act,
            acted_at: Vec::new(),
        }
    }

    /// Чей сейчас ход.
    pub fn current_actor(&self) -> Option<SeatIndex> {
        self.to_act.first().copied()
    }

    /// Сколько игроку нужно доплатить до текущей ставки.
    pub fn to_call(&self, player: &PlayerAtTable) -> Chips {
        self.current_bet.saturating_sub(player.current_bet)
    }

    /// Удалить seat из очереди to_act, если он там есть.
    pub fn mark_acted(&mut self, seat: SeatIndex) {
        self.to_act.retain(|s| *s != seat);
        self.record_acted(seat);
    }

    fn record_acted(&mut self, seat: SeatIndex) {
        self.acted_at.retain(|(s, _)| *s != seat);
        self.acted_at.push((seat, self.current_bet));
    }

    /// Может ли seat повышать.
    ///
    /// Кто уже ходил на улице, снова может повышать, только если ставка
    /// с тех пор выросла хотя бы на полный рейз (в том числе суммой
    /// нескольких неполных олл-инов). Иначе – только call или fold.
    pub fn can_reraise(&self, seat: SeatIndex) -> bool {
        match self.acted_at.iter().find(|(s, _)| *s == seat) {
            None => true,
            Some((_, level)) => self.current_bet.saturating_sub(*level) >= self.min_raise,
        }
    }

    /// Обновить состояние после bet/raise:
    /// новая цель, новый минимальный рейз (если рейз полный), новая очередь.
    pub fn on_raise(&mut self, seat: SeatIndex, new_bet: Chips, raise_size: Chips, new_to_act: Vec<SeatIndex>) {
        self.current_bet = new_bet;
        if raise_size >= self.min_raise {
            self.min_raise = raise_size;
        }
        self.last_aggressor = Some(seat);
        self.to_act = new_to_act;
        self.record_acted(seat);
    }

    /// Очередь пуста – все, кому нужно, походили после последнего рейза.
    pub fn is_round_complete(&self) -> bool {
        self.to_act.is_empty()
    }
}

/// Собрать очередь ходящих, начиная с места `first` (включительно).
///
/// Если ходить может только один игрок и ему нечего уравнивать,
/// торговли нет – очередь пустая.
pub fn build_queue(table: &Table, first: SeatIndex, current_bet: Chips) -> Vec<SeatIndex> {
    let queue = seats_from(table, first, PlayerAtTable::can_act);
    if queue.len() == 1 {
        let matched = table.seats[queue[0] as usize]
            .as_ref()
            .map(|p| p.current_bet >= current_bet)
            .unwrap_or(true);
        if matched {
            return Vec::new();
        }
    }
    queue
}

/// Очередь после рейза: все, кто ещё может ходить, по кругу после рейзера.
pub fn queue_after_raise(table: &Table, raiser: SeatIndex) -> Vec<SeatIndex> {
    let max = table.seats.len().max(1);
    let start = ((raiser as usize + 1) % max) as SeatIndex;
    seats_from(table, start, PlayerAtTable::can_act)
        .into_iter()
        .filter(|s| *s != raiser)
        .collect()
}

/// Единственная проверка "закончился ли раунд".
///
/// None – раунд идёт, ждём действие от `betting.current_actor()`.
pub fn round_outcome(table: &Table, betting: &BettingState) -> Option<BettingRoundResult> {
    let in_hand: Vec<SeatIndex> = seats_from(table, 0, PlayerAtTable::is_in_hand);
    if in_hand.len() == 1 {
        return Some(BettingRoundResult::FoldedToOne(in_hand[0]));
    }
    if !betting.is_round_complete() {
        return None;
    }

    let can_act = seats_from(table, 0, PlayerAtTable::can_act).len();
    if can_act <= 1 {
        Some(BettingRoundResult::AllInStandoff)
    } else {
        Some(BettingRoundResult::BetsMatched)
    }
}
