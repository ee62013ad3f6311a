use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::chips::Chips;
use crate::domain::hand::HandRank;
use crate::domain::SeatIndex;

/// Сайд-пот: часть банка, в которую участвуют только некоторые игроки.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SidePot {
    pub amount: Chips,
    pub eligible_seats: Vec<SeatIndex>,
}

/// Вклад одного игрока за раздачу.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contribution {
    pub seat: SeatIndex,
    pub amount: Chips,
    pub folded: bool,
}

/// Как поделили один банк.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotAward {
    pub amount: Chips,
    pub eligible_seats: Vec<SeatIndex>,
    /// Доли победителей (с учётом остатка).
    pub shares: Vec<(SeatIndex, Chips)>,
    /// Лучшая рука в этом банке (None – банк без вскрытия).
    pub winning_rank: Option<HandRank>,
}

/// Посчитать main + side pots из вкладов игроков.
///
/// Уровни вкладов сортируются по возрастанию; банк уровня собирает
/// `(level - prev_level) * число игроков с вкладом >= level`. Претендуют на
/// него не сфолдившие игроки с вкладом >= level.
///
/// Соседние банки с одинаковым составом претендентов склеиваются. Слой, на
/// который никто не претендует (его внесли только сфолдившие), уходит в
/// предыдущий банк. Сумма банков всегда равна сумме вкладов.
pub fn finalize_pots(entries: &[Contribution]) -> Vec<SidePot> {
    let mut levels: Vec<Chips> = entries
        .iter()
        .filter(|e| !e.amount.is_zero())
        .map(|e| e.amount)
        .collect();
    levels.sort_unstable();
    levels.dedup();

    let mut pots: Vec<SidePot> = Vec::new();
    let mut carry = Chips::ZERO;
    let mut prev_level = Chips::ZERO;

    for level in levels {
        let contributors = entries.iter().filter(|e| e.amount >= level).count() as u64;
        let layer = Chips((level - prev_level).0 * contributors);
        prev_level = level;

        let mut eligible: Vec<SeatIndex> = entries
            .iter()
            .filter(|e| e.amount >= level && !e.folded)
            .map(|e| e.seat)
            .collect();
        eligible.sort_unstable();

        if eligible.is_empty() {
            match pots.last_mut() {
                Some(last) => last.amount += layer,
                None => carry += layer,
            }
            continue;
        }

        let amount = layer + carry;
        carry = Chips::ZERO;
        match pots.last_mut() {
            Some(last) if last.eligible_seats == eligible => last.amount += amount,
            _ => pots.push(SidePot {
                amount,
                eligible_seats: eligible,
            }),
        }
    }

    if !carry.is_zero() {
        pots.push(SidePot {
            amount: carry,
            eligible_seats: Vec::new(),
        });
    }

    pots
}

/// Поделить банки между победителями.
///
/// Каждый банк независим: побеждает лучший `HandRank` среди претендентов,
/// при равенстве банк делится поровну. Неделимый остаток раздаётся по одной
/// фишке победителям в порядке `seat_order` (см. `OddChipRule`).
///
/// Если ни у одного претендента нет ранга (банк без вскрытия), банк целиком
/// делят претенденты.
pub fn distribute(
    pots: &[SidePot],
    ranks: &BTreeMap<SeatIndex, HandRank>,
    seat_order: &[SeatIndex],
) -> Vec<PotAward> {
    pots.iter()
        .map(|pot| {
            let best = pot
                .eligible_seats
                .iter()
                .filter_map(|seat| ranks.get(seat))
                .max()
                .copied();

            let mut winners: Vec<SeatIndex> = match best {
                Some(best) => pot
                    .eligible_seats
                    .iter()
                    .copied()
                    .filter(|seat| ranks.get(seat) == Some(&best))
                    .collect(),
                None => pot.eligible_seats.clone(),
            };
            winners.sort_by_key(|seat| order_key(*seat, seat_order));

            PotAward {
                amount: pot.amount,
                eligible_seats: pot.eligible_seats.clone(),
                shares: split_amount(pot.amount, &winners),
                winning_rank: best,
            }
        })
        .collect()
}

/// Позиция места в порядке раздачи остатка; места вне порядка – в конец.
fn order_key(seat: SeatIndex, seat_order: &[SeatIndex]) -> (usize, SeatIndex) {
    let pos = seat_order
        .iter()
        .position(|s| *s == seat)
        .unwrap_or(seat_order.len());
    (pos, seat)
}

/// Поровну + остаток по одной фишке первым в списке.
fn split_amount(amount: Chips, winners: &[SeatIndex]) -> Vec<(SeatIndex, Chips)> {
    if winners.is_empty() {
        return Vec::new();
    }
    let n = winners.len() as u64;
    let share = amount.0 / n;
    let remainder = (amount.0 % n) as usize;

    winners
        .iter()
        .enumerate()
        .map(|(i, seat)| {
            let extra = if i < remainder { 1 } else { 0 };
            (*seat, Chips(share + extra))
        })
        .collect()
}
