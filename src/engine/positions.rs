use crate::domain::player::PlayerAtTable;
use crate::domain::{SeatIndex, Table};

/// Места по кругу, начиная со `start` (включительно), для которых `pred` == true.
pub fn seats_from<F>(table: &Table, start: SeatIndex, pred: F) -> Vec<SeatIndex>
where
    F: Fn(&PlayerAtTable) -> bool,
{
    let max = table.seats.len();
    if max == 0 {
        return Vec::new();
    }

    let mut seats = Vec::new();
    let mut idx = start as usize % max;
    for _ in 0..max {
        if let Some(p) = table.seats[idx].as_ref() {
            if pred(p) {
                seats.push(idx as SeatIndex);
            }
        }
        idx = (idx + 1) % max;
    }
    seats
}

/// Следующее за `from` место по кругу (не включая `from`), подходящее под `pred`.
pub fn next_seat_after<F>(table: &Table, from: SeatIndex, pred: F) -> Option<SeatIndex>
where
    F: Fn(&PlayerAtTable) -> bool,
{
    let max = table.seats.len();
    if max == 0 {
        return None;
    }
    let start = (from as usize + 1) % max;
    seats_from(table, start as SeatIndex, pred).first().copied()
}

/// Предложить следующую позицию дилера среди игроков, участвующих в раздаче:
/// - если есть текущая кнопка – следующий участник по кругу;
/// - если нет – первый участник с места 0.
pub fn next_dealer<F>(table: &Table, dealt_in: F) -> Option<SeatIndex>
where
    F: Fn(&PlayerAtTable) -> bool,
{
    match table.dealer_button {
        Some(button) => next_seat_after(table, button, dealt_in),
        None => seats_from(table, 0, dealt_in).first().copied(),
    }
}

/// Все занятые места, начиная с первого слева от кнопки. Кнопка – последняя.
pub fn seat_order_left_of(table: &Table, button: SeatIndex) -> Vec<SeatIndex> {
    let max = table.seats.len().max(1);
    let start = ((button as usize + 1) % max) as SeatIndex;
    seats_from(table, start, |_| true)
}
