use crate::domain::card::{Card, Rank};
use crate::domain::hand::HandRank;
use crate::engine::errors::EngineError;

use super::hand_rank::HandCategory;
use super::lookup_tables::{detect_straight, rank_to_bit, RankMask};

/// Главная функция: вычислить лучшую 5-карточную руку из hole + board.
///
/// Принимает от 5 до 7 карт суммарно. Результат не зависит от порядка карт:
/// перебираются все 5-карточные подмножества и берётся максимум.
///
/// Меньше 5 (или больше 7) карт – `InvalidEvaluationState`; повтор карты – `DuplicateCard`.
pub fn evaluate_best_hand(hole: &[Card], board: &[Card]) -> Result<HandRank, EngineError> {
    let mut all_cards = Vec::with_capacity(hole.len() + board.len());
    all_cards.extend_from_slice(hole);
    all_cards.extend_from_slice(board);
    evaluate_cards(&all_cards)
}

/// То же самое для готового набора карт.
pub fn evaluate_cards(cards: &[Card]) -> Result<HandRank, EngineError> {
    if !(5..=7).contains(&cards.len()) {
        return Err(EngineError::InvalidEvaluationState { cards: cards.len() });
    }
    for (i, card) in cards.iter().enumerate() {
        if cards[i + 1..].contains(card) {
            return Err(EngineError::DuplicateCard(*card));
        }
    }

    best_of_all_5card_combinations(cards)
        .ok_or(EngineError::InvalidEvaluationState { cards: cards.len() })
}

/// Перебираем все комбинации 5 карт из N (N=5–7, максимум 21) и выбираем лучшую.
fn best_of_all_5card_combinations(cards: &[Card]) -> Option<HandRank> {
    let n = cards.len();
    let mut best: Option<HandRank> = None;

    for a in 0..n {
        for b in (a + 1)..n {
            for c in (b + 1)..n {
                for d in (c + 1)..n {
                    for e in (d + 1)..n {
                        let five = [cards[a], cards[b], cards[c], cards[d], cards[e]];
                        let r = evaluate_5card_hand(&five);
                        if best.map_or(true, |best_r| r > best_r) {
                            best = Some(r);
                        }
                    }
                }
            }
        }
    }

    best
}

/// Оценка строго 5-карточной комбинации.
fn evaluate_5card_hand(cards: &[Card; 5]) -> HandRank {
    let mut suit_counts = [0u8; 4];
    let mut rank_counts = [0u8; 15]; // индексы 2..14
    let mut rank_mask: RankMask = 0;

    for card in cards.iter() {
        suit_counts[card.suit.index()] += 1;
        rank_counts[card.rank.value() as usize] += 1;
        rank_mask |= rank_to_bit(card.rank);
    }

    let is_flush = suit_counts.iter().any(|&c| c == 5);
    let straight_high = detect_straight(rank_mask);

    // Группы (rank, count), отсортированные по count desc, затем rank desc.
    let mut groups: Vec<(Rank, u8)> = Rank::ALL
        .iter()
        .rev()
        .filter(|r| rank_counts[r.value() as usize] > 0)
        .map(|r| (*r, rank_counts[r.value() as usize]))
        .collect();
    groups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

    // pattern: [4,1], [3,2], [3,1,1], [2,2,1], [2,1,1,1], [1,1,1,1,1]
    let pattern: Vec<u8> = groups.iter().map(|g| g.1).collect();
    let keys: Vec<Rank> = groups.iter().map(|g| g.0).collect();

    let category = match (is_flush, straight_high, pattern.as_slice()) {
        (true, Some(high), _) => {
            return HandRank::from_category_and_keys(HandCategory::StraightFlush, &[high]);
        }
        (_, _, [4, 1]) => HandCategory::FourOfAKind,
        (_, _, [3, 2]) => HandCategory::FullHouse,
        (true, None, _) => HandCategory::Flush,
        (false, Some(high), _) => {
            return HandRank::from_category_and_keys(HandCategory::Straight, &[high]);
        }
        (_, _, [3, 1, 1]) => HandCategory::ThreeOfAKind,
        (_, _, [2, 2, 1]) => HandCategory::TwoPair,
        (_, _, [2, 1, 1, 1]) => HandCategory::OnePair,
        _ => HandCategory::HighCard,
    };

    // Для всех остальных категорий ключи = ранги групп в порядке значимости
    // (у флеша и старшей карты это просто 5 рангов по убыванию).
    HandRank::from_category_and_keys(category, &keys)
}
