use core::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::card::Rank;
use crate::domain::hand::HandRank;

/// Категория покерной руки по силе.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl HandCategory {
    const ALL: [HandCategory; 9] = [
        HandCategory::HighCard,
        HandCategory::OnePair,
        HandCategory::TwoPair,
        HandCategory::ThreeOfAKind,
        HandCategory::Straight,
        HandCategory::Flush,
        HandCategory::FullHouse,
        HandCategory::FourOfAKind,
        HandCategory::StraightFlush,
    ];
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HandCategory::HighCard => "High card",
            HandCategory::OnePair => "One pair",
            HandCategory::TwoPair => "Two pair",
            HandCategory::ThreeOfAKind => "Three of a kind",
            HandCategory::Straight => "Straight",
            HandCategory::Flush => "Flush",
            HandCategory::FullHouse => "Full house",
            HandCategory::FourOfAKind => "Four of a kind",
            HandCategory::StraightFlush => "Straight flush",
        };
        f.write_str(s)
    }
}

impl HandRank {
    /// Собрать HandRank из категории и ключей тай-брейка (от старшего к младшему).
    ///
    /// Схема кодирования (u32):
    ///   [категория:4 бита][k0:4][k1:4][k2:4][k3:4][k4:4]
    /// Ранги 2..14 влезают в 4 бита. Неиспользуемые ключи = 0,
    /// так что сравнение u32 и есть полный порядок рук.
    pub fn from_category_and_keys(category: HandCategory, keys: &[Rank]) -> Self {
        debug_assert!(keys.len() <= 5);
        let mut value = (category as u32) & 0x0F;
        for i in 0..5 {
            let nibble = keys.get(i).map(|r| r.value() as u32).unwrap_or(0);
            value = (value << 4) | nibble;
        }
        HandRank(value)
    }

    /// Вытащить категорию из HandRank.
    pub fn category(&self) -> HandCategory {
        let cat_id = ((self.0 >> 20) & 0x0F) as usize;
        HandCategory::ALL
            .get(cat_id)
            .copied()
            .unwrap_or(HandCategory::HighCard)
    }

    /// Значимые ключи тай-брейка (от старшего к младшему).
    pub fn ranks(&self) -> Vec<Rank> {
        (0..5)
            .rev()
            .filter_map(|i| Rank::from_value(((self.0 >> (i * 4)) & 0x0F) as u8))
            .collect()
    }
}

/// Удобная функция – получить категорию из HandRank.
pub fn hand_category(rank: HandRank) -> HandCategory {
    rank.category()
}

/// Человеческое описание руки: категория + ключи, например "Two pair (K, 7, A)".
pub fn describe_hand(rank: HandRank) -> String {
    let keys: Vec<String> = rank.ranks().iter().map(|r| r.to_string()).collect();
    format!("{} ({})", rank.category(), keys.join(", "))
}
