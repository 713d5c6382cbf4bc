//! Longest winning streaks as ranked cards.

use serde::Serialize;

use crate::domain::StreakRecord;
use crate::domain::basho::format_basho;

pub const STREAK_CARDS: usize = 10;

/// Unit printed after a streak length.
pub const STREAK_UNIT: &str = "連勝";

/// End text for a streak still running when the data ends.
pub const ONGOING: &str = "継続中";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakCard {
    pub rank: u32,
    pub shikona: String,
    pub streak: u32,
    /// e.g. `2010/1 12日目 〜 2010/11 2日目`
    pub period: String,
    pub champion: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreakSection {
    /// Rendered into `#streak-cards`.
    pub cards: Vec<StreakCard>,
}

pub fn render_streaks(records: &[StreakRecord]) -> StreakSection {
    let cards = records
        .iter()
        .take(STREAK_CARDS)
        .map(|s| StreakCard {
            rank: s.rank,
            shikona: s.shikona.clone(),
            streak: s.streak,
            period: period(s),
            champion: s.rank == 1,
        })
        .collect();
    StreakSection { cards }
}

fn period(s: &StreakRecord) -> String {
    let start = format!("{} {}日目", format_basho(&s.start_basho), s.start_day);
    let end = if s.is_open() {
        ONGOING.to_string()
    } else {
        format!("{} {}日目", format_basho(&s.end_basho), s.end_day)
    };
    format!("{start} 〜 {end}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::fixtures;

    #[test]
    fn cards_carry_rank_and_period() {
        let section = render_streaks(&fixtures::bundle().streaks);
        let first = &section.cards[0];
        assert!(first.champion);
        assert_eq!(first.streak, 63);
        assert_eq!(first.period, "2010/3 1日目 〜 2010/11 2日目");
        assert!(!section.cards[1].champion);
    }

    #[test]
    fn open_streak_shows_ongoing() {
        let section = render_streaks(&fixtures::bundle().streaks);
        assert_eq!(section.cards[1].period, "2023/7 4日目 〜 継続中");
    }

    #[test]
    fn at_most_ten_cards() {
        let one = fixtures::bundle().streaks[0].clone();
        let many: Vec<StreakRecord> = (1..=12)
            .map(|rank| StreakRecord { rank, ..one.clone() })
            .collect();
        let section = render_streaks(&many);
        assert_eq!(section.cards.len(), STREAK_CARDS);
        assert_eq!(section.cards[9].rank, 10);
    }
}
