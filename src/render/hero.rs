//! Headline statistics.

use serde::Serialize;

use crate::domain::SummaryStats;

use super::text::format_number;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub value: String,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroSection {
    /// Rendered into `#stat-cards`.
    pub cards: Vec<StatCard>,
}

pub fn render_hero(stats: &SummaryStats) -> HeroSection {
    HeroSection {
        cards: vec![
            StatCard {
                value: format_number(stats.total_bouts),
                label: "総取組数",
            },
            StatCard {
                value: stats.total_basho.to_string(),
                label: "場所数",
            },
            StatCard {
                value: format_number(stats.total_rikishi),
                label: "力士数",
            },
            StatCard {
                value: stats.year_range.clone(),
                label: "対象期間",
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_cards_in_page_order() {
        let stats = SummaryStats {
            total_bouts: 123456,
            total_basho: 1500,
            total_rikishi: 2345,
            year_range: "2000-2024".to_string(),
            makuuchi_bouts: None,
            most_common_kimarite: None,
            most_wins_rikishi: None,
        };
        let hero = render_hero(&stats);
        let values: Vec<&str> = hero.cards.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, ["123,456", "1500", "2,345", "2000-2024"]);
        assert_eq!(hero.cards[3].label, "対象期間");
    }
}
