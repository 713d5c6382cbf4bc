use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// The page sections, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    Hero,
    Kimarite,
    Trend,
    Rikishi,
    Yokozuna,
    Upset,
    Streaks,
    Nanahachi,
    StarTrade,
}

impl Section {
    pub const ALL: [Section; 9] = [
        Section::Hero,
        Section::Kimarite,
        Section::Trend,
        Section::Rikishi,
        Section::Yokozuna,
        Section::Upset,
        Section::Streaks,
        Section::Nanahachi,
        Section::StarTrade,
    ];

    /// Anchor id of the section on the page.
    pub fn anchor(self) -> &'static str {
        match self {
            Section::Hero => "hero",
            Section::Kimarite => "kimarite",
            Section::Trend => "trend",
            Section::Rikishi => "rikishi",
            Section::Yokozuna => "yokozuna",
            Section::Upset => "upset",
            Section::Streaks => "streaks",
            Section::Nanahachi => "nanahachi",
            Section::StarTrade => "startrade",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::Hero => "SUMO DATA LAB",
            Section::Kimarite => "決まり手ランキング",
            Section::Trend => "決まり手の時代変遷",
            Section::Rikishi => "力士勝利数ランキング",
            Section::Yokozuna => "横綱の支配力",
            Section::Upset => "番狂わせ指数",
            Section::Streaks => "連勝記録",
            Section::Nanahachi => "千秋楽7勝7敗の謎",
            Section::StarTrade => "星の貸し借り検出",
        }
    }

    pub fn next(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_and_prev_wrap() {
        assert_eq!(Section::StarTrade.next(), Section::Hero);
        assert_eq!(Section::Hero.prev(), Section::StarTrade);
        assert_eq!(Section::Kimarite.next().prev(), Section::Kimarite);
    }
}
