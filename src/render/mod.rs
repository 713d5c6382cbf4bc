//! Pure renderers: view models in, render descriptions out.
//!
//! Every section renderer reads only its own documents and returns a plain
//! value (charts, rows, cards, rich text). Presentation adapters (`site`,
//! `report`, `tui`) apply those values; nothing here touches markup or a
//! terminal.

pub mod chart;
pub mod hero;
pub mod kimarite;
pub mod nanahachi;
pub mod rikishi;
pub mod star_trade;
pub mod streaks;
pub mod text;
pub mod theme;
pub mod upset;
pub mod yokozuna;

use serde::Serialize;
use tracing::info;

use crate::data::DataBundle;
use crate::domain::Section;
use crate::error::AppError;

pub use chart::{Annotation, Axis, ChartKind, ChartSpec, Color, Dataset, Fill, LegendPosition};
pub use hero::{HeroSection, StatCard, render_hero};
pub use kimarite::{KimariteSection, TrendSection, render_kimarite_ranking, render_kimarite_trend};
pub use nanahachi::{NanahachiSection, render_nanahachi};
pub use rikishi::{RikishiSection, WinRateRow, render_rikishi};
pub use star_trade::{Matrix, MatrixCell, ReciprocityCard, StarTradeSection, render_star_trade};
pub use streaks::{StreakCard, StreakSection, render_streaks};
pub use text::{RichText, Span};
pub use theme::ChartTheme;
pub use upset::{UpsetSection, render_upset};
pub use yokozuna::{YokozunaSection, render_yokozuna};

/// Every section of the page, rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub hero: HeroSection,
    pub kimarite: KimariteSection,
    pub trend: TrendSection,
    pub rikishi: RikishiSection,
    pub yokozuna: YokozunaSection,
    pub upset: UpsetSection,
    pub streaks: StreakSection,
    pub nanahachi: NanahachiSection,
    pub star_trade: StarTradeSection,
}

/// Run every renderer over the bundle. The first renderer error fails the page.
pub fn render_page(bundle: &DataBundle) -> Result<Page, AppError> {
    let page = Page {
        hero: render_hero(&bundle.summary),
        kimarite: render_kimarite_ranking(&bundle.kimarite)?,
        trend: render_kimarite_trend(&bundle.trend)?,
        rikishi: render_rikishi(&bundle.rikishi)?,
        yokozuna: render_yokozuna(&bundle.yokozuna),
        upset: render_upset(&bundle.upset)?,
        streaks: render_streaks(&bundle.streaks),
        nanahachi: render_nanahachi(&bundle.nanahachi)?,
        star_trade: render_star_trade(&bundle.star_trade),
    };
    info!(charts = page.charts().len(), "page rendered");
    Ok(page)
}

impl Page {
    /// All charts in page order.
    pub fn charts(&self) -> Vec<&ChartSpec> {
        Section::ALL
            .iter()
            .flat_map(|s| self.section_charts(*s))
            .collect()
    }

    /// Charts belonging to one section, in page order.
    pub fn section_charts(&self, section: Section) -> Vec<&ChartSpec> {
        match section {
            Section::Hero | Section::Streaks => Vec::new(),
            Section::Kimarite => vec![&self.kimarite.chart],
            Section::Trend => vec![&self.trend.chart],
            Section::Rikishi => vec![&self.rikishi.chart],
            Section::Yokozuna => vec![&self.yokozuna.chart],
            Section::Upset => vec![&self.upset.chart],
            Section::Nanahachi => vec![&self.nanahachi.by_opponent, &self.nanahachi.by_year],
            Section::StarTrade => vec![&self.star_trade.trend],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::fixtures;

    #[test]
    fn renders_every_section() {
        let page = render_page(&fixtures::bundle()).unwrap();
        let ids: Vec<&str> = page.charts().iter().map(|c| c.canvas_id).collect();
        assert_eq!(
            ids,
            [
                "kimariteChart",
                "trendChart",
                "rikishiChart",
                "yokozunaChart",
                "upsetChart",
                "nanahachi-bar-chart",
                "nanahachi-line-chart",
                "startrade-trend-chart",
            ]
        );
    }

    #[test]
    fn rendering_is_idempotent() {
        let bundle = fixtures::bundle();
        let first = render_page(&bundle).unwrap();
        let second = render_page(&bundle).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn one_failing_renderer_fails_the_page() {
        let mut bundle = fixtures::bundle();
        bundle.upset.upset_rate.clear();
        bundle.upset.basho_list.clear();
        let err = render_page(&bundle).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_RENDER);
    }
}
