//! Career win ranking: a wins bar chart and a win-rate table.
//!
//! The chart and the table are different slices of the same list. The chart
//! takes the first entries in upstream order (most wins first); the table keeps
//! only long careers and orders them by win rate.

use serde::Serialize;

use crate::domain::RikishiRecord;
use crate::error::AppError;

use super::chart::{Axis, ChartSpec, Color, Dataset};
use super::text::{RichText, format_number, num, pct};
use super::theme::{GOLD, GRID};

/// Wrestler highlighted in the chart, the table and the insight.
pub const FEATURED_RIKISHI: &str = "白鵬";

pub const CHART_BARS: usize = 15;
pub const TABLE_ROWS: usize = 15;
/// Minimum number of tournaments for the win-rate table.
pub const MIN_BASHO: u32 = 40;

const OTHER_BAR: Color = Color::Rgba(123, 45, 139, 0.6);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinRateRow {
    pub rank: usize,
    pub shikona: String,
    pub win_rate: f64,
    /// Width of the inline win-rate bar, in pixels.
    pub bar_width: u32,
    /// `W-L`
    pub record: String,
    pub basho_count: u32,
    pub highlight: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RikishiSection {
    pub chart: ChartSpec,
    /// Rendered into `#winRateTable`.
    pub table: Vec<WinRateRow>,
    /// Rendered into `#rikishi-insight`.
    pub insight: RichText,
}

pub fn render_rikishi(records: &[RikishiRecord]) -> Result<RikishiSection, AppError> {
    Ok(RikishiSection {
        chart: wins_chart(records),
        table: win_rate_table(records),
        insight: insight(records)?,
    })
}

/// Most wins first, independent of the table's basho filter.
fn wins_chart(records: &[RikishiRecord]) -> ChartSpec {
    let mut by_wins: Vec<&RikishiRecord> = records.iter().collect();
    by_wins.sort_by(|a, b| b.wins.cmp(&a.wins));
    let top: Vec<&RikishiRecord> = by_wins.into_iter().take(CHART_BARS).rev().collect();

    let labels = top.iter().map(|r| r.shikona.clone()).collect();
    let values = top.iter().map(|r| f64::from(r.wins)).collect();
    let colors = top
        .iter()
        .map(|r| if r.shikona == FEATURED_RIKISHI { GOLD } else { OTHER_BAR })
        .collect();
    let tooltips = top
        .iter()
        .map(|r| format!("{}勝 {}敗 (勝率{})", r.wins, r.losses, pct(r.win_rate)))
        .collect();

    ChartSpec::horizontal_bars("rikishiChart", labels)
        .dataset(Dataset::bars("", values, colors).tooltips(tooltips))
        .axes(Axis::grid(GRID), Axis::hidden_grid().font_size(12))
}

/// Long careers ordered by win rate. The sort is stable, so ties keep upstream order.
pub fn win_rate_table(records: &[RikishiRecord]) -> Vec<WinRateRow> {
    let mut eligible: Vec<&RikishiRecord> =
        records.iter().filter(|r| r.basho_count >= MIN_BASHO).collect();
    eligible.sort_by(|a, b| b.win_rate.total_cmp(&a.win_rate));

    eligible
        .into_iter()
        .take(TABLE_ROWS)
        .enumerate()
        .map(|(i, r)| WinRateRow {
            rank: i + 1,
            shikona: r.shikona.clone(),
            win_rate: r.win_rate,
            bar_width: r.win_rate.round().max(0.0) as u32,
            record: format!("{}-{}", r.wins, r.losses),
            basho_count: r.basho_count,
            highlight: r.shikona == FEATURED_RIKISHI,
        })
        .collect()
}

fn insight(records: &[RikishiRecord]) -> Result<RichText, AppError> {
    let featured = records
        .iter()
        .find(|r| r.shikona == FEATURED_RIKISHI)
        .ok_or_else(|| {
            AppError::render(format!("rikishi_wins.json: no entry for {FEATURED_RIKISHI}."))
        })?;
    let second = records
        .get(1)
        .ok_or_else(|| AppError::render("rikishi_wins.json: needs at least two entries."))?;
    let gap = i64::from(featured.wins) - i64::from(second.wins);

    Ok(RichText::new()
        .strong(FEATURED_RIKISHI)
        .plain("は通算")
        .strong(format!("{}勝", format_number(u64::from(featured.wins))))
        .plain("、勝率")
        .strong(pct(featured.win_rate))
        .plain(format!("で2位の{}({}勝)に", second.shikona, second.wins))
        .strong(format!("{gap}勝差"))
        .plain("をつける圧倒的な記録。勝利数も勝率も歴代トップの「平成の大横綱」です。"))
}

/// Display form of a table row's rate.
pub fn row_rate(row: &WinRateRow) -> String {
    format!("{}%", num(row.win_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::fixtures;

    fn record(shikona: &str, wins: u32, losses: u32, win_rate: f64, basho_count: u32) -> RikishiRecord {
        RikishiRecord {
            rank: None,
            shikona: shikona.to_string(),
            wins,
            losses,
            win_rate,
            basho_count,
        }
    }

    #[test]
    fn table_keeps_long_careers_sorted_by_rate() {
        let records = fixtures::bundle().rikishi;
        let table = win_rate_table(&records);
        let names: Vec<&str> = table.iter().map(|r| r.shikona.as_str()).collect();
        assert_eq!(names, ["白鵬", "日馬富士", "魁皇"]);
        assert!(table.iter().all(|r| r.basho_count >= MIN_BASHO));
        assert!(table.windows(2).all(|w| w[0].win_rate >= w[1].win_rate));
        assert_eq!(table[0].bar_width, 85);
        assert_eq!(table[0].record, "1093-199");
        assert!(table[0].highlight);
        assert_eq!(table[2].rank, 3);
        assert_eq!(row_rate(&table[1]), "65.6%");
    }

    #[test]
    fn table_caps_at_fifteen_rows() {
        let records: Vec<RikishiRecord> = (0..30)
            .map(|i| record(&format!("r{i}"), 500, 300, 50.0 + f64::from(i) * 0.5, 45))
            .collect();
        let table = win_rate_table(&records);
        assert_eq!(table.len(), TABLE_ROWS);
        assert_eq!(table[0].shikona, "r29");
    }

    #[test]
    fn chart_ignores_the_table_filter() {
        let section = render_rikishi(&fixtures::bundle().rikishi).unwrap();
        // 新星 has too few basho for the table but still gets a bar.
        assert_eq!(section.chart.labels, ["新星", "日馬富士", "魁皇", "白鵬"]);
        let fill = section.chart.datasets[0].background.clone().unwrap();
        assert_eq!(fill.at(3), Some(GOLD));
        assert_eq!(fill.at(0), Some(OTHER_BAR));
        assert_eq!(section.chart.datasets[0].tooltips[3], "1093勝 199敗 (勝率84.6%)");
    }

    #[test]
    fn chart_sorts_unordered_input_by_wins() {
        let mut records = vec![record("白鵬", 1093, 199, 84.6, 86), record("b", 900, 400, 69.2, 80)];
        for i in 0..15 {
            records.push(record(&format!("low{i}"), 100 - i, 100, 40.0, 50));
        }
        records.push(record("big", 2000, 100, 95.2, 120));

        let chart = render_rikishi(&records).unwrap().chart;
        assert_eq!(chart.labels.len(), CHART_BARS);
        assert_eq!(chart.labels[CHART_BARS - 1], "big");
        assert_eq!(chart.labels[CHART_BARS - 2], "白鵬");
        assert_eq!(chart.labels[CHART_BARS - 3], "b");
        assert_eq!(chart.labels[0], "low11");
        assert_eq!(chart.datasets[0].values[CHART_BARS - 1], Some(2000.0));
    }

    #[test]
    fn insight_compares_featured_with_second() {
        let section = render_rikishi(&fixtures::bundle().rikishi).unwrap();
        assert_eq!(
            section.insight.to_plain(),
            "白鵬は通算1,093勝、勝率84.6%で2位の魁皇(879勝)に214勝差をつける圧倒的な記録。勝利数も勝率も歴代トップの「平成の大横綱」です。"
        );
    }

    #[test]
    fn missing_featured_wrestler_is_an_error() {
        let records = vec![record("a", 10, 5, 66.7, 50), record("b", 9, 6, 60.0, 50)];
        assert!(render_rikishi(&records).is_err());
    }
}
