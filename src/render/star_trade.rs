//! Suspected star trading: the yearly 7-7 vs kachikoshi trend, the
//! record-vs-record matrix and mutual-favour pairs.

use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::domain::{RecordMatchup, ReciprocalPair, StarTradeAnalysis, StarTradeYear};

use super::chart::{Annotation, Axis, ChartSpec, Color, Dataset};
use super::text::{RichText, fixed, num, pct_or_dash};
use super::theme::{GOLD, GREY, GRID, RED};

/// Year the match-fixing scandal came to light.
pub const SCANDAL_YEAR: i32 = 2011;
/// First year counted as "after" the scandal in the insight.
pub const RECOVERY_YEAR: i32 = 2016;

pub const MATRIX_ROWS: [&str; 7] = ["7-7", "8-6", "9-5", "6-8", "5-9", "10-4", "4-10"];
pub const MATRIX_COLUMNS: [&str; 7] = ["4-10", "5-9", "6-8", "7-7", "8-6", "9-5", "10-4"];
pub const MATRIX_CORNER: &str = "自分 \\ 相手";
/// Cells with fewer bouts show no rate.
pub const MIN_CELL_BOUTS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatrixCell {
    NoData,
    Rate {
        win_rate: f64,
        background: Color,
        /// Hover text, `W勝/N番`.
        title: String,
    },
}

impl MatrixCell {
    pub fn text(&self) -> String {
        match self {
            MatrixCell::NoData => "-".to_string(),
            MatrixCell::Rate { win_rate, .. } => format!("{}%", num(*win_rate)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixRow {
    pub record: &'static str,
    pub cells: Vec<MatrixCell>,
}

/// Rendered into `#startrade-matrix`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matrix {
    pub corner: &'static str,
    pub columns: Vec<&'static str>,
    pub rows: Vec<MatrixRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReciprocityCard {
    pub rikishi_a: String,
    pub rikishi_b: String,
    pub fewer: u32,
    pub more: u32,
    pub total: u32,
}

impl ReciprocityCard {
    pub fn names(&self) -> String {
        format!("{} ↔ {}", self.rikishi_a, self.rikishi_b)
    }

    pub fn detail(&self) -> String {
        format!(
            "互いに{}〜{}回の\"貸し\" / 計{}番",
            self.fewer, self.more, self.total
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarTradeSection {
    /// Rendered into `#startrade-description`.
    pub description: RichText,
    pub trend: ChartSpec,
    pub matrix: Matrix,
    /// Rendered into `#startrade-reciprocity`.
    pub reciprocity: Vec<ReciprocityCard>,
    /// Rendered into `#startrade-insight`.
    pub insight: RichText,
}

pub fn render_star_trade(analysis: &StarTradeAnalysis) -> StarTradeSection {
    let description = RichText::new().plain(
        "大相撲では「星の貸し借り」── つまり勝敗のやり取り ── の存在が長年噂されてきました。\
         2011年には実際に八百長問題が発覚し、力士の処分が行われました。\
         ここでは統計的な視点からこの問題にアプローチします。",
    );

    StarTradeSection {
        description,
        trend: trend_chart(&analysis.yearly_trend),
        matrix: matrix(&analysis.record_matchup_matrix),
        reciprocity: analysis.reciprocity.top_pairs.iter().map(card).collect(),
        insight: insight(&analysis.yearly_trend),
    }
}

fn trend_chart(trend: &[StarTradeYear]) -> ChartSpec {
    let labels = trend.iter().map(|d| d.year.to_string()).collect();

    let nanahachi = Dataset::line(
        "7-7 vs 勝ち越し勝率",
        trend.iter().map(|d| d.nanahachi_vs_kachikoshi_rate).collect(),
        GOLD,
    )
    .background(GOLD.with_hex_alpha(0x18))
    .width(2.5)
    .points(3.0, 6.0)
    .smooth(0.3)
    .filled()
    .tooltips(
        trend
            .iter()
            .map(|d| {
                format!(
                    "7-7 vs 勝ち越し: {} ({}番)",
                    pct_or_dash(d.nanahachi_vs_kachikoshi_rate),
                    d.nanahachi_vs_kachikoshi_bouts
                )
            })
            .collect(),
    );

    let baseline = Dataset::line(
        "baseline（通常対戦での番付下位勝率）",
        trend.iter().map(|d| d.baseline_rate).collect(),
        GREY,
    )
    .background(Color::Rgba(136, 136, 136, 0.08))
    .width(2.0)
    .points(2.0, 5.0)
    .smooth(0.3)
    .dashed([4, 3])
    .tooltips(
        trend
            .iter()
            .map(|d| format!("baseline: {}", pct_or_dash(d.baseline_rate)))
            .collect(),
    );

    let chart = ChartSpec::lines("startrade-trend-chart", labels)
        .dataset(nanahachi)
        .dataset(baseline)
        .axes(Axis::grid(GRID), Axis::grid(GRID).bounds(20.0, 100.0).percent());

    match trend.iter().position(|d| d.year == SCANDAL_YEAR) {
        Some(index) => chart.annotate(Annotation::IndexMarker {
            index,
            color: RED,
            width: 2.0,
            dash: [6, 4],
            label: vec![format!("{SCANDAL_YEAR}年"), "八百長問題発覚".to_string()],
        }),
        None => {
            warn!(year = SCANDAL_YEAR, "yearly trend has no entry for the marker year; marker skipped");
            chart
        }
    }
}

/// Cell shading: gold for rates at or above 50%, red below, deepening over 30 points.
pub fn cell_background(win_rate: f64) -> Color {
    if win_rate >= 50.0 {
        let intensity = ((win_rate - 50.0) / 30.0).min(1.0);
        Color::Rgba(230, 180, 34, 0.08 + intensity * 0.35)
    } else {
        let intensity = ((50.0 - win_rate) / 30.0).min(1.0);
        Color::Rgba(231, 76, 60, 0.08 + intensity * 0.3)
    }
}

pub fn matrix(entries: &[RecordMatchup]) -> Matrix {
    // Later entries win on duplicate keys.
    let lookup: HashMap<(&str, &str), &RecordMatchup> = entries
        .iter()
        .map(|d| ((d.wrestler_record.as_str(), d.opponent_record.as_str()), d))
        .collect();

    let rows = MATRIX_ROWS
        .iter()
        .map(|&record| MatrixRow {
            record,
            cells: MATRIX_COLUMNS
                .iter()
                .map(|&opponent| match lookup.get(&(record, opponent)) {
                    Some(d) if d.bouts >= MIN_CELL_BOUTS => MatrixCell::Rate {
                        win_rate: d.win_rate,
                        background: cell_background(d.win_rate),
                        title: format!("{}勝/{}番", d.wrestler_wins, d.bouts),
                    },
                    _ => MatrixCell::NoData,
                })
                .collect(),
        })
        .collect();

    Matrix {
        corner: MATRIX_CORNER,
        columns: MATRIX_COLUMNS.to_vec(),
        rows,
    }
}

fn card(pair: &ReciprocalPair) -> ReciprocityCard {
    ReciprocityCard {
        rikishi_a: pair.rikishi_a.clone(),
        rikishi_b: pair.rikishi_b.clone(),
        fewer: pair.a_favors_b.min(pair.b_favors_a),
        more: pair.a_favors_b.max(pair.b_favors_a),
        total: pair.total,
    }
}

/// Mean over the present values, `None` when there are none.
fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .flatten()
        .fold((0.0, 0u32), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / f64::from(count))
}

fn insight(trend: &[StarTradeYear]) -> RichText {
    let before = mean(
        trend
            .iter()
            .filter(|d| d.year < SCANDAL_YEAR)
            .map(|d| d.nanahachi_vs_kachikoshi_rate),
    );
    let after = mean(
        trend
            .iter()
            .filter(|d| d.year >= RECOVERY_YEAR)
            .map(|d| d.nanahachi_vs_kachikoshi_rate),
    );
    let baselines: Vec<f64> = trend.iter().filter_map(|d| d.baseline_rate).collect();
    let baseline_min = baselines.iter().copied().reduce(f64::min);
    let baseline_max = baselines.iter().copied().reduce(f64::max);

    let or_dash = |v: Option<f64>, decimals: usize| {
        v.map(|x| fixed(x, decimals)).unwrap_or_else(|| "-".to_string())
    };

    RichText::new()
        .plain("2000年代は7-7力士の勝率が60-70%台と不自然に高い年が散見される（2011年以前の平均: ")
        .strong(format!("{}%", or_dash(before, 1)))
        .plain("）が、2011年の八百長問題発覚後、特に2016年以降は勝率が低下傾向にある（2016年以降の平均: ")
        .strong(format!("{}%", or_dash(after, 1)))
        .plain(format!(
            "）。baselineの番付下位勝率が約{}-{}%であることを考えると、7-7力士の高勝率は統計的に有意な偏りと言える。",
            or_dash(baseline_min, 0),
            or_dash(baseline_max, 0)
        ))
        .plain("ただし、「勝ち越しがかかるモチベーションの差」という合理的な説明も成立し得る。")
}
