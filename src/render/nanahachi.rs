//! The 7-7 final-day effect: headline rates, win rate by opponent record,
//! win rate by year.

use serde::Serialize;

use crate::domain::{NanahachiAnalysis, OpponentRecordStat};
use crate::error::AppError;

use super::chart::{Annotation, Axis, ChartSpec, Color, Dataset};
use super::text::{RichText, fixed, num, pct};
use super::theme::{GOLD, GRID, RED};

/// Opponent records with fewer bouts are left out of the bar chart.
pub const MIN_BOUTS: u32 = 10;
pub const OPPONENT_BARS: usize = 8;
/// Opponent record quoted in the insight: already kachikoshi, nothing at stake.
pub const SETTLED_OPPONENT: &str = "8-6";

const ABOVE_EVEN: Color = Color::Rgba(230, 180, 34, 0.7);
const BELOW_EVEN: Color = Color::Rgba(231, 76, 60, 0.7);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BigStat {
    pub value: String,
    pub label: &'static str,
    /// Drawn emphasised; the other stat is dimmed.
    pub highlight: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NanahachiSection {
    /// Rendered into `#nanahachi-big-stat`, joined by "vs".
    pub big_stats: [BigStat; 2],
    /// Rendered into `#nanahachi-description`.
    pub description: RichText,
    pub by_opponent: ChartSpec,
    pub by_year: ChartSpec,
    /// Rendered into `#nanahachi-insight`.
    pub insight: RichText,
}

pub fn render_nanahachi(analysis: &NanahachiAnalysis) -> Result<NanahachiSection, AppError> {
    let overall = &analysis.overall;
    let big_stats = [
        BigStat {
            value: pct(overall.win_rate),
            label: "7-7力士の千秋楽勝率",
            highlight: true,
        },
        BigStat {
            value: pct(overall.expected_rate),
            label: "期待値",
            highlight: false,
        },
    ];

    let description = RichText::new().plain(format!(
        "千秋楽（15日目）を7勝7敗で迎えた力士の勝率は{}。\
         勝てば勝ち越し（8-7）、負ければ負け越し（7-8）── この一番は来場所の番付を左右する。\
         期待される50%を大きく上回るこの数字は何を意味するのか？",
        pct(overall.win_rate)
    ));

    Ok(NanahachiSection {
        big_stats,
        description,
        by_opponent: opponent_chart(&analysis.by_opponent_record),
        by_year: year_chart(analysis),
        insight: insight(analysis)?,
    })
}

/// Opponent records with enough bouts, most bouts first, then reversed so the
/// largest bar is drawn at the top.
pub fn opponent_bars(stats: &[OpponentRecordStat]) -> Vec<&OpponentRecordStat> {
    let mut kept: Vec<&OpponentRecordStat> = stats.iter().filter(|d| d.bouts >= MIN_BOUTS).collect();
    kept.sort_by(|a, b| b.bouts.cmp(&a.bouts));
    kept.truncate(OPPONENT_BARS);
    kept.reverse();
    kept
}

fn opponent_chart(stats: &[OpponentRecordStat]) -> ChartSpec {
    let bars = opponent_bars(stats);

    let labels = bars.iter().map(|d| format!("対 {}", d.opp_record)).collect();
    let values = bars.iter().map(|d| d.win_rate).collect();
    let colors = bars
        .iter()
        .map(|d| if d.win_rate >= 50.0 { ABOVE_EVEN } else { BELOW_EVEN })
        .collect();
    let tooltips = bars
        .iter()
        .map(|d| format!("{} ({}勝 / {}番)", pct(d.win_rate), d.wins, d.bouts))
        .collect();

    ChartSpec::horizontal_bars("nanahachi-bar-chart", labels)
        .dataset(Dataset::bars("勝率 (%)", values, colors).tooltips(tooltips))
        .axes(
            Axis::grid(GRID).bounds(0.0, 100.0).percent(),
            Axis::hidden_grid().font_size(12),
        )
        .annotate(Annotation::ValueLine {
            value: 50.0,
            color: RED,
            width: 2.0,
            dash: [6, 4],
        })
}

fn year_chart(analysis: &NanahachiAnalysis) -> ChartSpec {
    let years = &analysis.by_year;
    let n = years.len();
    let labels = years.iter().map(|d| d.year.to_string()).collect();

    let rate = Dataset::line(
        "7-7力士の勝率",
        years.iter().map(|d| Some(d.win_rate)).collect(),
        GOLD,
    )
    .background(GOLD.with_hex_alpha(0x20))
    .width(2.5)
    .points(3.0, 6.0)
    .smooth(0.3)
    .filled()
    .tooltips(
        years
            .iter()
            .map(|d| format!("{} ({}勝 / {}番)", pct(d.win_rate), d.wins, d.bouts))
            .collect(),
    );

    let even = Dataset::constant("基準線 (50%)", 50.0, n, RED)
        .width(1.5)
        .dashed([6, 4])
        .points(0.0, 0.0)
        .tooltips(vec!["基準線: 50%".to_string(); n]);

    ChartSpec::lines("nanahachi-line-chart", labels)
        .dataset(rate)
        .dataset(even)
        .axes(Axis::grid(GRID), Axis::grid(GRID).bounds(20.0, 80.0).percent())
}

fn insight(analysis: &NanahachiAnalysis) -> Result<RichText, AppError> {
    let settled = analysis
        .by_opponent_record
        .iter()
        .find(|d| d.opp_record == SETTLED_OPPONENT)
        .ok_or_else(|| {
            AppError::render(format!(
                "nanahachi_analysis.json: no by_opponent_record entry for '{SETTLED_OPPONENT}'."
            ))
        })?;

    let both = &analysis.both_77;
    let east_pct = if both.total_bouts == 0 {
        "-".to_string()
    } else {
        fixed(f64::from(both.east_wins) / f64::from(both.total_bouts) * 100.0, 0)
    };

    Ok(RichText::new()
        .plain("対戦相手が8勝6敗（既に勝ち越しを決めている）場合、7-7力士の勝率は")
        .strong(format!("{}%", num(settled.win_rate)))
        .plain("まで跳ね上がる。")
        .plain(format!(
            "一方、両者7-7の対戦は{}番中東方{}勝（約{east_pct}%）でほぼ期待通り。",
            both.total_bouts, both.east_wins
        ))
        .plain("勝ち越しがかかっていない相手ほど、7-7力士に有利な結果が出ている。"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::fixtures;

    #[test]
    fn big_stats_compare_with_expected() {
        let section = render_nanahachi(&fixtures::bundle().nanahachi).unwrap();
        assert_eq!(section.big_stats[0].value, "75%");
        assert_eq!(section.big_stats[1].value, "50%");
        assert!(section.big_stats[0].highlight);
        assert!(section.description.to_plain().starts_with("千秋楽（15日目）を7勝7敗で迎えた力士の勝率は75%。"));
    }

    #[test]
    fn bars_drop_small_samples_and_run_bottom_to_top() {
        let section = render_nanahachi(&fixtures::bundle().nanahachi).unwrap();
        let chart = &section.by_opponent;
        assert_eq!(chart.labels, ["対 6-8", "対 7-7", "対 9-5", "対 8-6"]);
        let fill = chart.datasets[0].background.clone().unwrap();
        assert_eq!(fill.at(0), Some(BELOW_EVEN));
        assert_eq!(fill.at(1), Some(ABOVE_EVEN));
        assert_eq!(chart.datasets[0].tooltips[3], "80% (96勝 / 120番)");
        assert!(matches!(chart.annotations[0], Annotation::ValueLine { value, .. } if value == 50.0));
    }

    #[test]
    fn bars_keep_the_eight_busiest() {
        let stats: Vec<OpponentRecordStat> = (0..12)
            .map(|i| OpponentRecordStat {
                opp_record: format!("r{i}"),
                win_rate: 50.0,
                wins: 10,
                bouts: 20 + i,
            })
            .collect();
        let bars = opponent_bars(&stats);
        assert_eq!(bars.len(), OPPONENT_BARS);
        assert_eq!(bars[OPPONENT_BARS - 1].opp_record, "r11");
        assert_eq!(bars[0].opp_record, "r4");
    }

    #[test]
    fn year_chart_has_even_baseline() {
        let section = render_nanahachi(&fixtures::bundle().nanahachi).unwrap();
        let chart = &section.by_year;
        assert_eq!(chart.labels, ["2010", "2011"]);
        assert_eq!(chart.datasets[1].values, [Some(50.0), Some(50.0)]);
        assert_eq!(chart.datasets[1].tooltips[0], "基準線: 50%");
        assert_eq!(chart.y.min, Some(20.0));
        assert_eq!(chart.y.max, Some(80.0));
    }

    #[test]
    fn insight_quotes_settled_opponents_and_both_77() {
        let section = render_nanahachi(&fixtures::bundle().nanahachi).unwrap();
        let text = section.insight.to_plain();
        assert!(text.contains("7-7力士の勝率は80%まで跳ね上がる。"), "{text}");
        assert!(text.contains("両者7-7の対戦は40番中東方21勝（約53%）"), "{text}");
    }

    #[test]
    fn missing_settled_opponent_is_an_error() {
        let mut analysis = fixtures::bundle().nanahachi;
        analysis.by_opponent_record.retain(|d| d.opp_record != SETTLED_OPPONENT);
        assert!(render_nanahachi(&analysis).is_err());
    }
}
