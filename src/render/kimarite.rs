//! Technique frequency ranking and the yearly technique-share trend.

use serde::Serialize;

use crate::domain::{KimariteEntry, KimariteRanking, KimariteTrend};
use crate::error::AppError;

use super::chart::{Axis, ChartSpec, Color, Dataset};
use super::text::{RichText, fixed, format_number, num, pct, signed_change};
use super::theme::{GOLD, GRID, PURPLE, series_color};

/// Number of bars in the ranking chart.
pub const RANKING_BARS: usize = 15;

/// Japanese name of a technique, for the techniques the page labels.
pub fn kimarite_ja(code: &str) -> Option<&'static str> {
    let name = match code {
        "yorikiri" => "寄り切り",
        "oshidashi" => "押し出し",
        "hatakikomi" => "はたき込み",
        "yoritaoshi" => "寄り倒し",
        "uwatenage" => "上手投げ",
        "tsukiotoshi" => "突き落とし",
        "hikiotoshi" => "引き落とし",
        "oshitaoshi" => "押し倒し",
        "okuridashi" => "送り出し",
        "shitatenage" => "下手投げ",
        "tsukidashi" => "突き出し",
        "sukuinage" => "すくい投げ",
        "kotenage" => "小手投げ",
        "uwatedashinage" => "上手出し投げ",
        "katasukashi" => "肩透かし",
        _ => return None,
    };
    Some(name)
}

fn display_name(code: &str) -> &str {
    kimarite_ja(code).unwrap_or(code)
}

/// Bar colour by rank (0 = most frequent).
///
/// Rank 0 is gold, rank 1 purple, and every later rank a gold whose opacity
/// falls linearly with rank: `0.15 + 0.55 * (1 - rank / 14)`.
pub fn bar_color(rank: usize) -> Color {
    match rank {
        0 => GOLD,
        1 => PURPLE,
        r => Color::Rgba(230, 180, 34, 0.15 + 0.55 * (1.0 - r as f64 / 14.0)),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KimariteSection {
    pub chart: ChartSpec,
    /// Combined share of the two most frequent techniques.
    pub top2_pct: f64,
    /// Rendered into `#kimarite-insight`.
    pub insight: RichText,
}

pub fn render_kimarite_ranking(ranking: &KimariteRanking) -> Result<KimariteSection, AppError> {
    let entries = &ranking.makuuchi;
    let (first, second) = match entries.as_slice() {
        [a, b, ..] => (a, b),
        _ => {
            return Err(AppError::render(
                "kimarite_ranking.json: makuuchi needs at least two entries.",
            ));
        }
    };

    // Highest count is drawn at the top of a horizontal bar chart, i.e. last.
    let mut by_count: Vec<&KimariteEntry> = entries.iter().collect();
    by_count.sort_by(|a, b| b.count.cmp(&a.count));
    let items: Vec<_> = by_count.into_iter().take(RANKING_BARS).rev().collect();
    let n = items.len();

    let labels = items
        .iter()
        .map(|e| match kimarite_ja(&e.kimarite) {
            Some(ja) => format!("{} ({ja})", e.kimarite),
            None => e.kimarite.clone(),
        })
        .collect();
    let values = items.iter().map(|e| e.count as f64).collect();
    let colors = (0..n).map(|i| bar_color(n - 1 - i)).collect();
    let tooltips = items
        .iter()
        .map(|e| format!("{}回 ({}%)", format_number(e.count), num(e.pct)))
        .collect();

    let chart = ChartSpec::horizontal_bars("kimariteChart", labels)
        .dataset(Dataset::bars("", values, colors).tooltips(tooltips))
        .axes(
            Axis::grid(GRID).font_family("Inter"),
            Axis::hidden_grid().font_size(11),
        );

    let top2_pct = first.pct + second.pct;
    let insight = RichText::new()
        .strong(display_name(&first.kimarite))
        .plain("と")
        .strong(display_name(&second.kimarite))
        .plain("だけで幕内の取組の約")
        .strong(format!("{}%", fixed(top2_pct, 1)))
        .plain("を占めています。")
        .plain("上位2つの決まり手で約半数が決着 ── シンプルに見えて、この2技を極めることこそが勝利への最短路です。");

    Ok(KimariteSection {
        chart,
        top2_pct,
        insight,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSection {
    pub chart: ChartSpec,
    /// Rendered into `#trend-insight`.
    pub insight: RichText,
}

pub fn render_kimarite_trend(trend: &KimariteTrend) -> Result<TrendSection, AppError> {
    let labels = trend.years.iter().map(|y| y.to_string()).collect();

    let mut chart = ChartSpec::lines("trendChart", labels)
        .axes(Axis::grid(GRID), Axis::grid(GRID).percent());

    for (i, series) in trend.techniques.iter().enumerate() {
        let color = series_color(i);
        let label = display_name(&series.kimarite).to_string();
        let tooltips = series
            .pct_by_year
            .iter()
            .map(|v| format!("{label}: {}", pct(*v)))
            .collect();
        let values = series.pct_by_year.iter().copied().map(Some).collect();
        chart = chart.dataset(
            Dataset::line(label, values, color)
                .background(color.with_hex_alpha(0x20))
                .width(2.5)
                .points(3.0, 6.0)
                .smooth(0.3)
                .tooltips(tooltips),
        );
    }

    let yori = overall_change(trend, "yorikiri")?;
    let oshi = overall_change(trend, "oshidashi")?;

    let insight = RichText::new()
        .plain(format!("{}年間で", trend.years.len()))
        .strong(display_name("yorikiri"))
        .plain(format!("の割合は{}pt、", signed_change(yori)))
        .strong(display_name("oshidashi"))
        .plain(format!(
            "は{}pt変化。近年は押し出しが増加傾向にあり、パワー・スピード重視の「押し相撲」時代が到来しつつあります。",
            signed_change(oshi)
        ));

    Ok(TrendSection { chart, insight })
}

/// Last-year share minus first-year share of one technique.
fn overall_change(trend: &KimariteTrend, kimarite: &str) -> Result<f64, AppError> {
    let series = trend
        .series(kimarite)
        .ok_or_else(|| AppError::render(format!("kimarite_trend.json: no series for '{kimarite}'.")))?;
    match (series.pct_by_year.first(), series.pct_by_year.last()) {
        (Some(first), Some(last)) => Ok(last - first),
        _ => Err(AppError::render(format!(
            "kimarite_trend.json: series '{kimarite}' is empty."
        ))),
    }
}
