//! Terminal formatting of a rendered page.
//!
//! We keep formatting code in one place so the renderers stay free of
//! presentation and output changes are localized (the tests below are
//! string snapshots).

use crate::domain::{Section, SummaryStats};
use crate::plot::render_chart;
use crate::render::rikishi::row_rate;
use crate::render::star_trade::Matrix;
use crate::render::streaks::STREAK_UNIT;
use crate::render::{ChartSpec, Page, ReciprocityCard, RichText, StreakCard, WinRateRow};

/// How charts are drawn in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub plot: bool,
    pub width: usize,
    pub height: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            plot: true,
            width: 72,
            height: 16,
        }
    }
}

/// Banner with the data source and the summary fields the page itself does not show.
pub fn format_header(summary: &SummaryStats, source: &str) -> String {
    let mut out = String::new();

    out.push_str("=== sumo - SUMO DATA LAB ===\n");
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!("Period: {}\n", summary.year_range));
    if let Some(n) = summary.makuuchi_bouts {
        out.push_str(&format!("Makuuchi bouts: {}\n", crate::render::text::format_number(n)));
    }
    if let Some(k) = &summary.most_common_kimarite {
        out.push_str(&format!("Most common kimarite: {k}\n"));
    }
    if let Some(r) = &summary.most_wins_rikishi {
        out.push_str(&format!("Most wins: {r}\n"));
    }

    out
}

/// Every section, in page order.
pub fn format_page(page: &Page, opts: ReportOptions) -> String {
    let parts: Vec<String> = Section::ALL
        .iter()
        .map(|s| format_section(page, *s, opts))
        .collect();
    parts.join("\n")
}

pub fn format_section(page: &Page, section: Section, opts: ReportOptions) -> String {
    let mut out = String::new();
    out.push_str(&format!("== {} ==\n", section.title()));

    match section {
        Section::Hero => {
            for card in &page.hero.cards {
                out.push_str(&format!("{:<10} {}\n", card.label, card.value));
            }
        }
        Section::Kimarite => {
            push_chart(&mut out, &page.kimarite.chart, opts);
            push_text(&mut out, &page.kimarite.insight);
        }
        Section::Trend => {
            push_chart(&mut out, &page.trend.chart, opts);
            push_text(&mut out, &page.trend.insight);
        }
        Section::Rikishi => {
            push_chart(&mut out, &page.rikishi.chart, opts);
            out.push_str("\n勝率ランキング (40場所以上):\n");
            out.push_str(&format_win_rate_table(&page.rikishi.table));
            push_text(&mut out, &page.rikishi.insight);
        }
        Section::Yokozuna => {
            out.push_str(&format!(
                "{} 場所 | {} 力士\n",
                page.yokozuna.basho.len(),
                page.yokozuna.chart.datasets.len()
            ));
            push_chart(&mut out, &page.yokozuna.chart, opts);
        }
        Section::Upset => {
            push_chart(&mut out, &page.upset.chart, opts);
            push_text(&mut out, &page.upset.insight);
        }
        Section::Streaks => {
            for card in &page.streaks.cards {
                out.push_str(&format_streak_card(card));
            }
        }
        Section::Nanahachi => {
            let [main, expected] = &page.nanahachi.big_stats;
            out.push_str(&format!(
                "{} ({})  vs  {} ({})\n",
                main.value, main.label, expected.value, expected.label
            ));
            push_text(&mut out, &page.nanahachi.description);
            push_chart(&mut out, &page.nanahachi.by_opponent, opts);
            push_chart(&mut out, &page.nanahachi.by_year, opts);
            push_text(&mut out, &page.nanahachi.insight);
        }
        Section::StarTrade => {
            push_text(&mut out, &page.star_trade.description);
            push_chart(&mut out, &page.star_trade.trend, opts);
            out.push('\n');
            out.push_str(&format_matrix(&page.star_trade.matrix));
            if !page.star_trade.reciprocity.is_empty() {
                out.push_str("\n相互の貸し借り:\n");
                for card in &page.star_trade.reciprocity {
                    out.push_str(&format_reciprocity(card));
                }
            }
            push_text(&mut out, &page.star_trade.insight);
        }
    }

    out
}

fn push_chart(out: &mut String, chart: &ChartSpec, opts: ReportOptions) {
    if !opts.plot {
        return;
    }
    out.push('\n');
    out.push_str(&render_chart(chart, opts.width, opts.height));
}

fn push_text(out: &mut String, text: &RichText) {
    out.push('\n');
    out.push_str(&text.to_plain());
    out.push('\n');
}

fn format_win_rate_table(rows: &[WinRateRow]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:>3} {:<12} {:>7} {:>11} {:>6}\n", "#", "shikona", "rate", "record", "basho").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<3} {:-<12} {:-<7} {:-<11} {:-<6}\n", "", "", "", "", "").trim_end());
    out.push('\n');

    for r in rows {
        let mark = if r.highlight { "*" } else { " " };
        out.push_str(
            format!(
                "{:>3} {:<12} {:>7} {:>11} {:>6}{mark}\n",
                r.rank,
                truncate(&r.shikona, 12),
                row_rate(r),
                r.record,
                r.basho_count,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn format_streak_card(card: &StreakCard) -> String {
    let crown = if card.champion { "*" } else { " " };
    format!(
        "{crown}{:>2}. {:<12} {:>3}{STREAK_UNIT}  {}\n",
        card.rank,
        truncate(&card.shikona, 12),
        card.streak,
        card.period
    )
}

fn format_matrix(matrix: &Matrix) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<8}", matrix.corner));
    for col in &matrix.columns {
        out.push_str(&format!(" {col:>6}"));
    }
    out.push('\n');
    for row in &matrix.rows {
        out.push_str(&format!("{:<8}", row.record));
        for cell in &row.cells {
            out.push_str(&format!(" {:>6}", cell.text()));
        }
        out.push('\n');
    }
    out
}

fn format_reciprocity(card: &ReciprocityCard) -> String {
    format!("- {}  {}\n", card.names(), card.detail())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
