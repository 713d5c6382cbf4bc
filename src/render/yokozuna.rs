//! Per-tournament win rate of each yokozuna on a shared tournament axis.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::domain::YokozunaDominance;
use crate::domain::basho::format_basho;

use super::chart::{Axis, ChartSpec, Dataset, LegendPosition};
use super::text::pct_or_dash;
use super::theme::{GRID, GRID_FAINT, series_color};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YokozunaSection {
    /// Sorted union of every series' tournament codes.
    pub basho: Vec<String>,
    pub chart: ChartSpec,
}

/// Sorted union of all tournament codes. Codes are fixed-width, so
/// lexicographic order is chronological.
pub fn basho_axis(dominance: &YokozunaDominance) -> Vec<String> {
    dominance
        .rikishi
        .iter()
        .flat_map(|r| r.data.iter().map(|d| d.basho.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn render_yokozuna(dominance: &YokozunaDominance) -> YokozunaSection {
    let basho = basho_axis(dominance);
    let labels = basho.iter().map(|b| format_basho(b)).collect();

    let mut chart = ChartSpec::lines("yokozunaChart", labels).axes(
        Axis::grid(GRID_FAINT).dense(20, 45).font_size(10),
        Axis::grid(GRID).bounds(0.0, 100.0).percent(),
    );
    chart.legend = LegendPosition::Top;
    chart.span_gaps = false;

    for (i, series) in dominance.rikishi.iter().enumerate() {
        let by_basho: HashMap<&str, f64> = series
            .data
            .iter()
            .map(|d| (d.basho.as_str(), d.win_rate))
            .collect();
        let values: Vec<Option<f64>> = basho
            .iter()
            .map(|b| by_basho.get(b.as_str()).copied())
            .collect();
        let tooltips = values
            .iter()
            .map(|v| format!("{}: {}", series.shikona, pct_or_dash(*v)))
            .collect();

        let color = series_color(i);
        chart = chart.dataset(
            Dataset::line(series.shikona.clone(), values, color)
                .background(color.with_hex_alpha(0x30))
                .width(2.0)
                .points(2.0, 5.0)
                .smooth(0.3)
                .tooltips(tooltips),
        );
    }

    YokozunaSection { basho, chart }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::fixtures;
    use crate::domain::{BashoWinRate, YokozunaSeries};

    #[test]
    fn axis_is_sorted_union_with_gaps() {
        let section = render_yokozuna(&fixtures::bundle().yokozuna);
        assert_eq!(section.basho, ["202301", "202303"]);
        assert_eq!(section.chart.labels, ["2023/1", "2023/3"]);

        let a = &section.chart.datasets[0];
        let b = &section.chart.datasets[1];
        assert_eq!(a.values, [Some(86.7), Some(80.0)]);
        assert_eq!(b.values, [None, Some(66.7)]);
        assert_eq!(b.tooltips, ["B: -", "B: 66.7%"]);
        assert!(!section.chart.span_gaps);
    }

    #[test]
    fn missing_values_are_never_zero() {
        let point = |basho: &str| BashoWinRate {
            basho: basho.to_string(),
            win_rate: 0.0,
            wins: None,
            losses: None,
        };
        let dominance = YokozunaDominance {
            rikishi: vec![
                YokozunaSeries {
                    shikona: "x".to_string(),
                    rid: None,
                    data: vec![point("201901"), point("201911")],
                },
                YokozunaSeries {
                    shikona: "y".to_string(),
                    rid: None,
                    data: vec![point("201905")],
                },
            ],
        };
        let section = render_yokozuna(&dominance);
        assert_eq!(section.basho, ["201901", "201905", "201911"]);
        assert_eq!(section.chart.datasets[0].values, [Some(0.0), None, Some(0.0)]);
        assert_eq!(section.chart.datasets[1].values, [None, Some(0.0), None]);
    }

    #[test]
    fn colours_cycle_the_palette() {
        let section = render_yokozuna(&fixtures::bundle().yokozuna);
        assert_eq!(section.chart.datasets[1].border_color, Some(series_color(1)));
        assert_eq!(
            section.chart.datasets[0].background.as_ref().and_then(|f| f.at(0)).map(|c| c.to_string()),
            Some("#e6b42230".to_string())
        );
    }
}
