//! Upset rate per tournament against its average.

use serde::Serialize;

use crate::domain::UpsetIndex;
use crate::domain::basho::format_basho;
use crate::error::AppError;

use super::chart::{Axis, ChartSpec, Dataset};
use super::text::{RichText, num, pct};
use super::theme::{GOLD, GRID, GRID_FAINT, PINK};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extreme {
    pub basho: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpsetSection {
    pub chart: ChartSpec,
    pub most_upsets: Extreme,
    pub fewest_upsets: Extreme,
    /// Rendered into `#upset-insight`.
    pub insight: RichText,
}

pub fn render_upset(index: &UpsetIndex) -> Result<UpsetSection, AppError> {
    let labels: Vec<String> = index.basho_list.iter().map(|b| format_basho(b)).collect();
    let n = labels.len();

    let main = Dataset::line(
        "番狂わせ率",
        index.upset_rate.iter().copied().map(Some).collect(),
        PINK,
    )
    .background(PINK.with_hex_alpha(0x18))
    .width(2.0)
    .points(2.0, 5.0)
    .filled()
    .smooth(0.3)
    .tooltips(
        index
            .upset_rate
            .iter()
            .map(|r| format!("番狂わせ率: {}", pct(*r)))
            .collect(),
    );

    let avg_label = format!("平均 ({})", pct(index.avg_upset_rate));
    let average = Dataset::constant(avg_label.clone(), index.avg_upset_rate, n, GOLD)
        .width(1.5)
        .dashed([6, 4])
        .points(0.0, 0.0)
        .tooltips(vec![format!("{avg_label}: {}", pct(index.avg_upset_rate)); n]);

    let chart = ChartSpec::lines("upsetChart", labels)
        .dataset(main)
        .dataset(average)
        .axes(
            Axis::grid(GRID_FAINT).dense(20, 45).font_size(10),
            Axis::grid(GRID).percent(),
        );

    let (max_i, min_i) = extremes(&index.upset_rate)
        .ok_or_else(|| AppError::render("upset_index.json: upset_rate is empty."))?;
    let extreme = |i: usize| -> Result<Extreme, AppError> {
        let basho = index.basho_list.get(i).ok_or_else(|| {
            AppError::render("upset_index.json: basho_list is shorter than upset_rate.")
        })?;
        Ok(Extreme {
            basho: basho.clone(),
            rate: index.upset_rate[i],
        })
    };
    let most_upsets = extreme(max_i)?;
    let fewest_upsets = extreme(min_i)?;

    let insight = RichText::new()
        .plain("最も荒れた場所は")
        .strong(format_basho(&most_upsets.basho))
        .plain(format!("（番狂わせ率 {}%）、最も安定した場所は", num(most_upsets.rate)))
        .strong(format_basho(&fewest_upsets.basho))
        .plain(format!("（{}%）。平均は", num(fewest_upsets.rate)))
        .strong(pct(index.avg_upset_rate))
        .plain("で、約4割の取組が番付上位者の敗北に終わっています。");

    Ok(UpsetSection {
        chart,
        most_upsets,
        fewest_upsets,
        insight,
    })
}

/// Indices of the maximum and minimum; the first occurrence wins ties.
fn extremes(values: &[f64]) -> Option<(usize, usize)> {
    let first = *values.first()?;
    let (mut max_i, mut min_i) = (0, 0);
    let (mut max, mut min) = (first, first);
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > max {
            max = v;
            max_i = i;
        }
        if v < min {
            min = v;
            min_i = i;
        }
    }
    Some((max_i, min_i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::fixtures;

    #[test]
    fn extremes_format_as_year_and_month() {
        let section = render_upset(&fixtures::bundle().upset).unwrap();
        assert_eq!(format_basho(&section.fewest_upsets.basho), "2023/1");
        assert_eq!(format_basho(&section.most_upsets.basho), "2023/3");
        assert_eq!(
            section.insight.to_plain(),
            "最も荒れた場所は2023/3（番狂わせ率 41.2%）、最も安定した場所は2023/1（38.5%）。平均は39.85%で、約4割の取組が番付上位者の敗北に終わっています。"
        );
    }

    #[test]
    fn average_is_a_flat_dashed_series() {
        let section = render_upset(&fixtures::bundle().upset).unwrap();
        let avg = &section.chart.datasets[1];
        assert_eq!(avg.label, "平均 (39.85%)");
        assert_eq!(avg.values, [Some(39.85), Some(39.85)]);
        assert_eq!(avg.dash, Some([6, 4]));
        assert_eq!(avg.border_color, Some(GOLD));
    }

    #[test]
    fn ties_resolve_to_first_index() {
        assert_eq!(extremes(&[40.0, 42.0, 42.0, 38.0, 38.0]), Some((1, 3)));
        assert_eq!(extremes(&[]), None);
    }

    #[test]
    fn empty_series_is_an_error() {
        let index = UpsetIndex {
            basho_list: Vec::new(),
            upset_rate: Vec::new(),
            avg_upset_rate: 0.0,
        };
        assert!(render_upset(&index).is_err());
    }
}
