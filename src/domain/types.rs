//! View models for the nine upstream JSON documents.
//!
//! These mirror the documents written by the analytics pipeline field for field.
//! Fields that the page never reads but the pipeline always writes are kept as
//! `Option`s with `#[serde(default)]` so that older or trimmed documents still load.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// `summary_stats.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_bouts: u64,
    pub total_basho: u64,
    pub total_rikishi: u64,
    pub year_range: String,
    #[serde(default)]
    pub makuuchi_bouts: Option<u64>,
    #[serde(default)]
    pub most_common_kimarite: Option<String>,
    #[serde(default)]
    pub most_wins_rikishi: Option<String>,
}

/// One row of a technique-frequency table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KimariteEntry {
    pub kimarite: String,
    pub count: u64,
    pub pct: f64,
}

/// `kimarite_ranking.json`: entries sorted by count, descending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KimariteRanking {
    pub makuuchi: Vec<KimariteEntry>,
    #[serde(default)]
    pub all: Vec<KimariteEntry>,
}

/// A technique's yearly share, aligned with `KimariteTrend::years`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechniqueSeries {
    pub kimarite: String,
    pub pct_by_year: Vec<f64>,
}

/// `kimarite_trend.json`
///
/// Upstream writes `techniques` as a JSON object keyed by technique code. The
/// object is decoded into a list in document order so iteration order never
/// depends on map implementation details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KimariteTrend {
    pub years: Vec<i32>,
    #[serde(deserialize_with = "ordered_techniques")]
    pub techniques: Vec<TechniqueSeries>,
}

impl KimariteTrend {
    pub fn series(&self, kimarite: &str) -> Option<&TechniqueSeries> {
        self.techniques.iter().find(|s| s.kimarite == kimarite)
    }
}

fn ordered_techniques<'de, D>(deserializer: D) -> Result<Vec<TechniqueSeries>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedVisitor;

    impl<'de> Visitor<'de> for OrderedVisitor {
        type Value = Vec<TechniqueSeries>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object mapping technique codes to yearly percentages")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((kimarite, pct_by_year)) = map.next_entry::<String, Vec<f64>>()? {
                out.push(TechniqueSeries {
                    kimarite,
                    pct_by_year,
                });
            }
            Ok(out)
        }
    }

    deserializer.deserialize_map(OrderedVisitor)
}

/// One element of `rikishi_wins.json` (sorted by wins, descending).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RikishiRecord {
    #[serde(default)]
    pub rank: Option<u32>,
    pub shikona: String,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    pub basho_count: u32,
}

/// One tournament of a yokozuna's record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BashoWinRate {
    pub basho: String,
    pub win_rate: f64,
    #[serde(default)]
    pub wins: Option<u32>,
    #[serde(default)]
    pub losses: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YokozunaSeries {
    pub shikona: String,
    #[serde(default)]
    pub rid: Option<u64>,
    pub data: Vec<BashoWinRate>,
}

/// `yokozuna_dominance.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YokozunaDominance {
    pub rikishi: Vec<YokozunaSeries>,
}

/// `upset_index.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsetIndex {
    pub basho_list: Vec<String>,
    pub upset_rate: Vec<f64>,
    pub avg_upset_rate: f64,
}

/// One element of `winning_streaks.json`.
///
/// A streak still running when the data ends has an empty `end_basho` and
/// `end_day == 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakRecord {
    pub rank: u32,
    pub shikona: String,
    pub streak: u32,
    pub start_basho: String,
    pub start_day: u32,
    pub end_basho: String,
    pub end_day: u32,
}

impl StreakRecord {
    pub fn is_open(&self) -> bool {
        self.end_basho.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NanahachiOverall {
    pub win_rate: f64,
    pub expected_rate: f64,
    #[serde(default)]
    pub total_bouts: Option<u32>,
    #[serde(default)]
    pub wins: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpponentRecordStat {
    pub opp_record: String,
    pub win_rate: f64,
    pub wins: u32,
    pub bouts: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearStat {
    pub year: i32,
    pub win_rate: f64,
    pub wins: u32,
    pub bouts: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BothNanahachi {
    pub total_bouts: u32,
    pub east_wins: u32,
    #[serde(default)]
    pub note: Option<String>,
}

/// `nanahachi_analysis.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NanahachiAnalysis {
    pub overall: NanahachiOverall,
    pub by_opponent_record: Vec<OpponentRecordStat>,
    pub by_year: Vec<YearStat>,
    pub both_77: BothNanahachi,
}

/// Yearly 7-7-vs-kachikoshi rate against the lower-rank baseline.
///
/// Either rate is `None` when upstream had no qualifying bouts that year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarTradeYear {
    pub year: i32,
    pub nanahachi_vs_kachikoshi_rate: Option<f64>,
    pub baseline_rate: Option<f64>,
    #[serde(default)]
    pub nanahachi_vs_kachikoshi_bouts: u32,
    #[serde(default)]
    pub baseline_bouts: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMatchup {
    pub wrestler_record: String,
    pub opponent_record: String,
    pub win_rate: f64,
    pub wrestler_wins: u32,
    pub bouts: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReciprocalPair {
    pub rikishi_a: String,
    pub rikishi_b: String,
    pub a_favors_b: u32,
    pub b_favors_a: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reciprocity {
    pub top_pairs: Vec<ReciprocalPair>,
    #[serde(default)]
    pub total_favor_pairs: Option<u32>,
    #[serde(default)]
    pub mutual_pairs: Option<u32>,
    #[serde(default)]
    pub mutual_rate: Option<f64>,
}

/// `star_trading_analysis.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarTradeAnalysis {
    pub yearly_trend: Vec<StarTradeYear>,
    pub record_matchup_matrix: Vec<RecordMatchup>,
    pub reciprocity: Reciprocity,
}
