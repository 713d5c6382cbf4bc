//! Concurrent, all-or-nothing loading of the upstream JSON documents.
//!
//! Every document is fetched on the rayon pool and parsed as JSON. The batch is
//! joined with a short-circuiting `collect`, so a single failed fetch (I/O error,
//! HTTP error status, or a body that is not JSON) fails the whole load and
//! nothing gets rendered.

use std::fs;

use rayon::prelude::*;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::data::source::DataSource;
use crate::domain::{
    KimariteRanking, KimariteTrend, NanahachiAnalysis, RikishiRecord, StarTradeAnalysis, StreakRecord,
    SummaryStats, UpsetIndex, YokozunaDominance,
};
use crate::error::AppError;

/// The documents the page is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    SummaryStats,
    KimariteRanking,
    KimariteTrend,
    RikishiWins,
    YokozunaDominance,
    UpsetIndex,
    NanahachiAnalysis,
    StarTradingAnalysis,
    WinningStreaks,
}

impl Resource {
    pub const ALL: [Resource; 9] = [
        Resource::SummaryStats,
        Resource::KimariteRanking,
        Resource::KimariteTrend,
        Resource::RikishiWins,
        Resource::YokozunaDominance,
        Resource::UpsetIndex,
        Resource::NanahachiAnalysis,
        Resource::StarTradingAnalysis,
        Resource::WinningStreaks,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Resource::SummaryStats => "summary_stats.json",
            Resource::KimariteRanking => "kimarite_ranking.json",
            Resource::KimariteTrend => "kimarite_trend.json",
            Resource::RikishiWins => "rikishi_wins.json",
            Resource::YokozunaDominance => "yokozuna_dominance.json",
            Resource::UpsetIndex => "upset_index.json",
            Resource::NanahachiAnalysis => "nanahachi_analysis.json",
            Resource::StarTradingAnalysis => "star_trading_analysis.json",
            Resource::WinningStreaks => "winning_streaks.json",
        }
    }
}

/// All nine documents, decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct DataBundle {
    pub summary: SummaryStats,
    pub kimarite: KimariteRanking,
    pub trend: KimariteTrend,
    pub rikishi: Vec<RikishiRecord>,
    pub yokozuna: YokozunaDominance,
    pub upset: UpsetIndex,
    pub nanahachi: NanahachiAnalysis,
    pub star_trade: StarTradeAnalysis,
    pub streaks: Vec<StreakRecord>,
}

pub struct DataLoader {
    source: DataSource,
    client: Option<Client>,
}

impl DataLoader {
    pub fn new(source: DataSource) -> Self {
        let client = match source {
            DataSource::Url(_) => Some(Client::new()),
            DataSource::Dir(_) => None,
        };
        Self { source, client }
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    /// Fetch every document concurrently and decode the batch.
    pub fn load(&self) -> Result<DataBundle, AppError> {
        info!(source = %self.source, "loading {} documents", Resource::ALL.len());

        // `collect` keeps the order of `Resource::ALL`.
        let docs: Vec<Value> = Resource::ALL
            .par_iter()
            .map(|&resource| self.fetch_json(resource))
            .collect::<Result<_, AppError>>()?;
        let [summary, kimarite, trend, rikishi, yokozuna, upset, nanahachi, star_trade, streaks]: [Value; 9] =
            docs.try_into()
                .map_err(|_| AppError::input("Document batch is incomplete."))?;

        let bundle = DataBundle {
            summary: decode(Resource::SummaryStats, summary)?,
            kimarite: decode(Resource::KimariteRanking, kimarite)?,
            trend: decode(Resource::KimariteTrend, trend)?,
            rikishi: decode(Resource::RikishiWins, rikishi)?,
            yokozuna: decode(Resource::YokozunaDominance, yokozuna)?,
            upset: decode(Resource::UpsetIndex, upset)?,
            nanahachi: decode(Resource::NanahachiAnalysis, nanahachi)?,
            star_trade: decode(Resource::StarTradingAnalysis, star_trade)?,
            streaks: decode(Resource::WinningStreaks, streaks)?,
        };

        info!("all documents loaded");
        Ok(bundle)
    }

    fn fetch_json(&self, resource: Resource) -> Result<Value, AppError> {
        let location = self.source.locate(resource.file_name());
        debug!(%location, "fetching");

        let body = match (&self.source, &self.client) {
            (DataSource::Dir(_), _) => fs::read_to_string(&location)
                .map_err(|e| AppError::input(format!("Failed to read '{location}': {e}")))?,
            (DataSource::Url(_), Some(client)) => {
                let resp = client
                    .get(&location)
                    .send()
                    .map_err(|e| AppError::input(format!("Request for '{location}' failed: {e}")))?;
                if !resp.status().is_success() {
                    return Err(AppError::input(format!(
                        "Request for '{location}' failed with status {}.",
                        resp.status()
                    )));
                }
                resp.text()
                    .map_err(|e| AppError::input(format!("Failed to read body of '{location}': {e}")))?
            }
            (DataSource::Url(_), None) => {
                return Err(AppError::input("No HTTP client configured for URL source."));
            }
        };

        let doc: Value = serde_json::from_str(&body)
            .map_err(|e| AppError::input(format!("'{location}' is not valid JSON: {e}")))?;
        debug!(file = resource.file_name(), bytes = body.len(), "fetched");
        Ok(doc)
    }
}

fn decode<T: DeserializeOwned>(resource: Resource, doc: Value) -> Result<T, AppError> {
    serde_json::from_value(doc).map_err(|e| {
        AppError::input(format!(
            "{} does not match the expected schema: {e}",
            resource.file_name()
        ))
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! A small but complete set of documents, shared by renderer and adapter tests.

    use serde_json::{Value, json};

    use super::Resource;

    pub fn document(resource: Resource) -> Value {
        match resource {
            Resource::SummaryStats => json!({
                "total_bouts": 123456,
                "total_basho": 150,
                "total_rikishi": 2345,
                "year_range": "2000-2024",
                "makuuchi_bouts": 33000,
                "most_common_kimarite": "yorikiri",
                "most_wins_rikishi": "白鵬"
            }),
            Resource::KimariteRanking => json!({
                "makuuchi": [
                    {"kimarite": "yorikiri", "count": 5000, "pct": 35.0},
                    {"kimarite": "oshidashi", "count": 3000, "pct": 21.0},
                    {"kimarite": "hatakikomi", "count": 900, "pct": 6.3},
                    {"kimarite": "mysterywaza", "count": 100, "pct": 0.7}
                ],
                "all": []
            }),
            Resource::KimariteTrend => json!({
                "years": [2000, 2001, 2002],
                "techniques": {
                    "yorikiri": [33.0, 31.5, 30.1],
                    "oshidashi": [18.0, 19.0, 20.4],
                    "hatakikomi": [6.0, 6.1, 6.0]
                }
            }),
            Resource::RikishiWins => json!([
                {"rank": 1, "shikona": "白鵬", "wins": 1093, "losses": 199, "win_rate": 84.6, "basho_count": 86},
                {"rank": 2, "shikona": "魁皇", "wins": 879, "losses": 581, "win_rate": 60.2, "basho_count": 98},
                {"rank": 3, "shikona": "日馬富士", "wins": 712, "losses": 373, "win_rate": 65.6, "basho_count": 73},
                {"rank": 4, "shikona": "新星", "wins": 30, "losses": 5, "win_rate": 85.7, "basho_count": 3}
            ]),
            Resource::YokozunaDominance => json!({
                "rikishi": [
                    {"shikona": "A", "rid": 1, "data": [
                        {"basho": "202303", "wins": 12, "losses": 3, "win_rate": 80.0},
                        {"basho": "202301", "wins": 13, "losses": 2, "win_rate": 86.7}
                    ]},
                    {"shikona": "B", "rid": 2, "data": [
                        {"basho": "202303", "wins": 10, "losses": 5, "win_rate": 66.7}
                    ]}
                ]
            }),
            Resource::UpsetIndex => json!({
                "basho_list": ["202301", "202303"],
                "upset_rate": [38.5, 41.2],
                "avg_upset_rate": 39.85
            }),
            Resource::NanahachiAnalysis => json!({
                "overall": {"total_bouts": 400, "wins": 300, "win_rate": 75.0, "expected_rate": 50.0},
                "by_opponent_record": [
                    {"opp_record": "8-6", "bouts": 120, "wins": 96, "win_rate": 80.0},
                    {"opp_record": "9-5", "bouts": 60, "wins": 45, "win_rate": 75.0},
                    {"opp_record": "7-7", "bouts": 40, "wins": 20, "win_rate": 50.0},
                    {"opp_record": "6-8", "bouts": 30, "wins": 12, "win_rate": 40.0},
                    {"opp_record": "11-3", "bouts": 4, "wins": 4, "win_rate": 100.0}
                ],
                "by_year": [
                    {"year": 2010, "bouts": 20, "wins": 15, "win_rate": 75.0},
                    {"year": 2011, "bouts": 18, "wins": 10, "win_rate": 55.6}
                ],
                "both_77": {"total_bouts": 40, "east_wins": 21, "note": "n/a"}
            }),
            Resource::StarTradingAnalysis => json!({
                "yearly_trend": [
                    {"year": 2009, "nanahachi_vs_kachikoshi_bouts": 20, "nanahachi_vs_kachikoshi_rate": 70.0, "baseline_bouts": 500, "baseline_rate": 42.0},
                    {"year": 2010, "nanahachi_vs_kachikoshi_bouts": 20, "nanahachi_vs_kachikoshi_rate": 65.0, "baseline_bouts": 500, "baseline_rate": 44.4},
                    {"year": 2011, "nanahachi_vs_kachikoshi_bouts": 10, "nanahachi_vs_kachikoshi_rate": 50.0, "baseline_bouts": 400, "baseline_rate": 43.0},
                    {"year": 2016, "nanahachi_vs_kachikoshi_bouts": 15, "nanahachi_vs_kachikoshi_rate": 46.7, "baseline_bouts": 480, "baseline_rate": 45.6},
                    {"year": 2017, "nanahachi_vs_kachikoshi_bouts": 0, "nanahachi_vs_kachikoshi_rate": null, "baseline_bouts": 480, "baseline_rate": 41.2}
                ],
                "record_matchup_matrix": [
                    {"wrestler_record": "7-7", "opponent_record": "8-6", "bouts": 9, "wrestler_wins": 8, "win_rate": 88.9},
                    {"wrestler_record": "7-7", "opponent_record": "9-5", "bouts": 50, "wrestler_wins": 40, "win_rate": 80.0},
                    {"wrestler_record": "8-6", "opponent_record": "7-7", "bouts": 50, "wrestler_wins": 10, "win_rate": 20.0},
                    {"wrestler_record": "7-7", "opponent_record": "7-7", "bouts": 30, "wrestler_wins": 15, "win_rate": 50.0}
                ],
                "reciprocity": {
                    "total_favor_pairs": 200,
                    "mutual_pairs": 12,
                    "mutual_rate": 6.0,
                    "top_pairs": [
                        {"rikishi_a": "甲", "rikishi_b": "乙", "a_favors_b": 3, "b_favors_a": 1, "total": 4}
                    ]
                }
            }),
            Resource::WinningStreaks => json!([
                {"rank": 1, "shikona": "白鵬", "streak": 63, "start_basho": "201003", "start_day": 1, "end_basho": "201011", "end_day": 2},
                {"rank": 2, "shikona": "照ノ富士", "streak": 21, "start_basho": "202307", "start_day": 4, "end_basho": "", "end_day": 0}
            ]),
        }
    }

    pub fn bundle() -> super::DataBundle {
        let get = |r: Resource| document(r);
        super::DataBundle {
            summary: serde_json::from_value(get(Resource::SummaryStats)).unwrap(),
            kimarite: serde_json::from_value(get(Resource::KimariteRanking)).unwrap(),
            trend: serde_json::from_value(get(Resource::KimariteTrend)).unwrap(),
            rikishi: serde_json::from_value(get(Resource::RikishiWins)).unwrap(),
            yokozuna: serde_json::from_value(get(Resource::YokozunaDominance)).unwrap(),
            upset: serde_json::from_value(get(Resource::UpsetIndex)).unwrap(),
            nanahachi: serde_json::from_value(get(Resource::NanahachiAnalysis)).unwrap(),
            star_trade: serde_json::from_value(get(Resource::StarTradingAnalysis)).unwrap(),
            streaks: serde_json::from_value(get(Resource::WinningStreaks)).unwrap(),
        }
    }

    /// Write every document into `dir`.
    pub fn write_all(dir: &std::path::Path) {
        for resource in Resource::ALL {
            let text = serde_json::to_string_pretty(&document(resource)).unwrap();
            std::fs::write(dir.join(resource.file_name()), text).unwrap();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_a_complete_directory() {
        let dir = tempfile::tempdir().unwrap();
        fixtures::write_all(dir.path());

        let loader = DataLoader::new(DataSource::Dir(dir.path().to_path_buf()));
        let bundle = loader.load().unwrap();
        assert_eq!(bundle, fixtures::bundle());
    }

    #[test]
    fn one_missing_document_fails_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        fixtures::write_all(dir.path());
        std::fs::remove_file(dir.path().join("upset_index.json")).unwrap();

        let err = DataLoader::new(DataSource::Dir(dir.path().to_path_buf()))
            .load()
            .unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert!(err.to_string().contains("upset_index.json"));
    }

    #[test]
    fn non_json_body_fails_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        fixtures::write_all(dir.path());
        std::fs::write(dir.path().join("kimarite_trend.json"), "<html>404</html>").unwrap();

        let err = DataLoader::new(DataSource::Dir(dir.path().to_path_buf()))
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn schema_mismatch_names_the_document() {
        let dir = tempfile::tempdir().unwrap();
        fixtures::write_all(dir.path());
        std::fs::write(dir.path().join("summary_stats.json"), r#"{"total_bouts": 1}"#).unwrap();

        let err = DataLoader::new(DataSource::Dir(dir.path().to_path_buf()))
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("summary_stats.json does not match"));
    }

    #[test]
    fn decoded_documents_line_up_with_their_files() {
        let dir = tempfile::tempdir().unwrap();
        fixtures::write_all(dir.path());
        std::fs::write(dir.path().join("winning_streaks.json"), r#"{"streaks": 1}"#).unwrap();

        let err = DataLoader::new(DataSource::Dir(dir.path().to_path_buf()))
            .load()
            .unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
        assert!(err.to_string().contains("winning_streaks.json does not match"), "{err}");
    }
}
