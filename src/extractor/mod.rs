//! 週次アクティビティ分析の中核となるモジュール
//!
//! このモジュールは、コミット履歴から特徴ベクトルを導出するために
//! 必要な主要なコンポーネントを提供します。
//! 分析プロセスは以下の流れで行われます：
//!
//! 1. コミットレコードの取得（リポジトリまたはエクスポート済みログ）
//! 2. 月曜始まりの週カレンダーの構築と5本の週次時系列への集計
//! 3. 各時系列からの特徴ベクトルの計算
//! 4. 週次レポート・特徴レポートの書き出し
//!
//! # 主要なコンポーネント
//!
//! - `GitRepository`: Gitリポジトリからのコミット履歴のエクスポート
//! - `aggregate`: コミットレコードから週次時系列への集計
//! - `feature_vector`: 1本の時系列からの特徴ベクトルの計算
//! - `extract_all_measures`: 5本すべての時系列の一括処理

mod error;
mod features;
mod git;
mod log;
mod report;
mod series;
mod week;

pub use error::ExtractorError;
pub use features::{feature_vector, find_quantile, FeatureVector};
pub use git::GitRepository;
pub use log::{read_log, read_log_file, write_log_file, CommitRecord};
pub use report::{write_feature_report_csv, write_feature_report_json, write_weekly_report};
pub use series::{aggregate, source_basename, WeekReportRow, WeeklyCalendar, WeeklySeriesSet};
pub use week::{monday_floor, week_index, SECONDS_PER_WEEK};

use indexmap::IndexMap;

/// 集計済みの5本の時系列すべてから特徴ベクトルを計算します
///
/// # 戻り値
///
/// 系列名（`authors`、`commits`、`integrations`、`integrators`、
/// `merges`）をキーとし、名前の昇順で並んだマップを返します。
/// レポートの行順はこの並びをそのまま使います。
pub fn extract_all_measures(
    series_set: &WeeklySeriesSet,
) -> Result<IndexMap<&'static str, FeatureVector>, ExtractorError> {
    let mut measures = IndexMap::new();
    measures.insert("authors", feature_vector(&series_set.authors)?);
    measures.insert("commits", feature_vector(&series_set.commits)?);
    measures.insert("integrations", feature_vector(&series_set.integrations)?);
    measures.insert("integrators", feature_vector(&series_set.integrators)?);
    measures.insert("merges", feature_vector(&series_set.merges)?);
    Ok(measures)
}
