//! Gitリポジトリの週次アクティビティ分析ツール
//!
//! このクレートは、Gitリポジトリのコミット履歴を月曜始まりの週次
//! 時系列へ集計し、各時系列を固定の統計的・構造的特徴ベクトルへ
//! 要約するための機能を提供します。得られた特徴ベクトルは、
//! プロジェクトの健全性の分類やアクティビティの回帰予測などの
//! 下流タスクの入力として利用できます。
//!
//! # 主な機能
//!
//! - コミット履歴の8列CSVログへのエクスポートと読み込み
//! - 週次時系列の構築（コミット数、統合数、マージ数、
//!   ユニーク作成者数、ユニーク統合者数）
//! - ピーク検出を含む特徴ベクトルの計算
//! - 週次レポート・特徴レポートのCSV/JSON書き出し
//!
//! # 使用例
//!
//! ```no_run
//! use activity_extractor::{aggregate, extract_all_measures, read_log_file};
//!
//! let records = read_log_file("path/to/log.csv").unwrap();
//! let series = aggregate(&records).unwrap();
//! let measures = extract_all_measures(&series).unwrap();
//!
//! let commits = &measures["commits"];
//! println!("{} weeks, {} commits", commits.duration, commits.sum_y);
//! ```

pub mod extractor;

pub use extractor::{
    aggregate, extract_all_measures, feature_vector, find_quantile, monday_floor, read_log,
    read_log_file, source_basename, week_index, write_feature_report_csv,
    write_feature_report_json, write_log_file, write_weekly_report, CommitRecord, ExtractorError,
    FeatureVector, GitRepository, WeekReportRow, WeeklyCalendar, WeeklySeriesSet,
};
