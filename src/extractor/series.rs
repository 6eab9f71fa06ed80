//! 週次時系列の集計を担当するモジュール
//!
//! このモジュールは、コミットレコードの集合から月曜始まりの週
//! カレンダーを構築し、5本の週次時系列を生成します：
//!
//! - `commits`: 週ごとのコミット数（作成者カレンダー）
//! - `authors`: 週ごとのユニーク作成者数（作成者カレンダー）
//! - `integrations`: 週ごとの統合数（統合者カレンダー）
//! - `integrators`: 週ごとのユニーク統合者数（統合者カレンダー）
//! - `merges`: 週ごとのマージ数（統合者カレンダー）
//!
//! 作成日時と統合日時は一致するとは限らないため、2つのカレンダーは
//! 起点も長さも独立に計算されます。

use super::error::ExtractorError;
use super::log::CommitRecord;
use super::week::{monday_floor, week_index, SECONDS_PER_WEEK};
use chrono::DateTime;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

/// 月曜0時（UTC）を起点とする週カレンダー
///
/// # フィールド
///
/// - `anchor`: 起点となる月曜0時のタイムスタンプ
/// - `total_weeks`: カレンダーが覆う週数（両端を含む）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklyCalendar {
    pub anchor: i64,
    pub total_weeks: usize,
}

impl WeeklyCalendar {
    /// 最古と最新のタイムスタンプを覆うカレンダーを構築します
    fn spanning(earliest: i64, latest: i64) -> Result<Self, ExtractorError> {
        let anchor = monday_floor(earliest)?;
        let total_weeks = week_index(anchor, monday_floor(latest)?)? + 1;
        Ok(Self {
            anchor,
            total_weeks,
        })
    }

    /// タイムスタンプをこのカレンダー上の週番号へ変換します
    pub fn index_of(&self, timestamp: i64) -> Result<usize, ExtractorError> {
        week_index(self.anchor, timestamp)
    }

    /// 指定された週の終端ラベル（その週の日曜23:59:59 UTC）を
    /// `YYYY-MM-DD`形式で返します
    pub fn week_end_date(&self, index: usize) -> Result<String, ExtractorError> {
        let end = self.anchor + (index as i64 + 1) * SECONDS_PER_WEEK - 1;
        let datetime = DateTime::from_timestamp(end, 0).ok_or_else(|| {
            ExtractorError::InvalidParam(format!("timestamp {end} is out of range"))
        })?;
        Ok(datetime.format("%Y-%m-%d").to_string())
    }
}

/// 1つのコミットログから集計された5本の週次時系列
#[derive(Debug, Clone)]
pub struct WeeklySeriesSet {
    pub author_calendar: WeeklyCalendar,
    pub integrator_calendar: WeeklyCalendar,
    pub commits: Vec<u64>,
    pub authors: Vec<u64>,
    pub integrations: Vec<u64>,
    pub integrators: Vec<u64>,
    pub merges: Vec<u64>,
}

/// 週次レポートの1行
#[derive(Debug, Clone, Serialize)]
pub struct WeekReportRow {
    pub filename: String,
    pub date: String,
    pub merges: u64,
    pub commits: u64,
    pub integrations: u64,
    #[serde(rename = "commiters")]
    pub committers: u64,
    pub integrators: u64,
}

/// コミットレコードを週次時系列へ集計します
///
/// # 引数
///
/// - `records`: 集計対象のコミットレコード（1件以上）
///
/// # 戻り値
///
/// 2つのカレンダーと5本の時系列を持つ`WeeklySeriesSet`を返します
///
/// # エラー
///
/// レコードが空の場合にエラーを返します
pub fn aggregate(records: &[CommitRecord]) -> Result<WeeklySeriesSet, ExtractorError> {
    if records.is_empty() {
        return Err(ExtractorError::InvalidParam(
            "commit log contains no records".to_string(),
        ));
    }

    // 1回目の走査：両カレンダーの範囲を求める
    let mut earliest_author = i64::MAX;
    let mut latest_author = i64::MIN;
    let mut earliest_integration = i64::MAX;
    let mut latest_integration = i64::MIN;

    for record in records {
        earliest_author = earliest_author.min(record.author_date);
        latest_author = latest_author.max(record.author_date);
        earliest_integration = earliest_integration.min(record.integrator_date);
        latest_integration = latest_integration.max(record.integrator_date);
    }

    let author_calendar = WeeklyCalendar::spanning(earliest_author, latest_author)?;
    let integrator_calendar = WeeklyCalendar::spanning(earliest_integration, latest_integration)?;

    let mut commits = zeroed_series(author_calendar.total_weeks);
    let mut authors = zeroed_series(author_calendar.total_weeks);
    let mut author_sets = empty_week_sets(author_calendar.total_weeks);

    let mut integrations = zeroed_series(integrator_calendar.total_weeks);
    let mut integrators = zeroed_series(integrator_calendar.total_weeks);
    let mut integrator_sets = empty_week_sets(integrator_calendar.total_weeks);

    let mut merges = zeroed_series(integrator_calendar.total_weeks);

    // 2回目の走査：各レコードを両カレンダー上の週へ振り分ける
    for record in records {
        let author_week = author_calendar.index_of(record.author_date)?;
        let integration_week = integrator_calendar.index_of(record.integrator_date)?;

        commits[author_week] += 1;
        if author_sets[author_week].insert(record.author_email.clone()) {
            authors[author_week] += 1;
        }

        integrations[integration_week] += 1;
        if integrator_sets[integration_week].insert(record.integrator_email.clone()) {
            integrators[integration_week] += 1;
        }

        if record.is_merge() {
            merges[integration_week] += 1;
        }
    }

    Ok(WeeklySeriesSet {
        author_calendar,
        integrator_calendar,
        commits,
        authors,
        integrations,
        integrators,
        merges,
    })
}

impl WeeklySeriesSet {
    /// 週次レポートの行集合を生成します
    ///
    /// 行は統合者カレンダーの週ごとに1行で、日付ラベルも行が属する
    /// 統合者カレンダーから算出します。作成者カレンダーが統合者
    /// カレンダーより短い週では`commits`/`commiters`は0になります。
    pub fn report_rows(&self, filename: &str) -> Result<Vec<WeekReportRow>, ExtractorError> {
        let mut rows = Vec::with_capacity(self.integrator_calendar.total_weeks);

        for week in 0..self.integrator_calendar.total_weeks {
            rows.push(WeekReportRow {
                filename: filename.to_string(),
                date: self.integrator_calendar.week_end_date(week)?,
                merges: self.merges[week],
                commits: self.commits.get(week).copied().unwrap_or(0),
                integrations: self.integrations[week],
                committers: self.authors.get(week).copied().unwrap_or(0),
                integrators: self.integrators[week],
            });
        }

        Ok(rows)
    }
}

/// レポートの`filename`列に使うファイル名部分を返します
pub fn source_basename(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// 0で初期化された週次系列を生成します
fn zeroed_series(total_weeks: usize) -> Vec<u64> {
    vec![0; total_weeks]
}

/// 週ごとに独立した空の開発者集合を生成します
fn empty_week_sets(total_weeks: usize) -> Vec<HashSet<String>> {
    (0..total_weeks).map(|_| HashSet::new()).collect()
}
