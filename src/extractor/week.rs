//! 週境界の計算を担当するモジュール
//!
//! このモジュールは、Unixタイムスタンプを月曜0時（UTC）起点の
//! 週カレンダーへ写像するための基本演算を提供します。
//! すべての計算はUTCに固定されており、実行環境のタイムゾーンに
//! 依存しません。

use super::error::ExtractorError;
use chrono::{DateTime, Datelike, Days, NaiveTime};

/// 1週間の秒数
pub const SECONDS_PER_WEEK: i64 = 604_800;

/// 指定されたタイムスタンプを含む週の月曜0時0分0秒（UTC）の
/// タイムスタンプを返します
///
/// # 引数
///
/// - `timestamp`: Unixエポック秒
///
/// # 戻り値
///
/// `timestamp`と同じ週（月曜始まり）の月曜0時のUnixエポック秒
///
/// # エラー
///
/// タイムスタンプが日時として表現できない場合にエラーを返します
pub fn monday_floor(timestamp: i64) -> Result<i64, ExtractorError> {
    let datetime = DateTime::from_timestamp(timestamp, 0).ok_or_else(|| {
        ExtractorError::InvalidParam(format!("timestamp {timestamp} is out of range"))
    })?;

    let date = datetime.date_naive();
    let offset = u64::from(date.weekday().num_days_from_monday());
    let monday = date.checked_sub_days(Days::new(offset)).ok_or_else(|| {
        ExtractorError::InvalidParam(format!("timestamp {timestamp} is out of range"))
    })?;

    Ok(monday.and_time(NaiveTime::MIN).and_utc().timestamp())
}

/// 基準時刻から数えた週番号を返します
///
/// # 引数
///
/// - `base`: カレンダーの基準となるタイムスタンプ（週の起点）
/// - `t`: 週番号を求めるタイムスタンプ
///
/// # 戻り値
///
/// `floor((t - base) / 604800)`。`t`が`base`から7日未満であれば0
///
/// # エラー
///
/// `base`が`t`より後の場合にエラーを返します
pub fn week_index(base: i64, t: i64) -> Result<usize, ExtractorError> {
    if base > t {
        return Err(ExtractorError::InvalidParam(format!(
            "base timestamp {base} is later than target timestamp {t}"
        )));
    }

    Ok(((t - base) / SECONDS_PER_WEEK) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monday_floor_from_tuesday() {
        // Tue, 16 Apr 2019 -> Mon, 15 Apr 2019 00:00:00 UTC
        assert_eq!(monday_floor(1555423748).unwrap(), 1555286400);
    }

    #[test]
    fn test_monday_floor_from_monday_noon() {
        // Mon, 29 Feb 2016 12:00:00 -> Mon, 29 Feb 2016 00:00:00 UTC
        assert_eq!(monday_floor(1456747200).unwrap(), 1456704000);
    }

    #[test]
    fn test_monday_floor_from_sunday_last_second() {
        // Sun, 28 Apr 2019 23:59:59 -> Mon, 22 Apr 2019 00:00:00 UTC
        assert_eq!(monday_floor(1556495999).unwrap(), 1555891200);
    }

    #[test]
    fn test_monday_floor_is_idempotent() {
        let floored = monday_floor(1555423748).unwrap();
        assert_eq!(monday_floor(floored).unwrap(), floored);
    }

    #[test]
    fn test_week_index_over_long_span() {
        assert_eq!(week_index(1456704000, 1555891200).unwrap(), 164);
    }

    #[test]
    fn test_week_index_adjacent_weeks() {
        assert_eq!(week_index(1555286400, 1555891200).unwrap(), 1);
    }

    #[test]
    fn test_week_index_within_first_week() {
        assert_eq!(week_index(1555200000, 1555200001).unwrap(), 0);
        assert_eq!(week_index(1555200000, 1555200000).unwrap(), 0);
    }

    #[test]
    fn test_week_index_rejects_reversed_arguments() {
        assert!(matches!(
            week_index(2, 1),
            Err(ExtractorError::InvalidParam(_))
        ));
    }
}
