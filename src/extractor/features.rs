//! 特徴ベクトルの計算を担当するモジュール
//!
//! このモジュールは、1本の週次時系列から43個のスカラー特徴量を
//! 計算します。特徴量は2つのグループに分かれます：
//!
//! - 全体統計：合計、平均、最大値とその位置、標準偏差、四分位数
//! - ピーク構造統計：上昇・下降トレンドの走査で検出した山（極大）と
//!   谷（極小）に関する、連続長・勾配・偏差・振幅・ピーク間隔の統計
//!
//! 走査は隣接する2値の比較だけで進む単純な状態機械で、検出対象が
//! 存在しない系列（平坦・単調・長さ1）では、対応する統計はすべて
//! 0になります。

use super::error::ExtractorError;
use serde::Serialize;
use serde_json::Value;

/// 1本の時系列を要約する特徴ベクトル
///
/// 構築後は変更されない読み取り専用のスナップショットです。
/// `std_y`は系列長が2以下のとき未定義（`None`）で、それ以外の
/// フィールドは対象が存在しない場合0になります。
#[derive(Debug, Clone, Serialize)]
pub struct FeatureVector {
    pub duration: u64,
    pub max_y: u64,
    pub max_y_pos: u64,
    pub mean_y: f64,
    pub sum_y: u64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub std_y: Option<f64>,
    pub peak_down: u64,
    pub peak_none: u64,
    pub peak_up: u64,
    pub min_tbp_up: u64,
    pub avg_tbp_up: f64,
    pub max_tbp_up: u64,
    pub min_tbp_down: u64,
    pub avg_tbp_down: f64,
    pub max_tbp_down: u64,
    pub min_amplitude: f64,
    pub avg_amplitude: f64,
    pub max_amplitude: f64,
    pub min_ppd: f64,
    pub avg_ppd: f64,
    pub max_ppd: f64,
    pub min_npd: f64,
    pub avg_npd: f64,
    pub max_npd: f64,
    pub min_ps: u64,
    pub mean_ps: f64,
    pub max_ps: u64,
    pub sum_ps: u64,
    pub min_ns: u64,
    pub mean_ns: f64,
    pub max_ns: u64,
    pub sum_ns: u64,
    pub min_pg: i64,
    pub avg_pg: f64,
    pub max_pg: i64,
    pub min_ng: i64,
    pub avg_ng: f64,
    pub max_ng: i64,
    pub pg_count: u64,
    pub ng_count: u64,
}

impl FeatureVector {
    /// フィールド名の昇順で（名前, 値）の列を返します
    ///
    /// CSVレポートのヘッダーと値を同じ並びで出力するために使います。
    pub fn sorted_fields(&self) -> Result<Vec<(String, Value)>, ExtractorError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map.into_iter().collect()),
            _ => Err(ExtractorError::InvalidParam(
                "feature vector did not serialize to an object".to_string(),
            )),
        }
    }
}

/// 時系列から特徴ベクトルを計算します
///
/// # 引数
///
/// - `series`: 週次時系列（1要素以上）
///
/// # 戻り値
///
/// 入力だけから決まる`FeatureVector`を返します（副作用なし）
///
/// # エラー
///
/// 系列が空の場合にエラーを返します
pub fn feature_vector(series: &[u64]) -> Result<FeatureVector, ExtractorError> {
    if series.is_empty() {
        return Err(ExtractorError::InvalidParam(
            "time series is empty".to_string(),
        ));
    }

    let duration = series.len() as u64;

    let mut sum_y: u64 = 0;
    let mut max_y: u64 = 0;
    let mut max_y_pos: u64 = 0;
    for (index, &value) in series.iter().enumerate() {
        // 同値なら最初の出現位置を保持する（1始まり）
        if value > max_y {
            max_y = value;
            max_y_pos = index as u64 + 1;
        }
        sum_y += value;
    }

    let mean_y = sum_y as f64 / duration as f64;
    let std_y = if series.len() > 2 {
        Some(sample_std(series, mean_y))
    } else {
        None
    };

    let q25 = find_quantile(series, 0.25)?;
    let q50 = find_quantile(series, 0.5)?;
    let q75 = find_quantile(series, 0.75)?;

    let peaks = scan_peaks(series, mean_y, max_y);

    let (min_ps, mean_ps, max_ps) = spread_u64(&peaks.up_runs);
    let (min_ns, mean_ns, max_ns) = spread_u64(&peaks.down_runs);
    let (min_tbp_up, avg_tbp_up, max_tbp_up) = spread_u64(&peaks.tbp_up);
    let (min_tbp_down, avg_tbp_down, max_tbp_down) = spread_u64(&peaks.tbp_down);
    let (min_pg, avg_pg, max_pg) = spread_i64(&peaks.positive_gradients);
    let (min_ng, avg_ng, max_ng) = spread_i64(&peaks.negative_gradients);
    let (min_ppd, avg_ppd, max_ppd) = spread_f64(&peaks.positive_deviations);
    let (min_npd, avg_npd, max_npd) = spread_f64(&peaks.negative_deviations);
    let (min_amplitude, avg_amplitude, max_amplitude) = spread_f64(&peaks.amplitudes);

    Ok(FeatureVector {
        duration,
        max_y,
        max_y_pos,
        mean_y,
        sum_y,
        q25,
        q50,
        q75,
        std_y,
        peak_down: peaks.peak_down,
        peak_none: duration - peaks.peak_up - peaks.peak_down,
        peak_up: peaks.peak_up,
        min_tbp_up,
        avg_tbp_up,
        max_tbp_up,
        min_tbp_down,
        avg_tbp_down,
        max_tbp_down,
        min_amplitude,
        avg_amplitude,
        max_amplitude,
        min_ppd,
        avg_ppd,
        max_ppd,
        min_npd,
        avg_npd,
        max_npd,
        min_ps,
        mean_ps,
        max_ps,
        sum_ps: peaks.up_runs.iter().sum(),
        min_ns,
        mean_ns,
        max_ns,
        sum_ns: peaks.down_runs.iter().sum(),
        min_pg,
        avg_pg,
        max_pg,
        min_ng,
        avg_ng,
        max_ng,
        pg_count: peaks.positive_gradients.len() as u64,
        ng_count: peaks.negative_gradients.len() as u64,
    })
}

/// 系列の分位数を中点補間で求めます
///
/// 系列を昇順に並べたコピーに対して、0始まりの添字
/// `lower = floor(q*(n-1))`、`upper = ceil(q*(n-1))`の2値の
/// 中点を返します。
///
/// # エラー
///
/// `q`が[0, 1]の範囲外、または系列が空の場合にエラーを返します
pub fn find_quantile(series: &[u64], quantile: f64) -> Result<f64, ExtractorError> {
    if !(0.0..=1.0).contains(&quantile) {
        return Err(ExtractorError::InvalidParam(format!(
            "quantile {quantile} is outside [0, 1]"
        )));
    }
    if series.is_empty() {
        return Err(ExtractorError::InvalidParam(
            "cannot take a quantile of an empty series".to_string(),
        ));
    }

    let mut sorted = series.to_vec();
    sorted.sort_unstable();

    let length = (sorted.len() - 1) as f64;
    let lower = (length * quantile).floor() as usize;
    let upper = (length * quantile).ceil() as usize;

    Ok((sorted[lower] as f64 + sorted[upper] as f64) / 2.0)
}

/// 走査中のトレンド状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trend {
    Neutral,
    Up,
    Down,
}

/// ピーク走査の結果をためるアキュムレータ
///
/// 走査関数のローカル状態としてのみ使い、結果として返した後は
/// 変更しません。
#[derive(Debug, Default)]
struct PeakAccumulator {
    peak_up: u64,
    peak_down: u64,
    /// 山で閉じた上昇連続長（PS）
    up_runs: Vec<u64>,
    /// 谷で閉じた下降連続長（NS）
    down_runs: Vec<u64>,
    /// 上昇ステップごとの勾配（PG）
    positive_gradients: Vec<i64>,
    /// 下降ステップごとの勾配（NG）
    negative_gradients: Vec<i64>,
    /// 山の値と全体平均の差（PPD）
    positive_deviations: Vec<f64>,
    /// 谷の値と全体平均の差（NPD）
    negative_deviations: Vec<f64>,
    /// 直前の谷から山までの振れ幅を最大値で正規化した値
    amplitudes: Vec<f64>,
    /// 連続する山の間隔（TBP-up）
    tbp_up: Vec<u64>,
    /// 連続する谷の間隔（TBP-down）
    tbp_down: Vec<u64>,
}

/// 時系列を左から右へ1回走査してピーク構造を検出します
///
/// 各ステップは前値との比較で上昇・下降・同値に分類されます。
/// 下降中に上昇へ転じた位置の前値が谷、上昇中に下降へ転じた
/// 位置の前値が山です。同値のステップはトレンドも連続長も
/// 変化させません。走査終了時に開いたままの連続長は、終了時の
/// トレンドが上昇ならPSへ、それ以外はNSへ加えます。
fn scan_peaks(series: &[u64], mean: f64, max_y: u64) -> PeakAccumulator {
    let mut acc = PeakAccumulator::default();
    if series.len() <= 1 {
        return acc;
    }

    let mut trend = Trend::Neutral;
    let mut run_length: u64 = 0;
    let mut last_peak_up: usize = 0;
    let mut last_peak_down: usize = 0;
    let mut last_down_peak_value = series[0];

    for index in 1..series.len() {
        let previous = series[index - 1];
        let current = series[index];

        if previous < current {
            acc.positive_gradients.push(current as i64 - previous as i64);

            if trend == Trend::Down {
                // 谷が前の位置で閉じる
                acc.peak_down += 1;
                acc.down_runs.push(run_length);
                acc.negative_deviations.push(previous as f64 - mean);
                acc.tbp_down.push((index - last_peak_down) as u64);
                last_peak_down = index;
                last_down_peak_value = previous;
                run_length = 1;
            } else {
                run_length += 1;
            }
            trend = Trend::Up;
        } else if previous > current {
            acc.negative_gradients.push(current as i64 - previous as i64);

            if trend == Trend::Up {
                // 山が前の位置で閉じる
                acc.peak_up += 1;
                acc.up_runs.push(run_length);
                acc.positive_deviations.push(previous as f64 - mean);
                acc.tbp_up.push((index - last_peak_up) as u64);
                last_peak_up = index;
                acc.amplitudes.push(if max_y > 0 {
                    ((previous as f64 - last_down_peak_value as f64) / max_y as f64).abs()
                } else {
                    0.0
                });
                run_length = 1;
            } else {
                run_length += 1;
            }
            trend = Trend::Down;
        }
        // previous == current はどちらのトレンドも延長しない
    }

    match trend {
        Trend::Up => acc.up_runs.push(run_length),
        _ => acc.down_runs.push(run_length),
    }

    acc
}

fn sample_std(series: &[u64], mean: f64) -> f64 {
    let sum_squares: f64 = series
        .iter()
        .map(|&value| {
            let deviation = value as f64 - mean;
            deviation * deviation
        })
        .sum();
    (sum_squares / (series.len() as f64 - 1.0)).sqrt()
}

fn spread_u64(values: &[u64]) -> (u64, f64, u64) {
    if values.is_empty() {
        return (0, 0.0, 0);
    }
    let min = values.iter().copied().min().unwrap_or(0);
    let max = values.iter().copied().max().unwrap_or(0);
    let mean = values.iter().sum::<u64>() as f64 / values.len() as f64;
    (min, mean, max)
}

fn spread_i64(values: &[i64]) -> (i64, f64, i64) {
    if values.is_empty() {
        return (0, 0.0, 0);
    }
    let min = values.iter().copied().min().unwrap_or(0);
    let max = values.iter().copied().max().unwrap_or(0);
    let mean = values.iter().sum::<i64>() as f64 / values.len() as f64;
    (min, mean, max)
}

fn spread_f64(values: &[f64]) -> (f64, f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    (min, mean, max)
}
