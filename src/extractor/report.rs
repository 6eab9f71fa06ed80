//! レポートの書き出しを担当するモジュール
//!
//! 週次レポートと特徴レポートをCSVとして、また特徴レポートを
//! JSONとして書き出します。特徴レポートのCSVは、ヘッダーと値を
//! 同じフィールド名昇順で出力します。

use super::error::ExtractorError;
use super::features::FeatureVector;
use super::series::WeekReportRow;
use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// 週次レポートをCSVファイルへ書き出します
///
/// ヘッダーは`filename,date,merges,commits,integrations,commiters,integrators`です。
pub fn write_weekly_report(
    path: impl AsRef<Path>,
    rows: &[WeekReportRow],
) -> Result<(), ExtractorError> {
    let mut writer = csv::Writer::from_path(path)?;

    for row in rows {
        writer.serialize(row)?;
    }

    writer.flush()?;
    Ok(())
}

/// 特徴レポートをCSVファイルへ書き出します
///
/// ヘッダーは`measure`に続けて全特徴量名を昇順で並べ、系列名ごとに
/// 1行を同じ並びで出力します。未定義の値（系列長2以下の`std_y`）は
/// 空セルになります。
pub fn write_feature_report_csv(
    path: impl AsRef<Path>,
    measures: &IndexMap<&'static str, FeatureVector>,
) -> Result<(), ExtractorError> {
    let mut writer = csv::Writer::from_path(path)?;

    if let Some((_, first)) = measures.first() {
        let mut header = vec!["measure".to_string()];
        header.extend(first.sorted_fields()?.into_iter().map(|(name, _)| name));
        writer.write_record(&header)?;
    }

    for (measure, vector) in measures {
        let mut row = vec![measure.to_string()];
        for (_, value) in vector.sorted_fields()? {
            row.push(render_value(&value));
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// 特徴レポートをJSONファイルへ書き出します
pub fn write_feature_report_json(
    path: impl AsRef<Path>,
    measures: &IndexMap<&'static str, FeatureVector>,
) -> Result<(), ExtractorError> {
    let json = serde_json::to_string_pretty(measures)?;
    fs::write(path, json)?;
    Ok(())
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::features::feature_vector;

    #[test]
    fn test_feature_report_header_and_rows_align() {
        let mut measures = IndexMap::new();
        measures.insert("commits", feature_vector(&[2, 2, 0, 1]).unwrap());
        measures.insert("merges", feature_vector(&[0, 0, 1, 0, 0]).unwrap());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.csv");
        write_feature_report_csv(&path, &measures).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);

        let header: Vec<&str> = lines[0].split(',').collect();
        assert_eq!(header[0], "measure");
        assert_eq!(header.len(), 44);
        // ヘッダーは昇順
        let mut sorted = header[1..].to_vec();
        sorted.sort_unstable();
        assert_eq!(header[1..].to_vec(), sorted);

        let row: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(row[0], "commits");
        assert_eq!(row.len(), 44);

        // duration列でヘッダーと値の対応を確認
        let duration_column = header.iter().position(|name| *name == "duration").unwrap();
        assert_eq!(row[duration_column], "4");
        let row2: Vec<&str> = lines[2].split(',').collect();
        assert_eq!(row2[duration_column], "5");
    }

    #[test]
    fn test_undefined_std_renders_as_empty_cell() {
        let mut measures = IndexMap::new();
        measures.insert("commits", feature_vector(&[1, 2]).unwrap());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.csv");
        write_feature_report_csv(&path, &measures).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        let header: Vec<&str> = lines[0].split(',').collect();
        let row: Vec<&str> = lines[1].split(',').collect();

        let std_column = header.iter().position(|name| *name == "std_y").unwrap();
        assert_eq!(row[std_column], "");
    }
}
