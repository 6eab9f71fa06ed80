//! コミットログの読み書きを担当するモジュール
//!
//! このモジュールは、`git log`形式でエクスポートされた8列CSVの
//! コミットログを`CommitRecord`へ解析する機能と、同じ形式で
//! 書き出す機能を提供します。
//!
//! 列の並びは以下の通りです：
//!
//! 1. コミットハッシュ
//! 2. 親コミットハッシュ（空白区切り、0個以上）
//! 3. 作成者名
//! 4. 作成者メールアドレス
//! 5. 作成日時（Unixエポック秒）
//! 6. 統合者名
//! 7. 統合者メールアドレス
//! 8. 統合日時（Unixエポック秒）

use super::error::ExtractorError;
use csv::{QuoteStyle, ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// コミットログ1行あたりの列数
pub const EXPECTED_COLUMNS: usize = 8;

/// 1つのコミットを表す構造体
///
/// # フィールド
///
/// - `hash`: コミットハッシュ
/// - `parent_hashes`: 空白区切りの親ハッシュ（マージ判定に使用）
/// - `author_name` / `author_email` / `author_date`: 作成者側の情報
/// - `integrator_name` / `integrator_email` / `integrator_date`: 統合者側の情報
#[derive(Debug, Clone)]
pub struct CommitRecord {
    pub hash: String,
    pub parent_hashes: String,
    pub author_name: String,
    pub author_email: String,
    pub author_date: i64,
    pub integrator_name: String,
    pub integrator_email: String,
    pub integrator_date: i64,
}

impl CommitRecord {
    /// 親コミットが2つ以上あるかどうかを判定します
    pub fn is_merge(&self) -> bool {
        self.parent_hashes.contains(' ')
    }
}

/// 任意のリーダーからコミットログを読み込みます
///
/// # エラー
///
/// 列数が8でない行、または日時列が整数でない行がある場合、
/// 1始まりの行番号を含むフォーマットエラーを返します。
/// エラー時に部分的な結果は返しません。
pub fn read_log<R: Read>(reader: R) -> Result<Vec<CommitRecord>, ExtractorError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, row) in csv_reader.records().enumerate() {
        records.push(parse_record(&row?, index + 1)?);
    }

    Ok(records)
}

/// ファイルからコミットログを読み込みます
pub fn read_log_file(path: impl AsRef<Path>) -> Result<Vec<CommitRecord>, ExtractorError> {
    let file = File::open(path)?;
    read_log(BufReader::new(file))
}

/// コミットログをCSVファイルへ書き出します
///
/// `git log --format`の出力に合わせて全フィールドを引用符で囲みます。
pub fn write_log_file(
    path: impl AsRef<Path>,
    records: &[CommitRecord],
) -> Result<(), ExtractorError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_path(path)?;

    for record in records {
        let author_date = record.author_date.to_string();
        let integrator_date = record.integrator_date.to_string();
        writer.write_record([
            record.hash.as_str(),
            record.parent_hashes.as_str(),
            record.author_name.as_str(),
            record.author_email.as_str(),
            author_date.as_str(),
            record.integrator_name.as_str(),
            record.integrator_email.as_str(),
            integrator_date.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn parse_record(row: &StringRecord, line: usize) -> Result<CommitRecord, ExtractorError> {
    if row.len() != EXPECTED_COLUMNS {
        return Err(ExtractorError::FormatError {
            line,
            reason: "incorrect number of columns".to_string(),
        });
    }

    Ok(CommitRecord {
        hash: row[0].to_string(),
        parent_hashes: row[1].to_string(),
        author_name: row[2].to_string(),
        author_email: row[3].to_string(),
        author_date: parse_epoch(&row[4], line, "author date")?,
        integrator_name: row[5].to_string(),
        integrator_email: row[6].to_string(),
        integrator_date: parse_epoch(&row[7], line, "integrator date")?,
    })
}

fn parse_epoch(field: &str, line: usize, column: &str) -> Result<i64, ExtractorError> {
    field.trim().parse().map_err(|_| ExtractorError::FormatError {
        line,
        reason: format!("{column} is not a unix timestamp"),
    })
}
