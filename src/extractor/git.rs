//! Gitリポジトリとの対話を担当するモジュール
//!
//! このモジュールは、libgit2を使用してGitリポジトリからコミット履歴を
//! 取得し、コミットログと同じ8項目のレコードとしてエクスポートする
//! 機能を提供します。リポジトリのクローンもここで行います。

use super::error::ExtractorError;
use super::log::CommitRecord;
use git2::build::RepoBuilder;
use git2::Repository;
use std::path::Path;

/// Gitリポジトリへのアクセスを管理する構造体
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// 指定されたパスのGitリポジトリをオープンします
    ///
    /// # エラー
    ///
    /// 指定されたパスが有効なGitリポジトリでない場合にエラーを返します
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ExtractorError> {
        Ok(Self {
            repo: Repository::open(path)?,
        })
    }

    /// リモートリポジトリを指定されたディレクトリへクローンします
    ///
    /// # 引数
    ///
    /// - `url`: クローン元のURL
    /// - `directory`: クローン先のディレクトリ
    pub fn clone(url: &str, directory: impl AsRef<Path>) -> Result<Self, ExtractorError> {
        Ok(Self {
            repo: RepoBuilder::new().clone(url, directory.as_ref())?,
        })
    }

    /// HEADから辿れる全コミットをレコードとしてエクスポートします
    ///
    /// # 戻り値
    ///
    /// コミット日時の新しい順に並んだ`CommitRecord`のベクターを返します
    ///
    /// # エラー
    ///
    /// コミット履歴の取得に失敗した場合にエラーを返します
    pub fn export_records(&self) -> Result<Vec<CommitRecord>, ExtractorError> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push_head()?;
        revwalk.set_sorting(git2::Sort::TIME)?;

        let mut records = Vec::new();
        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;

            let parent_hashes = commit
                .parent_ids()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(" ");

            let author = commit.author();
            let committer = commit.committer();

            records.push(CommitRecord {
                hash: oid.to_string(),
                parent_hashes,
                author_name: author.name().unwrap_or("unknown").to_string(),
                author_email: author.email().unwrap_or("").to_string(),
                author_date: author.when().seconds(),
                integrator_name: committer.name().unwrap_or("unknown").to_string(),
                integrator_email: committer.email().unwrap_or("").to_string(),
                integrator_date: committer.when().seconds(),
            });
        }

        Ok(records)
    }
}
