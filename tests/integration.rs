//! 固定の合成コミットログに対するエンドツーエンドの回帰テスト
//!
//! 既知のマージ・作成者・日付パターンを持つログから、手計算した
//! 週次レポートと特徴ベクトルが正確に再現されることを確認します。

use activity_extractor::{
    aggregate, extract_all_measures, read_log, read_log_file, write_feature_report_csv,
    write_weekly_report,
};
use std::fs;

// Mon, 15 Apr 2019 00:00:00 UTC
const WEEK0: i64 = 1555286400;
const WEEK: i64 = 604_800;

fn synthetic_log() -> String {
    let rows = [
        ("c1", "", "Alice", "alice@example.com", WEEK0 + 3600, "Alice", "alice@example.com", WEEK0 + 3600),
        ("c2", "c1", "Bob", "bob@example.com", WEEK0 + 7200, "Alice", "alice@example.com", WEEK0 + 2 * 86400),
        ("c3", "c2", "Alice", "alice@example.com", WEEK0 + WEEK + 100, "Alice", "alice@example.com", WEEK0 + WEEK + 200),
        ("c4", "c2 c3", "Bob", "bob@example.com", WEEK0 + WEEK + 5000, "Carol", "carol@example.com", WEEK0 + 2 * WEEK + 100),
        ("c5", "c4", "Carol", "carol@example.com", WEEK0 + 3 * WEEK + 50, "Carol", "carol@example.com", WEEK0 + 4 * WEEK + 60),
    ];

    rows.iter()
        .map(|(hash, parents, author, author_email, author_date, integrator, integrator_email, integrator_date)| {
            format!(
                "\"{hash}\",\"{parents}\",\"{author}\",\"{author_email}\",\"{author_date}\",\"{integrator}\",\"{integrator_email}\",\"{integrator_date}\"\n"
            )
        })
        .collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn weekly_series_match_hand_computed_values() {
    let records = read_log(synthetic_log().as_bytes()).unwrap();
    let series = aggregate(&records).unwrap();

    // 作成者カレンダーは4週、統合者カレンダーは5週
    assert_eq!(series.author_calendar.anchor, WEEK0);
    assert_eq!(series.author_calendar.total_weeks, 4);
    assert_eq!(series.integrator_calendar.anchor, WEEK0);
    assert_eq!(series.integrator_calendar.total_weeks, 5);

    assert_eq!(series.commits, vec![2, 2, 0, 1]);
    assert_eq!(series.authors, vec![2, 2, 0, 1]);
    assert_eq!(series.integrations, vec![2, 1, 1, 0, 1]);
    assert_eq!(series.integrators, vec![1, 1, 1, 0, 1]);
    assert_eq!(series.merges, vec![0, 0, 1, 0, 0]);
}

#[test]
fn weekly_report_matches_hand_computed_rows() {
    let records = read_log(synthetic_log().as_bytes()).unwrap();
    let series = aggregate(&records).unwrap();
    let rows = series.report_rows("synthetic.csv").unwrap();

    assert_eq!(rows.len(), 5);

    let expected = [
        ("2019-04-21", 0, 2, 2, 2, 1),
        ("2019-04-28", 0, 2, 1, 2, 1),
        ("2019-05-05", 1, 0, 1, 0, 1),
        ("2019-05-12", 0, 1, 0, 1, 0),
        ("2019-05-19", 0, 0, 1, 0, 1),
    ];

    for (row, (date, merges, commits, integrations, committers, integrators)) in
        rows.iter().zip(expected)
    {
        assert_eq!(row.filename, "synthetic.csv");
        assert_eq!(row.date, date);
        assert_eq!(row.merges, merges);
        assert_eq!(row.commits, commits);
        assert_eq!(row.integrations, integrations);
        assert_eq!(row.committers, committers);
        assert_eq!(row.integrators, integrators);
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("weekly.csv");
    write_weekly_report(&path, &rows).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next().unwrap(),
        "filename,date,merges,commits,integrations,commiters,integrators"
    );
    assert_eq!(
        lines.next().unwrap(),
        "synthetic.csv,2019-04-21,0,2,2,2,1"
    );
    assert_eq!(content.lines().count(), 6);
}

#[test]
fn commit_feature_vector_matches_hand_computed_values() {
    let records = read_log(synthetic_log().as_bytes()).unwrap();
    let series = aggregate(&records).unwrap();
    let measures = extract_all_measures(&series).unwrap();

    // commits = [2, 2, 0, 1]
    let commits = &measures["commits"];
    assert_eq!(commits.duration, 4);
    assert_eq!(commits.sum_y, 5);
    assert_close(commits.mean_y, 1.25);
    assert_eq!(commits.max_y, 2);
    assert_eq!(commits.max_y_pos, 1);
    assert_close(commits.std_y.unwrap(), 0.9574271077563381);
    assert_close(commits.q25, 0.5);
    assert_close(commits.q50, 1.5);
    assert_close(commits.q75, 2.0);

    assert_eq!(commits.peak_up, 0);
    assert_eq!(commits.peak_down, 1);
    assert_eq!(commits.peak_none, 3);

    assert_eq!((commits.min_ps, commits.max_ps, commits.sum_ps), (1, 1, 1));
    assert_close(commits.mean_ps, 1.0);
    assert_eq!((commits.min_ns, commits.max_ns, commits.sum_ns), (1, 1, 1));
    assert_close(commits.mean_ns, 1.0);

    assert_eq!(commits.pg_count, 1);
    assert_eq!((commits.min_pg, commits.max_pg), (1, 1));
    assert_eq!(commits.ng_count, 1);
    assert_eq!((commits.min_ng, commits.max_ng), (-2, -2));

    assert_close(commits.min_npd, -1.25);
    assert_close(commits.avg_npd, -1.25);
    assert_close(commits.max_npd, -1.25);
    assert_close(commits.min_ppd, 0.0);

    assert_close(commits.min_amplitude, 0.0);
    assert_eq!((commits.min_tbp_up, commits.max_tbp_up), (0, 0));
    assert_eq!((commits.min_tbp_down, commits.max_tbp_down), (3, 3));
    assert_close(commits.avg_tbp_down, 3.0);
}

#[test]
fn merge_feature_vector_matches_hand_computed_values() {
    let records = read_log(synthetic_log().as_bytes()).unwrap();
    let series = aggregate(&records).unwrap();
    let measures = extract_all_measures(&series).unwrap();

    // merges = [0, 0, 1, 0, 0]
    let merges = &measures["merges"];
    assert_eq!(merges.duration, 5);
    assert_eq!(merges.sum_y, 1);
    assert_close(merges.mean_y, 0.2);
    assert_eq!(merges.max_y, 1);
    assert_eq!(merges.max_y_pos, 3);
    assert_close(merges.std_y.unwrap(), 0.4472135954999579);
    assert_close(merges.q25, 0.0);
    assert_close(merges.q50, 0.0);
    assert_close(merges.q75, 0.0);

    assert_eq!(merges.peak_up, 1);
    assert_eq!(merges.peak_down, 0);
    assert_eq!(merges.peak_none, 4);

    assert_close(merges.min_ppd, 0.8);
    assert_close(merges.max_amplitude, 1.0);
    assert_eq!((merges.min_tbp_up, merges.max_tbp_up), (3, 3));
    assert_eq!((merges.min_tbp_down, merges.max_tbp_down), (0, 0));
    assert_eq!(merges.pg_count, 1);
    assert_eq!(merges.ng_count, 1);
    assert_eq!((merges.min_ng, merges.max_ng), (-1, -1));
}

#[test]
fn feature_report_lists_measures_in_sorted_order() {
    let records = read_log(synthetic_log().as_bytes()).unwrap();
    let series = aggregate(&records).unwrap();
    let measures = extract_all_measures(&series).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("features.csv");
    write_feature_report_csv(&path, &measures).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 6);

    let expected_header: Vec<&str> = vec![
        "measure",
        "avg_amplitude",
        "avg_ng",
        "avg_npd",
        "avg_pg",
        "avg_ppd",
        "avg_tbp_down",
        "avg_tbp_up",
        "duration",
        "max_amplitude",
        "max_ng",
        "max_npd",
        "max_ns",
        "max_pg",
        "max_ppd",
        "max_ps",
        "max_tbp_down",
        "max_tbp_up",
        "max_y",
        "max_y_pos",
        "mean_ns",
        "mean_ps",
        "mean_y",
        "min_amplitude",
        "min_ng",
        "min_npd",
        "min_ns",
        "min_pg",
        "min_ppd",
        "min_ps",
        "min_tbp_down",
        "min_tbp_up",
        "ng_count",
        "peak_down",
        "peak_none",
        "peak_up",
        "pg_count",
        "q25",
        "q50",
        "q75",
        "std_y",
        "sum_ns",
        "sum_ps",
        "sum_y",
    ];
    assert_eq!(lines[0].split(',').collect::<Vec<_>>(), expected_header);

    let measure_names: Vec<&str> = lines[1..]
        .iter()
        .map(|line| line.split(',').next().unwrap())
        .collect();
    assert_eq!(
        measure_names,
        vec!["authors", "commits", "integrations", "integrators", "merges"]
    );
}

#[test]
fn log_file_round_trip_preserves_measures() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("synthetic.csv");
    fs::write(&path, synthetic_log()).unwrap();

    let records = read_log_file(&path).unwrap();
    assert_eq!(records.len(), 5);

    let series = aggregate(&records).unwrap();
    let measures = extract_all_measures(&series).unwrap();
    assert_eq!(measures.len(), 5);
    assert_eq!(measures["integrations"].sum_y, 5);
    assert_eq!(measures["integrators"].sum_y, 4);
    assert_eq!(measures["authors"].sum_y, 5);
}
