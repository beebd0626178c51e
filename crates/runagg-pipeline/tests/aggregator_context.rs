mod common;

use common::{small_layout, write_replicate};
use runagg_pipeline::{Aggregator, ReplicateOutcome, SamplingMode, SamplingPolicy};
use tempfile::tempdir;

const FINISHED: [(&str, &str); 3] = [
    ("STOP_MODE", "generations"),
    ("MAX_GENS", "2"),
    ("SEED", "1"),
];

#[test]
fn process_reports_each_outcome() {
    let data = tempdir().expect("data");
    let dump = tempdir().expect("dump");
    let done = write_replicate(data.path(), "RUN_a", &[0, 1, 2], &[2], &FINISHED);
    let short = write_replicate(
        data.path(),
        "RUN_b",
        &[0, 1],
        &[1],
        &[("STOP_MODE", "generations"), ("MAX_GENS", "2"), ("SEED", "2")],
    );
    let empty = data.path().join("RUN_c");
    std::fs::create_dir_all(&empty).expect("mkdir");

    let policy = SamplingPolicy::new(SamplingMode::Interval, 1).expect("policy");
    let mut aggregator = Aggregator::new(small_layout(), policy, dump.path()).expect("aggregator");
    assert_eq!(
        aggregator.process(&done).expect("done"),
        ReplicateOutcome::Contributed { completed: true }
    );
    assert_eq!(
        aggregator.process(&short).expect("short"),
        ReplicateOutcome::Contributed { completed: false }
    );
    assert_eq!(
        aggregator.process(&empty).expect("empty"),
        ReplicateOutcome::MissingInputs
    );
    let report = aggregator.finish().expect("finish");
    assert_eq!(report.summary_rows, 2);
    assert_eq!(report.time_series_rows, 5);
    assert_eq!(
        report.incomplete,
        vec![short.display().to_string(), empty.display().to_string()]
    );
}

#[test]
fn separate_runs_do_not_share_headers() {
    let data = tempdir().expect("data");
    let first_dump = tempdir().expect("first");
    let second_dump = tempdir().expect("second");
    let plain = write_replicate(data.path(), "RUN_a", &[0, 1, 2], &[2], &FINISHED);
    let widened = write_replicate(
        data.path(),
        "RUN_b",
        &[0, 1, 2],
        &[2],
        &[
            ("STOP_MODE", "generations"),
            ("MAX_GENS", "2"),
            ("MAX_EVALS", "10"),
            ("SEED", "3"),
        ],
    );
    let policy = SamplingPolicy::new(SamplingMode::Interval, 1).expect("policy");

    let mut first = Aggregator::new(small_layout(), policy, first_dump.path()).expect("first");
    first.process(&plain).expect("plain");
    let mut second = Aggregator::new(small_layout(), policy, second_dump.path()).expect("second");
    second.process(&widened).expect("widened");

    assert!(first.process(&widened).is_err());
    first.finish().expect("finish first");
    let report = second.finish().expect("finish second");
    assert!(report.summary_header.contains(&"MAX_EVALS".to_string()));
}
