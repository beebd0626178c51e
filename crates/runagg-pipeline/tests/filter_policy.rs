use proptest::prelude::*;
use runagg_core::{AggError, RawRecord};
use runagg_pipeline::{filter_anchored, filter_ordered, SamplingMode, SamplingPolicy};

fn log(gens: &[u64]) -> Vec<RawRecord> {
    gens.iter()
        .map(|gen| RawRecord::from_pairs([("update", gen.to_string())]))
        .collect()
}

fn kept(records: &[RawRecord], mode: SamplingMode, resolution: i64) -> Vec<u64> {
    let policy = SamplingPolicy::new(mode, resolution).expect("policy");
    filter_ordered(records, "update", &policy)
        .expect("filter")
        .into_iter()
        .map(|record| record.counter("update").expect("update"))
        .collect()
}

#[test]
fn non_positive_resolution_is_rejected() {
    for resolution in [0, -1, -50] {
        let err = SamplingPolicy::new(SamplingMode::Interval, resolution).unwrap_err();
        assert!(matches!(err, AggError::Usage(ref info) if info.code == "filter.resolution"));
    }
}

#[test]
fn unknown_mode_is_rejected() {
    assert_eq!("total".parse::<SamplingMode>().expect("total"), SamplingMode::Total);
    let err = "hourly".parse::<SamplingMode>().unwrap_err();
    assert!(matches!(err, AggError::Usage(_)));
}

#[test]
fn interval_counts_generations_from_the_first_record() {
    let records = log(&[0, 1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(kept(&records, SamplingMode::Interval, 3), vec![0, 3, 6]);
    assert_eq!(kept(&records, SamplingMode::Interval, 1).len(), 8);

    let sparse = log(&[10, 20, 30, 40, 50]);
    assert_eq!(kept(&sparse, SamplingMode::Interval, 20), vec![10, 30, 50]);
}

#[test]
fn anchored_interval_counts_from_the_given_origin() {
    let policy = SamplingPolicy::new(SamplingMode::Interval, 3).expect("policy");
    let records = log(&[1, 2, 3, 4, 5, 6]);
    let gens: Vec<u64> = filter_anchored(&records, "update", &policy, 0)
        .expect("filter")
        .into_iter()
        .map(|record| record.counter("update").expect("update"))
        .collect();
    assert_eq!(gens, vec![3, 6]);

    let early = log(&[2, 5, 8]);
    let gens: Vec<u64> = filter_anchored(&early, "update", &policy, 5)
        .expect("filter")
        .into_iter()
        .map(|record| record.counter("update").expect("update"))
        .collect();
    assert_eq!(gens, vec![5, 8]);
}

#[test]
fn total_spreads_points_from_first_to_last() {
    let records = log(&(0..11).collect::<Vec<_>>());
    assert_eq!(kept(&records, SamplingMode::Total, 3), vec![0, 5, 10]);
    assert_eq!(kept(&records, SamplingMode::Total, 1), vec![0]);
    assert_eq!(kept(&records, SamplingMode::Total, 50).len(), 11);
}

#[test]
fn empty_log_yields_nothing() {
    assert!(kept(&[], SamplingMode::Interval, 2).is_empty());
    assert!(kept(&[], SamplingMode::Total, 2).is_empty());
}

proptest! {
    #[test]
    fn interval_keeps_exactly_the_multiples(len in 1usize..200, every in 1i64..25) {
        let gens: Vec<u64> = (0..len as u64).collect();
        let records = log(&gens);
        let retained = kept(&records, SamplingMode::Interval, every);
        let expected: Vec<u64> = gens.iter().copied().filter(|gen| gen % every as u64 == 0).collect();
        prop_assert_eq!(retained, expected);
    }

    #[test]
    fn total_keeps_min_of_points_and_len(len in 1usize..300, points in 1i64..40) {
        let gens: Vec<u64> = (0..len as u64).map(|gen| gen * 7).collect();
        let records = log(&gens);
        let retained = kept(&records, SamplingMode::Total, points);
        prop_assert_eq!(retained.len(), len.min(points as usize));
        prop_assert!(retained.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert_eq!(retained[0], gens[0]);
        if points >= 2 {
            prop_assert_eq!(*retained.last().unwrap(), *gens.last().unwrap());
        }
    }
}
