use runagg_core::AggError;
use runagg_pipeline::AggregateLayout;

#[test]
fn partial_yaml_keeps_defaults() {
    let layout = AggregateLayout::from_yaml_str(
        "replicate_marker: REP_\nconfig_fields: [SEED]\nfiles:\n  secondary_log: logs/best.csv\n",
    )
    .expect("layout");
    assert_eq!(layout.replicate_marker, "REP_");
    assert_eq!(layout.config_fields, vec!["SEED".to_string()]);
    assert_eq!(layout.files.secondary_log.to_str(), Some("logs/best.csv"));
    assert_eq!(layout.files.primary_log, AggregateLayout::default().files.primary_log);
    assert_eq!(layout.secondary_prefix, "elite_");
    assert_eq!(layout.outputs.summary, "aggregate.csv");
}

#[test]
fn default_layout_round_trips_through_yaml() {
    let yaml = serde_yaml::to_string(&AggregateLayout::default()).expect("yaml");
    let layout = AggregateLayout::from_yaml_str(&yaml).expect("parse");
    assert_eq!(layout, AggregateLayout::default());
}

#[test]
fn null_time_series_config_broadcasts_everything() {
    let layout =
        AggregateLayout::from_yaml_str("time_series_config_fields: null\n").expect("layout");
    assert!(layout.time_series_config().is_none());
}

#[test]
fn inconsistent_layouts_are_rejected() {
    let err = AggregateLayout::from_yaml_str("secondary_prefix: \"\"\n").unwrap_err();
    assert!(matches!(err, AggError::Config(ref info) if info.code == "layout.prefix"));

    let err = AggregateLayout::from_yaml_str(
        "time_series_primary_fields: [update, score]\ntime_series_secondary_fields: [score]\n",
    )
    .unwrap_err();
    assert!(matches!(err, AggError::Config(ref info) if info.code == "layout.ts_overlap"));

    let err = AggregateLayout::from_yaml_str("step_column: update\n").unwrap_err();
    assert!(matches!(err, AggError::Config(ref info) if info.code == "layout.step_column"));

    let err = AggregateLayout::from_yaml_str(
        "config_fields: [SEED]\ntime_series_config_fields: [SEED, PROBLEM]\n",
    )
    .unwrap_err();
    assert!(matches!(
        err,
        AggError::Config(ref info)
            if info.code == "layout.ts_config" && info.context["field"] == "PROBLEM"
    ));

    let err = AggregateLayout::from_yaml_str("config_fields: 12\n").unwrap_err();
    assert!(matches!(err, AggError::Config(ref info) if info.code == "layout.parse"));
}
