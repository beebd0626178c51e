use runagg_core::{AggError, Schema};
use runagg_pipeline::SchemaGuard;

#[test]
fn first_schema_is_adopted_and_later_ones_must_match() {
    let mut guard = SchemaGuard::new("summary");
    assert!(guard.header().is_none());
    let schema = Schema::from_names(["update", "SEED"]);
    assert!(guard.check("RUN_a", &schema).expect("adopt"));
    assert!(!guard.check("RUN_b", &Schema::from_names(["SEED", "update"])).expect("match"));
    assert_eq!(guard.header(), Some(&schema));
}

#[test]
fn widened_or_narrowed_schema_is_fatal() {
    let mut guard = SchemaGuard::new("time series");
    guard
        .check("RUN_a", &Schema::from_names(["a", "b"]))
        .expect("adopt");

    let err = guard
        .check("RUN_b", &Schema::from_names(["a", "b", "c"]))
        .unwrap_err();
    assert!(!err.is_recoverable());
    let AggError::Schema(info) = err else {
        panic!("expected schema error");
    };
    assert_eq!(info.context["replicate"], "RUN_b");
    assert_eq!(info.context["added"], "c");
    assert_eq!(info.context["removed"], "");

    let err = guard.check("RUN_c", &Schema::from_names(["a"])).unwrap_err();
    assert_eq!(err.info().context["removed"], "b");
}

#[test]
fn check_all_stops_at_first_divergent_entry() {
    let mut guard = SchemaGuard::new("time series");
    let schemas = vec![Schema::from_names(["x"]), Schema::from_names(["x", "y"])];
    assert!(guard.check_all("RUN_a", &schemas).is_err());
    assert_eq!(guard.header(), Some(&Schema::from_names(["x"])));
}
