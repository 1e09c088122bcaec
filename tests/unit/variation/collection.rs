use super::*;

fn collection() -> VariationCollection {
    VariationCollection::new(Arc::new(VariationRegistry::with_builtins()))
}

#[test]
fn starts_with_every_kind_inactive() {
    let c = collection();
    assert_eq!(c.iter().count(), c.registry().len());
    assert_eq!(c.active_count(), 0);
    assert_eq!(c.weight("swirl"), Some(0.0));
    assert_eq!(c.weight("nope"), None);
}

#[test]
fn active_filter_yields_nonzero_weights_in_registry_order() {
    let mut c = collection();
    c.set_weight("swirl", 0.5).unwrap();
    c.set_weight("linear", -1.0).unwrap();
    c.set_weight("bubble", EPSILON / 2.0).unwrap();
    let names: Vec<&str> = c.active().map(|e| e.name()).collect();
    assert_eq!(names, ["linear", "swirl"]);
}

#[test]
fn set_weight_rejects_unknown_and_non_finite() {
    let mut c = collection();
    assert!(c.set_weight("missing", 1.0).unwrap_err().is_validation());
    assert!(c.set_weight("linear", f64::NAN).unwrap_err().is_validation());
    assert_eq!(c.active_count(), 0);
}

#[test]
fn variables_are_writable_while_inactive() {
    let mut c = collection();
    c.set_variable("curl_c1", 0.25).unwrap();
    assert_eq!(c.variable("curl_c1"), Some(0.25));
    assert_eq!(c.weight("curl"), Some(0.0));
    assert!(c.set_variable("unknown_var", 1.0).unwrap_err().is_validation());
}

#[test]
fn active_copy_drops_inactive_variables() {
    let mut c = collection();
    c.set_weight("pdj", 0.5).unwrap();
    c.set_variable("pdj_b", 2.0).unwrap();
    c.set_variable("rings2_val", 3.0).unwrap();

    let copy = c.active_copy();
    assert_eq!(copy.weight("pdj"), Some(0.5));
    assert_eq!(copy.variable("pdj_b"), Some(2.0));
    assert_eq!(copy.variable("rings2_val"), Some(1.0));
    assert!(copy.is_equal(&c));
}

#[test]
fn equality_ignores_inactive_entries() {
    let mut a = collection();
    let mut b = collection();
    a.set_weight("swirl", 1.0).unwrap();
    b.set_weight("swirl", 1.0).unwrap();
    b.set_variable("curl_c2", 9.0).unwrap();
    assert!(a.is_equal(&b));

    b.set_weight("swirl", 0.9).unwrap();
    assert!(!a.is_equal(&b));
    b.set_weight("swirl", 1.0).unwrap();
    b.set_weight("disc", 0.1).unwrap();
    assert!(!a.is_equal(&b));
}

#[test]
fn clear_weights_deactivates_everything() {
    let mut c = collection();
    c.set_weight("linear", 1.0).unwrap();
    c.set_weight("heart", 2.0).unwrap();
    c.clear_weights();
    assert_eq!(c.active_count(), 0);
}
