use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        FlameError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(FlameError::format("x").to_string().contains("format error:"));
    assert!(
        FlameError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn kind_predicates_match_variants() {
    assert!(FlameError::format("bad root").is_format());
    assert!(!FlameError::format("bad root").is_validation());
    assert!(FlameError::validation("weight").is_validation());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = FlameError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
