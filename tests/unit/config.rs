use super::*;

#[test]
fn empty_object_yields_defaults() {
    let cfg = FlameConfig::from_json_str("{}").unwrap();
    assert_eq!(cfg, FlameConfig::default());
    assert_eq!(cfg.variation_style.default_variation(), "linear3D");
    assert!(!cfg.variation_style.passes_z_through());
}

#[test]
fn fields_parse_from_json() {
    let cfg = FlameConfig::from_json_str(
        r#"{ "variation_style": "classic", "legacy_post_affine_slot": true, "palette_seed": 9 }"#,
    )
    .unwrap();
    assert_eq!(cfg.variation_style, VariationStyle::Classic);
    assert_eq!(cfg.variation_style.default_variation(), "linear");
    assert!(cfg.legacy_post_affine_slot);
    assert_eq!(cfg.palette_seed, Some(9));
    assert_eq!(cfg.name_prefix, "flame");
}

#[test]
fn unknown_fields_are_serde_errors() {
    let err = FlameConfig::from_json_str(r#"{ "style": "classic" }"#).unwrap_err();
    assert!(matches!(err, FlameError::Serde(_)));
}

#[test]
fn json_roundtrip() {
    let cfg = FlameConfig {
        name_prefix: "apo".to_string(),
        palette_seed: Some(3),
        ..FlameConfig::default()
    };
    let back = FlameConfig::from_json_str(&cfg.to_json_pretty().unwrap()).unwrap();
    assert_eq!(back, cfg);
}
