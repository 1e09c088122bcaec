use super::*;
use std::sync::Arc;

use crate::{foundation::core::Affine, variation::VariationCollection};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn run(v: &dyn Variation, weight: f64, x: f64, y: f64, z: f64) -> IterationPoint {
    let mut p = IterationPoint::new(x, y, z);
    v.calculate(weight, &mut p);
    p
}

fn prepared(name: &str, style: VariationStyle) -> Box<dyn Variation> {
    let mut v = VariationRegistry::with_builtins().create(name).unwrap();
    v.prepare(&PrepareContext::new(style, Affine::IDENTITY));
    v
}

#[test]
fn linear_scales_by_weight() {
    let v = prepared("linear", VariationStyle::Modern);
    let p = run(v.as_ref(), 0.5, 2.0, -4.0, 3.0);
    assert_eq!((p.post_x, p.post_y, p.post_z), (1.0, -2.0, 0.0));
}

#[test]
fn linear3d_always_carries_z() {
    for style in [VariationStyle::Classic, VariationStyle::Modern] {
        let v = prepared("linear3D", style);
        let p = run(v.as_ref(), 2.0, 1.0, 1.0, 3.0);
        assert_eq!(p.post_z, 6.0);
    }
}

#[test]
fn classic_style_passes_z_through_planar_variations() {
    for name in ["sinusoidal", "swirl", "curl", "pdj", "fan"] {
        let classic = prepared(name, VariationStyle::Classic);
        let modern = prepared(name, VariationStyle::Modern);
        assert_eq!(run(classic.as_ref(), 0.5, 0.3, 0.2, 4.0).post_z, 2.0, "{name}");
        assert_eq!(run(modern.as_ref(), 0.5, 0.3, 0.2, 4.0).post_z, 0.0, "{name}");
    }
}

#[test]
fn curl_without_coefficients_is_nearly_linear() {
    let v = prepared("curl", VariationStyle::Modern);
    let p = run(v.as_ref(), 1.0, 0.4, -0.3, 0.0);
    assert!((p.post_x - 0.4).abs() < 1e-5);
    assert!((p.post_y + 0.3).abs() < 1e-5);
}

#[test]
fn sinusoidal_matches_formula() {
    let v = prepared("sinusoidal", VariationStyle::Modern);
    let p = run(v.as_ref(), 2.0, 0.7, -1.1, 0.0);
    assert!(close(p.post_x, 2.0 * 0.7f64.sin()));
    assert!(close(p.post_y, 2.0 * (-1.1f64).sin()));
}

#[test]
fn pdj_reads_its_variables() {
    let mut v = prepared("pdj", VariationStyle::Modern);
    assert!(v.set_variable("pdj_a", 1.0));
    assert!(v.set_variable("pdj_d", 2.0));
    assert!(!v.set_variable("curl_c1", 1.0));
    assert_eq!(v.variable("pdj_a"), Some(1.0));
    let p = run(v.as_ref(), 1.0, 0.5, 0.25, 0.0);
    assert!(close(p.post_x, (0.25f64).sin() - 0.0f64.cos()));
    assert!(close(p.post_y, 0.0f64.sin() - (0.5f64).cos()));
}

#[test]
fn contributions_add_up_regardless_of_order() {
    let (x, y) = (0.35, -0.6);
    let a = prepared("swirl", VariationStyle::Modern);
    let b = prepared("spherical", VariationStyle::Modern);
    let (wa, wb) = (0.7, 0.3);

    let mut ab = IterationPoint::new(x, y, 0.0);
    a.calculate(wa, &mut ab);
    b.calculate(wb, &mut ab);
    let mut ba = IterationPoint::new(x, y, 0.0);
    b.calculate(wb, &mut ba);
    a.calculate(wa, &mut ba);

    let pa = run(a.as_ref(), 1.0, x, y, 0.0);
    let pb = run(b.as_ref(), 1.0, x, y, 0.0);
    let expected = (wa * pa.post_x + wb * pb.post_x, wa * pa.post_y + wb * pb.post_y);
    assert!(close(ab.post_x, expected.0) && close(ab.post_y, expected.1));
    assert!(close(ba.post_x, expected.0) && close(ba.post_y, expected.1));
}

#[test]
fn collection_sum_matches_manual_sum() {
    let registry = Arc::new(VariationRegistry::with_builtins());
    let mut c = VariationCollection::new(registry);
    c.set_weight("bubble", 0.25).unwrap();
    c.set_weight("polar", 0.75).unwrap();
    c.prepare(&PrepareContext::default());

    let mut p = IterationPoint::new(0.2, 0.9, 0.0);
    c.calculate(&mut p);
    let bubble = run(prepared("bubble", VariationStyle::Modern).as_ref(), 0.25, 0.2, 0.9, 0.0);
    let polar = run(prepared("polar", VariationStyle::Modern).as_ref(), 0.75, 0.2, 0.9, 0.0);
    assert!(close(p.post_x, bubble.post_x + polar.post_x));
    assert!(close(p.post_y, bubble.post_y + polar.post_y));
}

#[test]
fn fan_snapshots_pre_affine_offset() {
    let mut v = VariationRegistry::with_builtins().create("fan").unwrap();
    v.prepare(&PrepareContext::new(
        VariationStyle::Modern,
        Affine::new([1.0, 0.0, 0.0, 1.0, 0.5, 0.0]),
    ));
    let p = run(v.as_ref(), 1.0, 0.3, 0.4, 0.0);
    // fan keeps the radius of the input point
    assert!(close(p.post_x.hypot(p.post_y), 0.5));
}

#[test]
fn fan_uses_truncating_remainder_for_negative_angles() {
    let mut v = VariationRegistry::with_builtins().create("fan").unwrap();
    v.prepare(&PrepareContext::new(
        VariationStyle::Modern,
        Affine::new([1.0, 0.0, 0.0, 1.0, 1.0, 0.0]),
    ));
    let (x, y) = (-0.1f64, 1.0f64);
    let p = run(v.as_ref(), 1.0, x, y, 0.0);

    let dx = PI * (1.0 + EPS);
    let a = x.atan2(y) + dx / 2.0;
    let r = x.hypot(y);
    assert!(close(p.post_x, r * a.cos()), "{p:?}");
    assert!(close(p.post_y, r * a.sin()), "{p:?}");
    assert!(p.post_x > 0.0 && p.post_y > 0.0);
}

#[test]
fn outputs_stay_finite_at_origin() {
    let registry = VariationRegistry::with_builtins();
    for mut v in registry.instantiate_all() {
        v.prepare(&PrepareContext::default());
        let p = run(v.as_ref(), 1.0, 0.0, 0.0, 0.0);
        assert!(p.post_x.is_finite() && p.post_y.is_finite(), "{}", v.name());
    }
}
