use super::*;
use std::f64::consts::FRAC_PI_2;

use time::Month;

use crate::{config::FlameConfig, palette::PALETTE_SIZE};

fn session() -> Session {
    Session::new(FlameConfig {
        palette_seed: Some(11),
        ..FlameConfig::default()
    })
}

fn close(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
}

#[test]
fn defaults_match_documented_values() {
    let f = Flame::new(&session());
    assert_eq!(f.canvas(), Canvas::new(1920, 1080).unwrap());
    assert_eq!(f.pixels_per_unit(), 480.0);
    assert_eq!(f.brightness(), 4.0);
    assert_eq!(f.gamma(), 4.0);
    assert_eq!(f.gamma_threshold(), 0.001);
    assert_eq!(f.vibrancy(), 1.0);
    assert_eq!(f.background(), Rgb8::BLACK);
    assert_eq!(f.iterators().len(), 1);
    assert_eq!(f.palette().len(), PALETTE_SIZE);
    assert_eq!(f.scale_factor(), 480.0);
}

#[test]
fn ids_come_from_the_session() {
    let s = session();
    let a = Flame::new(&s);
    let b = Flame::new(&s);
    assert_eq!((a.id(), b.id()), (FlameId(1), FlameId(2)));
    assert_eq!(a.iterators().at(0).unwrap().owner(), a.id());
}

#[test]
fn resizing_rescales_pixels_per_unit() {
    let mut f = Flame::new(&session());
    f.set_canvas_size(960, 540).unwrap();
    assert_eq!(f.pixels_per_unit(), 240.0);
    assert_eq!(f.scale_factor(), 240.0);
    assert!(f.set_canvas_size(0, 10).unwrap_err().is_validation());
    assert_eq!(f.canvas().width, 960);
}

#[test]
fn setters_validate_before_mutation() {
    let mut f = Flame::new(&session());
    assert!(f.set_pixels_per_unit(0.0).is_err());
    assert!(f.set_depth_of_field(-0.1).is_err());
    assert!(f.set_brightness(0.0).is_err());
    assert!(f.set_gamma(0.5).is_err());
    assert!(f.set_gamma_threshold(-1.0).is_err());
    assert!(f.set_vibrancy(-1.0).is_err());
    assert!(f.set_zoom(f64::NAN).is_err());
    assert_eq!(f.pixels_per_unit(), 480.0);
    assert_eq!(f.gamma(), 4.0);

    f.set_gamma(1.0).unwrap();
    f.set_zoom(1.0).unwrap();
    assert_eq!(f.scale_factor(), 960.0);
}

#[test]
fn mapping_centre_and_axes() {
    let mut f = Flame::new(&session());
    f.set_pixels_per_unit(100.0).unwrap();
    assert!(close(
        f.canvas_to_world(Point::new(960.0, 540.0), None, None),
        Point::ZERO
    ));
    // one unit right and up
    assert!(close(
        f.world_to_canvas(Point::new(1.0, 1.0), None, None),
        Point::new(1060.0, 440.0)
    ));
}

#[test]
fn mapping_overrides_replace_cached_values() {
    let f = Flame::new(&session());
    let p = f.world_to_canvas(
        Point::new(1.0, 1.0),
        Some(Point::new(10.0, 10.0)),
        Some(Vec2::new(2.0, -2.0)),
    );
    assert!(close(p, Point::new(12.0, 8.0)));
    let w = f.canvas_to_world(p, Some(Point::new(10.0, 10.0)), Some(Vec2::new(0.5, -0.5)));
    assert!(close(w, Point::new(1.0, 1.0)));
}

#[test]
fn quarter_turn_rotates_world_axes() {
    let mut f = Flame::new(&session());
    f.set_pixels_per_unit(100.0).unwrap();
    f.set_angle(FRAC_PI_2).unwrap();
    let p = f.world_to_canvas(Point::new(1.0, 0.0), None, None);
    assert!(close(p, Point::new(960.0, 440.0)));
    assert!(close(f.canvas_to_world(p, None, None), Point::new(1.0, 0.0)));
}

#[test]
fn copy_is_independent_and_keeps_id() {
    let s = session();
    let mut f = Flame::new(&s);
    f.set_name(Some("orig"));
    let issued = s.ids_issued();
    let mut c = f.copy();
    assert_eq!(s.ids_issued(), issued);
    assert_eq!(c.id(), f.id());
    assert!(c.is_equal(&f));

    c.set_brightness(9.0).unwrap();
    c.add_iterator(IteratorGroup::Final);
    assert_eq!(f.brightness(), 4.0);
    assert_eq!(f.iterators().len(), 1);
    assert!(!c.is_equal(&f));
}

#[test]
fn calculated_name_uses_prefix_date_and_id() {
    let s = Session::new(FlameConfig {
        name_prefix: "apo".to_string(),
        ..FlameConfig::default()
    });
    let mut f = Flame::new(&s);
    let date = Date::from_calendar_date(2024, Month::March, 7).unwrap();
    assert_eq!(f.calculated_name_on(date), "apo-20240307-1");
    f.set_name(Some("  "));
    assert_eq!(f.calculated_name_on(date), "apo-20240307-1");
    f.set_name(Some("named"));
    assert_eq!(f.calculated_name(), "named");
}

#[test]
fn wrong_root_is_rejected_naming_both_tags() {
    let s = session();
    let e = XmlElement::parse("<flam/>").unwrap();
    let err = Flame::read_xml(&s, &e).unwrap_err();
    assert!(err.is_format());
    let msg = err.to_string();
    assert!(msg.contains("\"flame\"") && msg.contains("\"flam\""), "{msg}");
}

#[test]
fn root_tag_is_case_insensitive() {
    let s = session();
    let doc = Flame::new(&s)
        .to_xml_string()
        .replace("<flame ", "<FLAME ")
        .replace("</flame>", "</FLAME>");
    assert!(Flame::from_xml_str(&s, &doc).is_ok());
}

#[test]
fn missing_palette_is_rejected() {
    let s = session();
    let err = Flame::from_xml_str(&s, r#"<flame><xform linear="1"/></flame>"#).unwrap_err();
    assert!(err.is_format());
    assert!(err.to_string().contains("palette"));
}

#[test]
fn document_ranges_are_format_errors() {
    let s = session();
    let base = Flame::new(&s).write_xml();
    for (attr, value) in [
        ("size", "0 100"),
        ("scale", "-1"),
        ("cam_dof", "-2"),
        ("brightness", "0"),
        ("gamma", "-0.5"),
        ("gamma_threshold", "-1"),
        ("vibrancy", "-3"),
        ("zoom", "abc"),
    ] {
        let mut e = base.clone();
        e.set_attr(attr, value);
        assert!(Flame::read_xml(&s, &e).unwrap_err().is_format(), "{attr}");
    }
}

#[test]
fn document_gamma_below_one_is_accepted() {
    let s = session();
    let mut e = Flame::new(&s).write_xml();
    e.set_attr("gamma", "0.5");
    assert_eq!(Flame::read_xml(&s, &e).unwrap().gamma(), 0.5);
}

#[test]
fn angles_are_written_in_degrees() {
    let s = session();
    let mut f = Flame::new(&s);
    f.set_pitch(FRAC_PI_2).unwrap();
    let e = f.write_xml();
    let degrees: f64 = e.attr("cam_pitch").unwrap().parse().unwrap();
    assert!((degrees - 90.0).abs() < 1e-9);
    let back = Flame::read_xml(&s, &e).unwrap();
    assert!((back.pitch() - FRAC_PI_2).abs() < 1e-12);
}

#[test]
fn load_xml_keeps_id_and_survives_failure() {
    let s = session();
    let mut target = Flame::new(&s);
    let mut source = Flame::new(&s);
    source.set_vibrancy(0.25).unwrap();

    target.load_xml(&source.write_xml()).unwrap();
    assert_eq!(target.id(), FlameId(1));
    assert_eq!(target.vibrancy(), 0.25);

    let before = target.copy();
    assert!(target.load_xml(&XmlElement::new("flame")).is_err());
    assert!(target.is_equal(&before));
}

#[test]
fn random_flames_are_valid_and_roundtrip() {
    let s = session();
    let f = Flame::random(&s);
    let n = f.iterators().regular().count();
    assert!((2..=4).contains(&n));
    assert!(f.iterators().iter().all(|it| it.variations().active_count() == 1));
    let back = Flame::from_xml_str(&s, &f.to_xml_string()).unwrap();
    assert!(back.is_equal(&f));
}

#[test]
fn prepare_then_evaluate() {
    let s = session();
    let mut f = Flame::new(&s);
    f.prepare();
    let it = f.iterators().select_regular(0.5).unwrap();
    let mut p = crate::model::SamplePoint::new(0.25, -0.5, 0.0, 0.0);
    it.evaluate(&mut p);
    assert_eq!((p.x, p.y), (0.25, -0.5));
}
