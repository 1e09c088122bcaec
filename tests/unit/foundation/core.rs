use super::*;

#[test]
fn canvas_rejects_empty_dimensions() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    let c = Canvas::new(640, 360).unwrap();
    assert_eq!(c.half(), Point::new(320.0, 180.0));
}

#[test]
fn default_canvas_is_full_hd() {
    assert_eq!(Canvas::default(), Canvas::new(1920, 1080).unwrap());
}

#[test]
fn rgb_unit_roundtrip_is_exact_for_every_channel_value() {
    for v in 0..=255u8 {
        let c = Rgb8::new(v, 255 - v, v / 2);
        let [r, g, b] = c.to_unit();
        assert_eq!(Rgb8::from_unit(r, g, b), c);
    }
}

#[test]
fn rgb_from_unit_clamps() {
    assert_eq!(Rgb8::from_unit(-1.0, 2.0, 0.5), Rgb8::new(0, 255, 128));
}
