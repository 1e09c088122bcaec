use time::{Date, OffsetDateTime};

use super::{
    camera::CameraCache,
    iterator::IteratorGroup,
    iterators::IteratorCollection,
};
use crate::{
    foundation::{
        core::{Affine, Canvas, Point, Rgb8, Vec2},
        error::{FlameError, FlameResult},
        ids::{FlameId, IteratorId},
    },
    palette::Palette,
    session::Session,
    xml::{
        XmlElement,
        values::{format_f64, format_f64s, parse_f64, parse_f64_array, parse_size},
    },
};

const SIZE_RANGE: &str = "canvas size must be greater than zero in both dimensions";
const SCALE_RANGE: &str = "pixels per unit must be greater than zero";
const DOF_RANGE: &str = "depth of field must be greater than or equal to zero";
const BRIGHTNESS_RANGE: &str = "brightness must be greater than zero";
const GAMMA_RANGE: &str = "gamma must be greater than or equal to one";
const GAMMA_DOCUMENT_RANGE: &str = "gamma must be greater than or equal to zero";
const GAMMA_THRESHOLD_RANGE: &str = "gamma threshold must be greater than or equal to zero";
const VIBRANCY_RANGE: &str = "vibrancy must be greater than or equal to zero";

/// A complete flame: camera and tone parameters, palette and iterators.
///
/// Derived camera values are cached and refreshed by the setters, so
/// [`Flame::canvas_to_world`] and [`Flame::world_to_canvas`] always see the
/// last written parameters.
#[derive(Clone, Debug)]
pub struct Flame {
    session: Session,
    id: FlameId,
    name: Option<String>,
    canvas: Canvas,
    pixels_per_unit: f64,
    zoom: f64,
    angle: f64,
    origin: Vec2,
    pitch: f64,
    yaw: f64,
    height: f64,
    perspective: f64,
    depth_of_field: f64,
    brightness: f64,
    gamma: f64,
    gamma_threshold: f64,
    vibrancy: f64,
    background: Rgb8,
    palette: Palette,
    iterators: IteratorCollection,
    camera: CameraCache,
}

impl Flame {
    /// Default flame with a random palette and one regular iterator.
    pub fn new(session: &Session) -> Self {
        let id = session.allocate_id();
        let palette = session.random_palette();
        Self::with_id(session, id, palette)
    }

    fn with_id(session: &Session, id: FlameId, palette: Palette) -> Self {
        let canvas = Canvas::default();
        let pixels_per_unit = 25.0 * f64::from(canvas.width) / 100.0;
        Self {
            session: session.clone(),
            id,
            name: None,
            canvas,
            pixels_per_unit,
            zoom: 0.0,
            angle: 0.0,
            origin: Vec2::ZERO,
            pitch: 0.0,
            yaw: 0.0,
            height: 0.0,
            perspective: 0.0,
            depth_of_field: 0.0,
            brightness: 4.0,
            gamma: 4.0,
            gamma_threshold: 0.001,
            vibrancy: 1.0,
            background: Rgb8::BLACK,
            palette,
            iterators: IteratorCollection::new(session, id),
            camera: CameraCache::new(canvas, pixels_per_unit, 0.0, 0.0),
        }
    }

    /// Flame with 2 to 4 random regular iterators, each driven by one random
    /// variation.
    pub fn random(session: &Session) -> Self {
        let mut flame = Self::new(session);
        let names: Vec<String> = session.registry().names().map(str::to_string).collect();

        let count = session.with_rng(|rng| 2 + rng.next_below(3));
        for _ in 1..count {
            flame.iterators.add(session, IteratorGroup::Regular);
        }
        for it in flame.iterators.iter_mut() {
            session.with_rng(|rng| {
                let coefs: [f64; 6] = std::array::from_fn(|_| rng.next_range(-1.0, 1.0));
                it.set_pre_affine(Affine::new(coefs));
                let weight = it.set_weight(rng.next_range(0.1, 1.0));
                debug_assert!(weight.is_ok(), "random weight out of range");
                let color = it.set_color(rng.next_f64_01());
                debug_assert!(color.is_ok(), "random color out of range");
                if !names.is_empty() {
                    let pick = &names[rng.next_below(names.len())];
                    it.variations_mut().clear_weights();
                    let picked = it.variations_mut().set_weight(pick, 1.0);
                    debug_assert!(picked.is_ok(), "registry name {pick} not in collection");
                }
            });
        }
        tracing::debug!(flame = flame.id.0, iterators = count, "random flame");
        flame
    }

    fn refresh_camera(&mut self) {
        self.camera = CameraCache::new(self.canvas, self.pixels_per_unit, self.zoom, self.angle);
    }

    pub fn id(&self) -> FlameId {
        self.id
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Blank names are stored as unset.
    pub fn set_name(&mut self, name: Option<&str>) {
        self.name = name
            .filter(|n| !n.trim().is_empty())
            .map(str::to_string);
    }

    /// The name, or `<prefix>-YYYYMMDD-<id>` for unnamed flames using
    /// today's UTC date.
    pub fn calculated_name(&self) -> String {
        self.calculated_name_on(OffsetDateTime::now_utc().date())
    }

    pub fn calculated_name_on(&self, date: Date) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!(
                "{}-{:04}{:02}{:02}-{}",
                self.session.config().name_prefix,
                date.year(),
                u8::from(date.month()),
                date.day(),
                self.id.0
            ),
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Resize the canvas, scaling pixels-per-unit by the width ratio so the
    /// framing is kept.
    pub fn set_canvas_size(&mut self, width: u32, height: u32) -> FlameResult<()> {
        let canvas = Canvas::new(width, height)?;
        self.pixels_per_unit *= f64::from(width) / f64::from(self.canvas.width);
        self.canvas = canvas;
        self.refresh_camera();
        Ok(())
    }

    pub fn pixels_per_unit(&self) -> f64 {
        self.pixels_per_unit
    }

    pub fn set_pixels_per_unit(&mut self, value: f64) -> FlameResult<()> {
        if !(value.is_finite() && value > 0.0) {
            return Err(FlameError::validation(SCALE_RANGE));
        }
        self.pixels_per_unit = value;
        self.refresh_camera();
        Ok(())
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) -> FlameResult<()> {
        self.zoom = finite("zoom", zoom)?;
        self.refresh_camera();
        Ok(())
    }

    /// Rotation in radians.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn set_angle(&mut self, angle: f64) -> FlameResult<()> {
        self.angle = finite("angle", angle)?;
        self.refresh_camera();
        Ok(())
    }

    /// World offset of the view, written as `center`.
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Vec2) -> FlameResult<()> {
        finite("origin", origin.x)?;
        finite("origin", origin.y)?;
        self.origin = origin;
        Ok(())
    }

    /// Camera pitch in radians.
    pub fn pitch(&self) -> f64 {
        self.pitch
    }

    pub fn set_pitch(&mut self, pitch: f64) -> FlameResult<()> {
        self.pitch = finite("pitch", pitch)?;
        Ok(())
    }

    /// Camera yaw in radians.
    pub fn yaw(&self) -> f64 {
        self.yaw
    }

    pub fn set_yaw(&mut self, yaw: f64) -> FlameResult<()> {
        self.yaw = finite("yaw", yaw)?;
        Ok(())
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn set_height(&mut self, height: f64) -> FlameResult<()> {
        self.height = finite("height", height)?;
        Ok(())
    }

    pub fn perspective(&self) -> f64 {
        self.perspective
    }

    pub fn set_perspective(&mut self, perspective: f64) -> FlameResult<()> {
        self.perspective = finite("perspective", perspective)?;
        Ok(())
    }

    pub fn depth_of_field(&self) -> f64 {
        self.depth_of_field
    }

    pub fn set_depth_of_field(&mut self, dof: f64) -> FlameResult<()> {
        self.depth_of_field = at_least(dof, 0.0, DOF_RANGE).map_err(FlameError::validation)?;
        Ok(())
    }

    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    pub fn set_brightness(&mut self, brightness: f64) -> FlameResult<()> {
        self.brightness = positive(brightness, BRIGHTNESS_RANGE).map_err(FlameError::validation)?;
        Ok(())
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Gamma below 1 is rejected here; documents only reject negative gamma.
    pub fn set_gamma(&mut self, gamma: f64) -> FlameResult<()> {
        self.gamma = at_least(gamma, 1.0, GAMMA_RANGE).map_err(FlameError::validation)?;
        Ok(())
    }

    pub fn gamma_threshold(&self) -> f64 {
        self.gamma_threshold
    }

    pub fn set_gamma_threshold(&mut self, value: f64) -> FlameResult<()> {
        self.gamma_threshold =
            at_least(value, 0.0, GAMMA_THRESHOLD_RANGE).map_err(FlameError::validation)?;
        Ok(())
    }

    pub fn vibrancy(&self) -> f64 {
        self.vibrancy
    }

    pub fn set_vibrancy(&mut self, value: f64) -> FlameResult<()> {
        self.vibrancy = at_least(value, 0.0, VIBRANCY_RANGE).map_err(FlameError::validation)?;
        Ok(())
    }

    pub fn background(&self) -> Rgb8 {
        self.background
    }

    pub fn set_background(&mut self, color: Rgb8) {
        self.background = color;
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    pub fn iterators(&self) -> &IteratorCollection {
        &self.iterators
    }

    pub fn iterators_mut(&mut self) -> &mut IteratorCollection {
        &mut self.iterators
    }

    /// Append a reset iterator to `group`.
    pub fn add_iterator(&mut self, group: IteratorGroup) -> IteratorId {
        self.iterators.add(&self.session, group)
    }

    /// `2^zoom · pixels_per_unit`.
    pub fn scale_factor(&self) -> f64 {
        self.camera.scale_factor
    }

    /// Map a device pixel to world coordinates. `center` overrides the
    /// half-canvas point, `scale` the inverse (world units per pixel) scale
    /// vector.
    pub fn canvas_to_world(&self, p: Point, center: Option<Point>, scale: Option<Vec2>) -> Point {
        self.camera.canvas_to_world(p, self.origin, center, scale)
    }

    /// Inverse of [`Flame::canvas_to_world`]. `scale` overrides the forward
    /// (pixels per world unit) scale vector.
    pub fn world_to_canvas(&self, p: Point, center: Option<Point>, scale: Option<Vec2>) -> Point {
        self.camera.world_to_canvas(p, self.origin, center, scale)
    }

    /// Prepare every iterator's variations with the session's style.
    pub fn prepare(&mut self) {
        let style = self.session.config().variation_style;
        for it in self.iterators.iter_mut() {
            it.prepare(style);
        }
        tracing::debug!(flame = self.id.0, ?style, "flame prepared");
    }

    /// Independent deep copy with the same id; no id is drawn.
    pub fn copy(&self) -> Self {
        Self {
            session: self.session.clone(),
            id: self.id,
            name: self.name.clone(),
            canvas: self.canvas,
            pixels_per_unit: self.pixels_per_unit,
            zoom: self.zoom,
            angle: self.angle,
            origin: self.origin,
            pitch: self.pitch,
            yaw: self.yaw,
            height: self.height,
            perspective: self.perspective,
            depth_of_field: self.depth_of_field,
            brightness: self.brightness,
            gamma: self.gamma,
            gamma_threshold: self.gamma_threshold,
            vibrancy: self.vibrancy,
            background: self.background,
            palette: self.palette.clone(),
            iterators: self.iterators.copy_for(self.id),
            camera: self.camera,
        }
    }

    /// Exact comparison of every parameter, the palette and the iterators.
    /// The id is not compared.
    pub fn is_equal(&self, other: &Flame) -> bool {
        self.name == other.name
            && self.canvas == other.canvas
            && self.pixels_per_unit == other.pixels_per_unit
            && self.origin == other.origin
            && self.angle == other.angle
            && self.zoom == other.zoom
            && self.pitch == other.pitch
            && self.yaw == other.yaw
            && self.height == other.height
            && self.perspective == other.perspective
            && self.depth_of_field == other.depth_of_field
            && self.brightness == other.brightness
            && self.gamma == other.gamma
            && self.gamma_threshold == other.gamma_threshold
            && self.vibrancy == other.vibrancy
            && self.background == other.background
            && self.palette == other.palette
            && self.iterators.is_equal(&other.iterators)
    }

    /// Parse a `flame` element into a new flame. Either every attribute,
    /// iterator and the palette are accepted or nothing is returned.
    #[tracing::instrument(skip(session, element), fields(tag = element.name()))]
    pub fn read_xml(session: &Session, element: &XmlElement) -> FlameResult<Self> {
        let mut flame = Self::parse(session, FlameId(0), element)?;
        let id = session.allocate_id();
        flame.id = id;
        flame.iterators.set_owner(id);
        tracing::debug!(flame = id.0, iterators = flame.iterators.len(), "flame read");
        Ok(flame)
    }

    /// Replace this flame's contents with a parsed element, keeping its id.
    /// On failure the flame is unchanged.
    pub fn load_xml(&mut self, element: &XmlElement) -> FlameResult<()> {
        *self = Self::parse(&self.session, self.id, element)?;
        Ok(())
    }

    pub fn from_xml_str(session: &Session, doc: &str) -> FlameResult<Self> {
        Self::read_xml(session, &XmlElement::parse(doc)?)
    }

    fn parse(session: &Session, id: FlameId, element: &XmlElement) -> FlameResult<Self> {
        if !element.is_named("flame") {
            return Err(FlameError::format(format!(
                "expected XML node \"flame\" but received \"{}\"",
                element.name()
            )));
        }

        let mut f = Self::with_id(session, id, Palette::default());
        f.set_name(element.attr("name"));

        if let Some(v) = element.attr("size") {
            let (w, h) = parse_size("size", v)?;
            let dim = |d: i64| u32::try_from(d).ok().filter(|d| *d > 0);
            f.canvas = match (dim(w), dim(h)) {
                (Some(w), Some(h)) => Canvas::new(w, h)?,
                _ => return Err(FlameError::format(SIZE_RANGE)),
            };
        }
        if let Some(v) = element.attr("center") {
            let [x, y] = parse_f64_array("center", v)?;
            f.origin = Vec2::new(x, y);
        }
        if let Some(v) = element.attr("angle") {
            f.angle = parse_f64("angle", v)?;
        }
        if let Some(v) = element.attr("scale") {
            f.pixels_per_unit =
                positive(parse_f64("scale", v)?, SCALE_RANGE).map_err(FlameError::format)?;
        }
        if let Some(v) = element.attr("zoom") {
            f.zoom = parse_f64("zoom", v)?;
        }
        if let Some(v) = element.attr("cam_pitch") {
            f.pitch = parse_f64("cam_pitch", v)?.to_radians();
        }
        if let Some(v) = element.attr("cam_yaw") {
            f.yaw = parse_f64("cam_yaw", v)?.to_radians();
        }
        if let Some(v) = element.attr("cam_zpos") {
            f.height = parse_f64("cam_zpos", v)?;
        }
        if let Some(v) = element.attr("cam_dof") {
            f.depth_of_field =
                at_least(parse_f64("cam_dof", v)?, 0.0, DOF_RANGE).map_err(FlameError::format)?;
        }
        if let Some(v) = element.attr("cam_perspective") {
            f.perspective = parse_f64("cam_perspective", v)?;
        }
        if let Some(v) = element.attr("brightness") {
            f.brightness = positive(parse_f64("brightness", v)?, BRIGHTNESS_RANGE)
                .map_err(FlameError::format)?;
        }
        if let Some(v) = element.attr("gamma") {
            f.gamma = at_least(parse_f64("gamma", v)?, 0.0, GAMMA_DOCUMENT_RANGE)
                .map_err(FlameError::format)?;
        }
        if let Some(v) = element.attr("gamma_threshold") {
            f.gamma_threshold =
                at_least(parse_f64("gamma_threshold", v)?, 0.0, GAMMA_THRESHOLD_RANGE)
                    .map_err(FlameError::format)?;
        }
        if let Some(v) = element.attr("vibrancy") {
            f.vibrancy = at_least(parse_f64("vibrancy", v)?, 0.0, VIBRANCY_RANGE)
                .map_err(FlameError::format)?;
        }
        if let Some(v) = element.attr("background") {
            let [r, g, b] = parse_f64_array("background", v)?;
            f.background = Rgb8::from_unit(r, g, b);
        }

        let mut elements = element.descendants_named("xform");
        elements.extend(element.descendants_named("finalxform"));
        f.iterators = IteratorCollection::read_xml(session, id, elements)?;

        let palette = element
            .descendants_named("palette")
            .into_iter()
            .next()
            .ok_or_else(|| FlameError::format("no descendant node \"palette\" found"))?;
        f.palette.read_condensed_hex(palette.text())?;

        f.refresh_camera();
        Ok(f)
    }

    #[tracing::instrument(skip(self), fields(flame = self.id.0))]
    pub fn write_xml(&self) -> XmlElement {
        let mut e = XmlElement::new("flame");
        if let Some(name) = &self.name {
            e.set_attr("name", name.as_str());
        }
        e.set_attr("size", format!("{} {}", self.canvas.width, self.canvas.height));
        e.set_attr("center", format_f64s(&[self.origin.x, self.origin.y]));
        e.set_attr("angle", format_f64(self.angle));
        e.set_attr("scale", format_f64(self.pixels_per_unit));
        e.set_attr("zoom", format_f64(self.zoom));
        e.set_attr("cam_pitch", format_f64(self.pitch.to_degrees()));
        e.set_attr("cam_yaw", format_f64(self.yaw.to_degrees()));
        e.set_attr("cam_zpos", format_f64(self.height));
        e.set_attr("cam_perspective", format_f64(self.perspective));
        e.set_attr("cam_dof", format_f64(self.depth_of_field));
        e.set_attr("brightness", format_f64(self.brightness));
        e.set_attr("gamma", format_f64(self.gamma));
        e.set_attr("gamma_threshold", format_f64(self.gamma_threshold));
        e.set_attr("vibrancy", format_f64(self.vibrancy));
        e.set_attr("background", format_f64s(&self.background.to_unit()));

        for it in self.iterators.write_xml() {
            e.push_child(it);
        }
        e.push_child(self.palette.write_xml());
        e
    }

    /// Standalone document holding this flame.
    pub fn to_xml_string(&self) -> String {
        self.write_xml().to_document_string()
    }
}

fn finite(what: &str, v: f64) -> FlameResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FlameError::validation(format!("{what} must be a finite number")))
    }
}

fn positive(v: f64, msg: &'static str) -> Result<f64, &'static str> {
    if v.is_finite() && v > 0.0 { Ok(v) } else { Err(msg) }
}

fn at_least(v: f64, lo: f64, msg: &'static str) -> Result<f64, &'static str> {
    if v.is_finite() && v >= lo { Ok(v) } else { Err(msg) }
}

#[cfg(test)]
#[path = "../../tests/unit/model/flame.rs"]
mod tests;
