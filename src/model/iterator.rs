use crate::{
    config::VariationStyle,
    foundation::{
        core::{Affine, Point},
        error::{FlameError, FlameResult},
        ids::{FlameId, IteratorId},
        math::EPSILON,
    },
    session::Session,
    transform::affine,
    variation::{IterationPoint, PrepareContext, VariationCollection},
    xml::{
        XmlElement,
        values::{format_f64, format_f64s, parse_f64, parse_f64_array},
    },
};

const WEIGHT_RANGE: &str = "iterator weight must be greater than zero";
const COLOR_RANGE: &str = "iterator color must lie within [0, 1]";
const COLOR_SPEED_RANGE: &str = "iterator color speed must lie within [-1, 1]";
const OPACITY_RANGE: &str = "iterator opacity must lie within [0, 1]";
const DIRECT_COLOR_RANGE: &str = "iterator direct color must lie within [0, 1]";

/// Attributes handled (or deliberately ignored) by the iterator codec itself.
/// Compared lowercase.
const KNOWN_ATTRIBUTES: [&str; 10] = [
    "name",
    "weight",
    "color",
    "symmetry",
    "opacity",
    "var_color",
    "coefs",
    "post",
    "chaos",
    "color_speed",
];

/// Role of an iterator inside its flame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IteratorGroup {
    /// Picked by weight for every sample.
    #[default]
    Regular,
    /// Applied once per sample after the regular iterator.
    Final,
}

impl IteratorGroup {
    pub fn index(self) -> u8 {
        match self {
            Self::Regular => 0,
            Self::Final => 1,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Regular => "xform",
            Self::Final => "finalxform",
        }
    }

    /// Group for a document tag, ASCII case-insensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        [Self::Regular, Self::Final]
            .into_iter()
            .find(|g| tag.eq_ignore_ascii_case(g.tag()))
    }
}

/// Point and running color carried through one flame step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub color: f64,
}

impl SamplePoint {
    pub fn new(x: f64, y: f64, z: f64, color: f64) -> Self {
        Self { x, y, z, color }
    }
}

/// One map of the IFS: pre-affine, weighted variation sum, post-affine and
/// the color attributes blended into each sample.
#[derive(Clone, Debug)]
pub struct FlameIterator {
    id: IteratorId,
    owner: FlameId,
    name: Option<String>,
    weight: f64,
    color: f64,
    color_speed: f64,
    opacity: f64,
    direct_color: f64,
    group: IteratorGroup,
    pre_affine: Affine,
    post_affine: Affine,
    variations: VariationCollection,
}

impl FlameIterator {
    /// Regular iterator in its reset state, using the session's registry and
    /// variation style.
    pub fn new(session: &Session, owner: FlameId, id: IteratorId) -> Self {
        let mut it = Self {
            id,
            owner,
            name: None,
            weight: 0.5,
            color: 0.0,
            color_speed: 0.0,
            opacity: 1.0,
            direct_color: 1.0,
            group: IteratorGroup::Regular,
            pre_affine: Affine::IDENTITY,
            post_affine: Affine::IDENTITY,
            variations: VariationCollection::new(session.registry().clone()),
        };
        it.reset(session.config().variation_style);
        it
    }

    /// Restore identity affines and default attributes, keeping only the
    /// style's default linear variation at weight 1. Group and identity are
    /// kept.
    pub fn reset(&mut self, style: VariationStyle) {
        self.name = None;
        self.weight = 0.5;
        self.color = 0.0;
        self.color_speed = 0.0;
        self.opacity = 1.0;
        self.direct_color = 1.0;
        self.pre_affine = Affine::IDENTITY;
        self.post_affine = Affine::IDENTITY;
        self.variations.clear_weights();
        if let Err(err) = self.variations.set_weight(style.default_variation(), 1.0) {
            tracing::warn!(%err, "default variation unavailable");
        }
    }

    /// Copy of the scalars and the active variations, still owned by the same flame.
    pub fn copy(&self) -> Self {
        Self {
            id: self.id,
            owner: self.owner,
            name: self.name.clone(),
            weight: self.weight,
            color: self.color,
            color_speed: self.color_speed,
            opacity: self.opacity,
            direct_color: self.direct_color,
            group: self.group,
            pre_affine: self.pre_affine,
            post_affine: self.post_affine,
            variations: self.variations.active_copy(),
        }
    }

    /// [`FlameIterator::copy`] re-parented to `owner`.
    pub fn copy_for(&self, owner: FlameId) -> Self {
        let mut copy = self.copy();
        copy.owner = owner;
        copy
    }

    pub fn id(&self) -> IteratorId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: IteratorId) {
        self.id = id;
    }

    pub fn owner(&self) -> FlameId {
        self.owner
    }

    pub(crate) fn set_owner(&mut self, owner: FlameId) {
        self.owner = owner;
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

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f64) -> FlameResult<()> {
        if !valid_weight(weight) {
            return Err(FlameError::validation(WEIGHT_RANGE));
        }
        self.weight = weight;
        Ok(())
    }

    pub fn color(&self) -> f64 {
        self.color
    }

    pub fn set_color(&mut self, color: f64) -> FlameResult<()> {
        if !in_range(color, 0.0, 1.0) {
            return Err(FlameError::validation(COLOR_RANGE));
        }
        self.color = color;
        Ok(())
    }

    /// Also written as `symmetry` in documents.
    pub fn color_speed(&self) -> f64 {
        self.color_speed
    }

    pub fn set_color_speed(&mut self, speed: f64) -> FlameResult<()> {
        if !in_range(speed, -1.0, 1.0) {
            return Err(FlameError::validation(COLOR_SPEED_RANGE));
        }
        self.color_speed = speed;
        Ok(())
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f64) -> FlameResult<()> {
        if !in_range(opacity, 0.0, 1.0) {
            return Err(FlameError::validation(OPACITY_RANGE));
        }
        self.opacity = opacity;
        Ok(())
    }

    pub fn direct_color(&self) -> f64 {
        self.direct_color
    }

    pub fn set_direct_color(&mut self, value: f64) -> FlameResult<()> {
        if !in_range(value, 0.0, 1.0) {
            return Err(FlameError::validation(DIRECT_COLOR_RANGE));
        }
        self.direct_color = value;
        Ok(())
    }

    pub fn group(&self) -> IteratorGroup {
        self.group
    }

    /// Only the owning collection may move iterators between groups.
    pub(crate) fn set_group(&mut self, group: IteratorGroup) {
        self.group = group;
    }

    pub fn pre_affine(&self) -> Affine {
        self.pre_affine
    }

    pub fn set_pre_affine(&mut self, m: Affine) {
        self.pre_affine = m;
    }

    pub fn post_affine(&self) -> Affine {
        self.post_affine
    }

    pub fn set_post_affine(&mut self, m: Affine) {
        self.post_affine = m;
    }

    pub fn variations(&self) -> &VariationCollection {
        &self.variations
    }

    pub fn variations_mut(&mut self) -> &mut VariationCollection {
        &mut self.variations
    }

    pub fn rotate(&mut self, angle: f64) {
        self.pre_affine = affine::rotate_axes(self.pre_affine, angle);
    }

    pub fn flip_horizontal(&mut self) {
        self.pre_affine = affine::flip_horizontal(self.pre_affine);
    }

    pub fn flip_vertical(&mut self) {
        self.pre_affine = affine::flip_vertical(self.pre_affine);
    }

    pub fn reset_origin(&mut self) {
        self.pre_affine = affine::reset_origin(self.pre_affine);
    }

    pub fn reset_angle(&mut self) {
        self.pre_affine = affine::reset_angle(self.pre_affine);
    }

    pub fn reset_scale(&mut self) {
        self.pre_affine = affine::reset_scale(self.pre_affine);
    }

    /// Snapshot the pre-affine and style into every active variation.
    pub fn prepare(&mut self, style: VariationStyle) {
        let ctx = PrepareContext::new(style, self.pre_affine);
        self.variations.prepare(&ctx);
    }

    /// One flame step: pre-affine, variation sum, post-affine, color blend.
    pub fn evaluate(&self, sample: &mut SamplePoint) {
        let pre = self.pre_affine * Point::new(sample.x, sample.y);
        let mut p = IterationPoint::new(pre.x, pre.y, sample.z);
        self.variations.calculate(&mut p);
        let post = self.post_affine * Point::new(p.post_x, p.post_y);

        let s = self.color_speed;
        sample.x = post.x;
        sample.y = post.y;
        sample.z = p.post_z;
        sample.color = sample.color * (1.0 + s) / 2.0 + self.color * (1.0 - s) / 2.0;
    }

    /// Apply an `xform`/`finalxform` element. Nothing changes when the
    /// element is rejected.
    pub fn read_xml(&mut self, element: &XmlElement, session: &Session) -> FlameResult<()> {
        let group = IteratorGroup::from_tag(element.name()).ok_or_else(|| {
            FlameError::format(format!(
                "expected \"xform\" or \"finalxform\" but received \"{}\"",
                element.name()
            ))
        })?;

        let mut next = self.clone();
        next.group = group;
        next.set_name(element.attr("name"));

        if group == IteratorGroup::Regular {
            if let Some(v) = element.attr("weight") {
                next.weight = checked(parse_f64("weight", v)?, valid_weight, WEIGHT_RANGE)?;
            }
            if let Some(v) = element.attr("color") {
                next.color = checked_range(parse_f64("color", v)?, 0.0, 1.0, COLOR_RANGE)?;
            }
            if let Some(v) = element.attr("symmetry") {
                next.color_speed =
                    checked_range(parse_f64("symmetry", v)?, -1.0, 1.0, COLOR_SPEED_RANGE)?;
            }
            if let Some(v) = element.attr("opacity") {
                next.opacity = checked_range(parse_f64("opacity", v)?, 0.0, 1.0, OPACITY_RANGE)?;
            }
        } else if element.attr("symmetry").is_some() {
            next.color_speed = 1.0;
        }

        if let Some(v) = element.attr("var_color") {
            next.direct_color =
                checked_range(parse_f64("var_color", v)?, 0.0, 1.0, DIRECT_COLOR_RANGE)?;
        }
        if let Some(v) = element.attr("coefs") {
            next.pre_affine = affine::from_document_coefs(parse_f64_array("coefs", v)?);
        }
        if let Some(v) = element.attr("post") {
            let m = affine::from_document_coefs(parse_f64_array("post", v)?);
            if session.config().legacy_post_affine_slot {
                next.pre_affine = m;
            } else {
                next.post_affine = m;
            }
        }

        next.variations.clear_weights();
        let registry = session.registry();
        for (name, value) in element.attributes() {
            if KNOWN_ATTRIBUTES.contains(&name.to_ascii_lowercase().as_str()) {
                continue;
            }
            if registry.is_variation(name) {
                next.variations.set_weight(name, parse_f64(name, value)?)?;
            } else if registry.is_variable(name) {
                next.variations.set_variable(name, parse_f64(name, value)?)?;
            } else {
                tracing::warn!(element = element.name(), attribute = name, "unknown attribute");
                session.notify_unknown_attribute(element.name(), name);
            }
        }

        *self = next;
        Ok(())
    }

    pub fn write_xml(&self) -> XmlElement {
        let regular = self.group == IteratorGroup::Regular;
        let mut e = XmlElement::new(self.group.tag());

        if regular {
            e.set_attr("weight", format_f64(self.weight));
        }
        e.set_attr("color", format_f64(self.color));
        if self.color_speed != 0.0 {
            e.set_attr("symmetry", format_f64(self.color_speed));
            e.set_attr("color_speed", format_f64(self.color_speed));
        }
        for entry in self.variations.active() {
            e.set_attr(entry.name(), format_f64(entry.weight()));
            for (var, value) in entry.variables() {
                e.set_attr(var, format_f64(value));
            }
        }
        e.set_attr(
            "coefs",
            format_f64s(&affine::to_document_coefs(self.pre_affine)),
        );
        if !affine::is_identity(self.post_affine) {
            e.set_attr(
                "post",
                format_f64s(&affine::to_document_coefs(self.post_affine)),
            );
        }
        if regular {
            e.set_attr("opacity", format_f64(self.opacity));
        }
        if let Some(name) = &self.name {
            e.set_attr("name", name.as_str());
        }
        if self.direct_color != 1.0 {
            e.set_attr("var_color", format_f64(self.direct_color));
        }
        e
    }

    /// Exact comparison of attributes, affines and active variations.
    /// Identity and owner are not compared.
    pub fn is_equal(&self, other: &FlameIterator) -> bool {
        self.name == other.name
            && self.weight == other.weight
            && self.color == other.color
            && self.color_speed == other.color_speed
            && self.opacity == other.opacity
            && self.direct_color == other.direct_color
            && self.group == other.group
            && self.pre_affine == other.pre_affine
            && self.post_affine == other.post_affine
            && self.variations.is_equal(&other.variations)
    }
}

fn valid_weight(w: f64) -> bool {
    w.is_finite() && w > EPSILON
}

fn in_range(v: f64, lo: f64, hi: f64) -> bool {
    (lo..=hi).contains(&v)
}

fn checked(v: f64, ok: fn(f64) -> bool, msg: &str) -> FlameResult<f64> {
    if ok(v) {
        Ok(v)
    } else {
        Err(FlameError::format(msg))
    }
}

fn checked_range(v: f64, lo: f64, hi: f64, msg: &str) -> FlameResult<f64> {
    if in_range(v, lo, hi) {
        Ok(v)
    } else {
        Err(FlameError::format(msg))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/iterator.rs"]
mod tests;
