//! Built-in variations.
//!
//! Formulas use `r² = x² + y²`, `r = √r²` and the classic angle
//! `θ = atan2(x, y)`. In [`VariationStyle::Classic`] every 2D variation also
//! carries `z` through; `linear3D` always does.

use std::f64::consts::PI;

use super::{IterationPoint, PrepareContext, Variation, VariationRegistry};
use crate::{config::VariationStyle, transform::affine};

/// Guards divisions by radii and squared radii.
pub const EPS: f64 = 1e-6;

type PlanarFn = fn(&IterationPoint) -> (f64, f64);

/// Stateless 2D variation given by a formula on the pre-transform point.
#[derive(Clone, Debug)]
pub struct Planar {
    name: &'static str,
    f: PlanarFn,
    pass_z: bool,
}

impl Planar {
    pub fn new(name: &'static str, f: PlanarFn) -> Self {
        Self {
            name,
            f,
            pass_z: VariationStyle::default().passes_z_through(),
        }
    }
}

impl Variation for Planar {
    fn name(&self) -> &str {
        self.name
    }

    fn prepare(&mut self, ctx: &PrepareContext) {
        self.pass_z = ctx.style.passes_z_through();
    }

    fn calculate(&self, weight: f64, p: &mut IterationPoint) {
        let (x, y) = (self.f)(p);
        add_planar(p, weight, self.pass_z, x, y);
    }

    fn clone_box(&self) -> Box<dyn Variation> {
        Box::new(self.clone())
    }
}

fn add_planar(p: &mut IterationPoint, weight: f64, pass_z: bool, x: f64, y: f64) {
    p.post_x += weight * x;
    p.post_y += weight * y;
    if pass_z {
        p.post_z += weight * p.pre_z;
    }
}

fn linear(p: &IterationPoint) -> (f64, f64) {
    (p.pre_x, p.pre_y)
}

fn sinusoidal(p: &IterationPoint) -> (f64, f64) {
    (p.pre_x.sin(), p.pre_y.sin())
}

fn spherical(p: &IterationPoint) -> (f64, f64) {
    let r = 1.0 / (p.pre_sum_sq() + EPS);
    (p.pre_x * r, p.pre_y * r)
}

fn swirl(p: &IterationPoint) -> (f64, f64) {
    let (sin, cos) = p.pre_sum_sq().sin_cos();
    (sin * p.pre_x - cos * p.pre_y, cos * p.pre_x + sin * p.pre_y)
}

fn horseshoe(p: &IterationPoint) -> (f64, f64) {
    let r = 1.0 / (p.pre_length() + EPS);
    let (x, y) = (p.pre_x, p.pre_y);
    ((x - y) * (x + y) * r, 2.0 * x * y * r)
}

fn polar(p: &IterationPoint) -> (f64, f64) {
    (p.pre_atan_xy() / PI, p.pre_length() - 1.0)
}

fn heart(p: &IterationPoint) -> (f64, f64) {
    let r = p.pre_length();
    let (sin, cos) = (p.pre_atan_xy() * r).sin_cos();
    (r * sin, -r * cos)
}

fn disc(p: &IterationPoint) -> (f64, f64) {
    let a = p.pre_atan_xy() / PI;
    let (sin, cos) = (PI * p.pre_length()).sin_cos();
    (sin * a, cos * a)
}

/// `(sin θ, cos θ)` from the point itself plus the padded radius.
fn unit_angle(p: &IterationPoint) -> (f64, f64, f64) {
    let r = p.pre_length() + EPS;
    (p.pre_x / r, p.pre_y / r, r)
}

fn spiral(p: &IterationPoint) -> (f64, f64) {
    let (sin_a, cos_a, r) = unit_angle(p);
    ((cos_a + r.sin()) / r, (sin_a - r.cos()) / r)
}

fn hyperbolic(p: &IterationPoint) -> (f64, f64) {
    let (sin_a, cos_a, r) = unit_angle(p);
    (sin_a / r, cos_a * r)
}

fn diamond(p: &IterationPoint) -> (f64, f64) {
    let (sin_a, cos_a, r) = unit_angle(p);
    (sin_a * r.cos(), cos_a * r.sin())
}

fn bubble(p: &IterationPoint) -> (f64, f64) {
    let r = 4.0 / (p.pre_sum_sq() + 4.0);
    (p.pre_x * r, p.pre_y * r)
}

fn cylinder(p: &IterationPoint) -> (f64, f64) {
    (p.pre_x.sin(), p.pre_y)
}

/// Linear map on all three axes regardless of style.
#[derive(Clone, Debug, Default)]
pub struct Linear3D;

impl Variation for Linear3D {
    fn name(&self) -> &str {
        "linear3D"
    }

    fn prepare(&mut self, _ctx: &PrepareContext) {}

    fn calculate(&self, weight: f64, p: &mut IterationPoint) {
        p.post_x += weight * p.pre_x;
        p.post_y += weight * p.pre_y;
        p.post_z += weight * p.pre_z;
    }

    fn clone_box(&self) -> Box<dyn Variation> {
        Box::new(self.clone())
    }
}

/// Complex curl `z / (1 + c1·z + c2·z²)`.
#[derive(Clone, Debug, Default)]
pub struct Curl {
    c1: f64,
    c2: f64,
    pass_z: bool,
}

impl Variation for Curl {
    fn name(&self) -> &str {
        "curl"
    }

    fn variables(&self) -> &[&'static str] {
        &["curl_c1", "curl_c2"]
    }

    fn variable(&self, name: &str) -> Option<f64> {
        match name {
            "curl_c1" => Some(self.c1),
            "curl_c2" => Some(self.c2),
            _ => None,
        }
    }

    fn set_variable(&mut self, name: &str, value: f64) -> bool {
        match name {
            "curl_c1" => self.c1 = value,
            "curl_c2" => self.c2 = value,
            _ => return false,
        }
        true
    }

    fn prepare(&mut self, ctx: &PrepareContext) {
        self.pass_z = ctx.style.passes_z_through();
    }

    fn calculate(&self, weight: f64, p: &mut IterationPoint) {
        let (x, y) = (p.pre_x, p.pre_y);
        let re = 1.0 + self.c1 * x + self.c2 * (x * x - y * y);
        let im = self.c1 * y + 2.0 * self.c2 * x * y;
        let r = 1.0 / (re * re + im * im + EPS);
        add_planar(
            p,
            weight,
            self.pass_z,
            (x * re + y * im) * r,
            (y * re - x * im) * r,
        );
    }

    fn clone_box(&self) -> Box<dyn Variation> {
        Box::new(self.clone())
    }
}

/// Concentric rings with spacing `rings2_val²`.
#[derive(Clone, Debug)]
pub struct Rings2 {
    val: f64,
    pass_z: bool,
}

impl Default for Rings2 {
    fn default() -> Self {
        Self {
            val: 1.0,
            pass_z: false,
        }
    }
}

impl Variation for Rings2 {
    fn name(&self) -> &str {
        "rings2"
    }

    fn variables(&self) -> &[&'static str] {
        &["rings2_val"]
    }

    fn variable(&self, name: &str) -> Option<f64> {
        (name == "rings2_val").then_some(self.val)
    }

    fn set_variable(&mut self, name: &str, value: f64) -> bool {
        if name != "rings2_val" {
            return false;
        }
        self.val = value;
        true
    }

    fn prepare(&mut self, ctx: &PrepareContext) {
        self.pass_z = ctx.style.passes_z_through();
    }

    fn calculate(&self, weight: f64, p: &mut IterationPoint) {
        let (sin_a, cos_a, r) = unit_angle(p);
        let dx = self.val * self.val + EPS;
        let r = r - 2.0 * dx * ((r + dx) / (2.0 * dx)).trunc() + r * (1.0 - dx);
        add_planar(p, weight, self.pass_z, r * sin_a, r * cos_a);
    }

    fn clone_box(&self) -> Box<dyn Variation> {
        Box::new(self.clone())
    }
}

/// Peter de Jong attractor map.
#[derive(Clone, Debug, Default)]
pub struct Pdj {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    pass_z: bool,
}

impl Variation for Pdj {
    fn name(&self) -> &str {
        "pdj"
    }

    fn variables(&self) -> &[&'static str] {
        &["pdj_a", "pdj_b", "pdj_c", "pdj_d"]
    }

    fn variable(&self, name: &str) -> Option<f64> {
        match name {
            "pdj_a" => Some(self.a),
            "pdj_b" => Some(self.b),
            "pdj_c" => Some(self.c),
            "pdj_d" => Some(self.d),
            _ => None,
        }
    }

    fn set_variable(&mut self, name: &str, value: f64) -> bool {
        let slot = match name {
            "pdj_a" => &mut self.a,
            "pdj_b" => &mut self.b,
            "pdj_c" => &mut self.c,
            "pdj_d" => &mut self.d,
            _ => return false,
        };
        *slot = value;
        true
    }

    fn prepare(&mut self, ctx: &PrepareContext) {
        self.pass_z = ctx.style.passes_z_through();
    }

    fn calculate(&self, weight: f64, p: &mut IterationPoint) {
        let (x, y) = (p.pre_x, p.pre_y);
        add_planar(
            p,
            weight,
            self.pass_z,
            (self.a * y).sin() - (self.b * x).cos(),
            (self.c * x).sin() - (self.d * y).cos(),
        );
    }

    fn clone_box(&self) -> Box<dyn Variation> {
        Box::new(self.clone())
    }
}

/// Fan with explicit blade width and offset.
#[derive(Clone, Debug, Default)]
pub struct Fan2 {
    x: f64,
    y: f64,
    pass_z: bool,
}

impl Variation for Fan2 {
    fn name(&self) -> &str {
        "fan2"
    }

    fn variables(&self) -> &[&'static str] {
        &["fan2_x", "fan2_y"]
    }

    fn variable(&self, name: &str) -> Option<f64> {
        match name {
            "fan2_x" => Some(self.x),
            "fan2_y" => Some(self.y),
            _ => None,
        }
    }

    fn set_variable(&mut self, name: &str, value: f64) -> bool {
        match name {
            "fan2_x" => self.x = value,
            "fan2_y" => self.y = value,
            _ => return false,
        }
        true
    }

    fn prepare(&mut self, ctx: &PrepareContext) {
        self.pass_z = ctx.style.passes_z_through();
    }

    fn calculate(&self, weight: f64, p: &mut IterationPoint) {
        let theta = p.pre_atan_xy();
        let dx = PI * (self.x * self.x + EPS);
        let dx2 = dx / 2.0;
        let t = theta + self.y - dx * ((theta + self.y) / dx).trunc();
        let a = if t > dx2 { theta - dx2 } else { theta + dx2 };
        let r = p.pre_length();
        let (sin, cos) = a.sin_cos();
        add_planar(p, weight, self.pass_z, r * sin, r * cos);
    }

    fn clone_box(&self) -> Box<dyn Variation> {
        Box::new(self.clone())
    }
}

/// Rings whose spacing comes from the iterator's pre-affine x offset.
#[derive(Clone, Debug, Default)]
pub struct Rings {
    dx: f64,
    pass_z: bool,
}

impl Variation for Rings {
    fn name(&self) -> &str {
        "rings"
    }

    fn prepare(&mut self, ctx: &PrepareContext) {
        let [.., e, _] = affine::to_document_coefs(ctx.pre_affine);
        self.dx = e * e + EPS;
        self.pass_z = ctx.style.passes_z_through();
    }

    fn calculate(&self, weight: f64, p: &mut IterationPoint) {
        let (sin_a, cos_a, r) = unit_angle(p);
        let dx = if self.dx > 0.0 { self.dx } else { EPS };
        let r = (r + dx).rem_euclid(2.0 * dx) - dx + r * (1.0 - dx);
        add_planar(p, weight, self.pass_z, r * cos_a, r * sin_a);
    }

    fn clone_box(&self) -> Box<dyn Variation> {
        Box::new(self.clone())
    }
}

/// Fan whose blade geometry comes from the iterator's pre-affine offset.
#[derive(Clone, Debug, Default)]
pub struct Fan {
    dx: f64,
    dy: f64,
    pass_z: bool,
}

impl Variation for Fan {
    fn name(&self) -> &str {
        "fan"
    }

    fn prepare(&mut self, ctx: &PrepareContext) {
        let [.., e, f] = affine::to_document_coefs(ctx.pre_affine);
        self.dx = PI * (e * e + EPS);
        self.dy = f;
        self.pass_z = ctx.style.passes_z_through();
    }

    fn calculate(&self, weight: f64, p: &mut IterationPoint) {
        let dx = if self.dx > 0.0 { self.dx } else { PI * EPS };
        let dx2 = dx / 2.0;
        let mut a = p.pre_atan_xy();
        // truncating remainder: negative angles stay negative
        a += if (a + self.dy) % dx > dx2 {
            -dx2
        } else {
            dx2
        };
        let r = p.pre_length();
        let (sin, cos) = a.sin_cos();
        add_planar(p, weight, self.pass_z, r * cos, r * sin);
    }

    fn clone_box(&self) -> Box<dyn Variation> {
        Box::new(self.clone())
    }
}

const PLANAR: [(&str, PlanarFn); 12] = [
    ("sinusoidal", sinusoidal),
    ("spherical", spherical),
    ("swirl", swirl),
    ("horseshoe", horseshoe),
    ("polar", polar),
    ("heart", heart),
    ("disc", disc),
    ("spiral", spiral),
    ("hyperbolic", hyperbolic),
    ("diamond", diamond),
    ("bubble", bubble),
    ("cylinder", cylinder),
];

fn builtin<F>(registry: &mut VariationRegistry, factory: F)
where
    F: Fn() -> Box<dyn Variation> + Send + Sync + 'static,
{
    let registered = registry.register(factory);
    debug_assert!(registered.is_ok(), "built-in variation names collide");
}

/// Register every built-in kind, in enumeration order.
pub(crate) fn register_all(registry: &mut VariationRegistry) {
    builtin(registry, || Box::new(Planar::new("linear", linear)));
    builtin(registry, || Box::new(Linear3D));
    for (name, f) in PLANAR {
        builtin(registry, move || Box::new(Planar::new(name, f)));
    }
    builtin(registry, || Box::new(Curl::default()));
    builtin(registry, || Box::new(Rings2::default()));
    builtin(registry, || Box::new(Pdj::default()));
    builtin(registry, || Box::new(Fan2::default()));
    builtin(registry, || Box::new(Rings::default()));
    builtin(registry, || Box::new(Fan::default()));
}

#[cfg(test)]
#[path = "../../tests/unit/variation/builtin.rs"]
mod tests;
