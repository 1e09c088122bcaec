use crate::foundation::{
    core::Point,
    error::{FlameError, FlameResult},
};

/// Closed polygon given by an ordered vertex ring; immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    /// Build a polygon from at least three vertices.
    pub fn new(vertices: impl IntoIterator<Item = Point>) -> FlameResult<Self> {
        let vertices: Vec<Point> = vertices.into_iter().collect();
        if vertices.len() < 3 {
            return Err(FlameError::validation(format!(
                "a polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        Ok(Self { vertices })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertex(&self, index: usize) -> Option<Point> {
        self.vertices.get(index).copied()
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Even-odd ray casting test.
    ///
    /// An edge counts as crossed when exactly one endpoint lies strictly above
    /// `p.y`, so a vertex shared by two edges is attributed to one of them.
    /// Points lying exactly on an edge may classify either way.
    pub fn is_on_surface(&self, p: Point) -> bool {
        let v = &self.vertices;
        let mut hit = false;
        let mut j = v.len() - 1;
        for i in 0..v.len() {
            let (a, b) = (v[i], v[j]);
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
                if p.x < x_cross {
                    hit = !hit;
                }
            }
            j = i;
        }
        hit
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/polygon.rs"]
mod tests;
