//! 256-entry color table referenced by every flame.
//!
//! The core only needs a palette to be random-constructible, comparable,
//! copyable and exchangeable as condensed hex (`RRGGBB` per entry).

use crate::{
    foundation::{
        core::Rgb8,
        error::{FlameError, FlameResult},
        math::Rng64,
    },
    transform::linear::lerp,
    xml::XmlElement,
};

/// Number of entries in a palette.
pub const PALETTE_SIZE: usize = 256;

const COLORS_PER_LINE: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb8>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: vec![Rgb8::BLACK; PALETTE_SIZE],
        }
    }
}

impl Palette {
    pub fn from_colors(colors: Vec<Rgb8>) -> FlameResult<Self> {
        if colors.len() != PALETTE_SIZE {
            return Err(FlameError::validation(format!(
                "a palette needs exactly {PALETTE_SIZE} colors, got {}",
                colors.len()
            )));
        }
        Ok(Self { colors })
    }

    /// Smooth gradient through 3 to 7 random key colors.
    pub fn random(rng: &mut Rng64) -> Self {
        let keys: Vec<[f64; 3]> = (0..3 + rng.next_below(5))
            .map(|_| [rng.next_f64_01(), rng.next_f64_01(), rng.next_f64_01()])
            .collect();
        let segments = (keys.len() - 1) as f64;

        let colors = (0..PALETTE_SIZE)
            .map(|i| {
                let pos = i as f64 / (PALETTE_SIZE - 1) as f64 * segments;
                let k = (pos.floor() as usize).min(keys.len() - 2);
                let t = pos - k as f64;
                let (a, b) = (keys[k], keys[k + 1]);
                Rgb8::from_unit(lerp(a[0], b[0], t), lerp(a[1], b[1], t), lerp(a[2], b[2], t))
            })
            .collect();
        Self { colors }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn color(&self, index: usize) -> Option<Rgb8> {
        self.colors.get(index).copied()
    }

    pub fn colors(&self) -> &[Rgb8] {
        &self.colors
    }

    /// Color at a normalized position in `[0, 1]`.
    pub fn sample(&self, pos: f64) -> Rgb8 {
        let idx = (pos.clamp(0.0, 1.0) * (PALETTE_SIZE - 1) as f64).round() as usize;
        self.colors[idx]
    }

    /// Replace the contents from condensed hex data; whitespace is ignored.
    /// The palette is unchanged when the data is rejected.
    pub fn read_condensed_hex(&mut self, data: &str) -> FlameResult<()> {
        let digits: Vec<u8> = data
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        if digits.len() != PALETTE_SIZE * 6 {
            return Err(FlameError::format(format!(
                "palette data must hold {PALETTE_SIZE} colors ({} hex digits), got {} digits",
                PALETTE_SIZE * 6,
                digits.len()
            )));
        }

        let mut colors = Vec::with_capacity(PALETTE_SIZE);
        for chunk in digits.chunks_exact(6) {
            let channel = |i: usize| -> FlameResult<u8> {
                let hi = hex_value(chunk[i])?;
                let lo = hex_value(chunk[i + 1])?;
                Ok((hi << 4) | lo)
            };
            colors.push(Rgb8::new(channel(0)?, channel(2)?, channel(4)?));
        }
        self.colors = colors;
        Ok(())
    }

    pub fn from_condensed_hex(data: &str) -> FlameResult<Self> {
        let mut p = Self::default();
        p.read_condensed_hex(data)?;
        Ok(p)
    }

    /// Uppercase hex, eight colors per line.
    pub fn to_condensed_hex(&self) -> String {
        self.colors
            .chunks(COLORS_PER_LINE)
            .map(|line| {
                line.iter()
                    .map(|c| format!("{:02X}{:02X}{:02X}", c.r, c.g, c.b))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn write_xml(&self) -> XmlElement {
        let mut e = XmlElement::new("palette")
            .with_attr("count", PALETTE_SIZE.to_string())
            .with_attr("format", "RGB");
        e.set_text(format!("\n{}\n", self.to_condensed_hex()));
        e
    }
}

fn hex_value(b: u8) -> FlameResult<u8> {
    match b {
        b'0'..=b'9' => Ok(b - b'0'),
        b'a'..=b'f' => Ok(b - b'a' + 10),
        b'A'..=b'F' => Ok(b - b'A' + 10),
        _ => Err(FlameError::format(format!(
            "palette data contains non-hex character '{}'",
            b as char
        ))),
    }
}

#[cfg(test)]
#[path = "../tests/unit/palette.rs"]
mod tests;
