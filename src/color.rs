// Simple color struct, built from a luminance value sampled out of an image
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const GRAY: Color = Color {
        r: 128,
        g: 128,
        b: 128,
        a: 0xff,
    };

    // Gray is clamped into 0..=255 and rounded, alpha is kept as sampled
    pub fn from_gray(gray: f64, alpha: u8) -> Color {
        let level = gray.max(0.0).min(255.0).round() as u8;
        Color {
            r: level,
            g: level,
            b: level,
            a: alpha,
        }
    }

    /// CSS fill style for a 2d canvas context. Alpha is normalized into 0..1.
    pub fn to_css(&self) -> String {
        let alpha = self.a as f64 / 255.0;
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_is_rounded_and_clamped() {
        assert_eq!(Color::from_gray(51.4, 10), Color { r: 51, g: 51, b: 51, a: 10 });
        assert_eq!(Color::from_gray(300.0, 0xff).r, 255);
        assert_eq!(Color::from_gray(-4.0, 0xff).r, 0);
    }

    #[test]
    fn css_uses_unit_alpha() {
        assert_eq!(Color::from_gray(200.0, 0xff).to_css(), "rgba(200, 200, 200, 1)");
        assert_eq!(Color::from_gray(0.0, 0).to_css(), "rgba(0, 0, 0, 0)");
    }
}
