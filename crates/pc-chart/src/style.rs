//! Explicit chart styling and colour palettes.

use std::fmt;

use serde::Deserialize;

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    fn from_hex(hex: u32) -> Self {
        Self((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

const TAB10: [u32; 10] = [
    0x1f77b4, 0xff7f0e, 0x2ca02c, 0xd62728, 0x9467bd, 0x8c564b, 0xe377c2, 0x7f7f7f, 0xbcbd22,
    0x17becf,
];

const TAB20: [u32; 20] = [
    0x1f77b4, 0xaec7e8, 0xff7f0e, 0xffbb78, 0x2ca02c, 0x98df8a, 0xd62728, 0xff9896, 0x9467bd,
    0xc5b0d5, 0x8c564b, 0xc49c94, 0xe377c2, 0xf7b6d2, 0x7f7f7f, 0xc7c7c7, 0xbcbd22, 0xdbdb8d,
    0x17becf, 0x9edae5,
];

/// Colour scheme used for series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    /// tab10 up to 10 series, tab20 up to 20, jet beyond.
    #[default]
    Auto,
    /// The ten-colour categorical palette.
    Tab10,
    /// The twenty-colour categorical palette.
    Tab20,
    /// Continuous blue-cyan-yellow-red gradient.
    Jet,
}

impl Palette {
    /// `n` colours sampled evenly across the palette.
    pub fn colors(self, n: usize) -> Vec<Rgb> {
        let palette = match self {
            Self::Auto if n <= 10 => Self::Tab10,
            Self::Auto if n <= 20 => Self::Tab20,
            Self::Auto => Self::Jet,
            other => other,
        };
        (0..n)
            .map(|i| {
                let x = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
                palette.sample(x)
            })
            .collect()
    }

    /// Colour at position `x` in `[0, 1]`.
    fn sample(self, x: f64) -> Rgb {
        let listed = |colors: &[u32]| {
            let idx = ((x * colors.len() as f64) as usize).min(colors.len() - 1);
            Rgb::from_hex(colors[idx])
        };
        match self {
            Self::Tab10 | Self::Auto => listed(&TAB10),
            Self::Tab20 => listed(&TAB20),
            Self::Jet => jet(x),
        }
    }
}

fn jet(x: f64) -> Rgb {
    let channel = |offset: f64| {
        let v = (1.5 - (4.0 * x - offset).abs()).clamp(0.0, 1.0);
        (v * 255.0).round() as u8
    };
    Rgb(channel(3.0), channel(2.0), channel(1.0))
}

/// Styling passed explicitly to renderers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Series colours.
    pub palette: Palette,
    /// SVG canvas width in pixels.
    pub width: u32,
    /// SVG canvas height in pixels.
    pub height: u32,
    /// Bar width as a fraction of the slot width.
    pub bar_width: f64,
    /// Title font size.
    pub title_size: u32,
    /// Rotation of bar chart x labels in degrees.
    pub label_rotation: f64,
    /// Y axis label for bar charts.
    pub y_label: String,
    /// Width of terminal bars in character cells.
    pub terminal_width: usize,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            palette: Palette::Auto,
            width: 800,
            height: 600,
            bar_width: 0.35,
            title_size: 30,
            label_rotation: 30.0,
            y_label: "Word Count".into(),
            terminal_width: 40,
        }
    }
}

impl ChartStyle {
    /// Set the palette.
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Set the SVG canvas size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(200);
        self.height = height.max(150);
        self
    }

    /// Set the terminal bar width (at least 1 cell).
    pub fn with_terminal_width(mut self, width: usize) -> Self {
        self.terminal_width = width.max(1);
        self
    }

    /// Colours for `n` series.
    pub fn colors(&self, n: usize) -> Vec<Rgb> {
        self.palette.colors(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_style() {
        let style = ChartStyle::default();
        assert_eq!(style.bar_width, 0.35);
        assert_eq!(style.title_size, 30);
        assert_eq!(style.y_label, "Word Count");
    }

    #[test]
    fn auto_palette_thresholds() {
        assert_eq!(Palette::Auto.colors(10), Palette::Tab10.colors(10));
        assert_eq!(Palette::Auto.colors(11), Palette::Tab20.colors(11));
        assert_eq!(Palette::Auto.colors(21), Palette::Jet.colors(21));
    }

    #[test]
    fn sampling_spreads_across_palette() {
        let colors = Palette::Tab10.colors(2);
        assert_eq!(colors, vec![Rgb::from_hex(0x1f77b4), Rgb::from_hex(0x17becf)]);
        assert_eq!(Palette::Tab10.colors(1), vec![Rgb::from_hex(0x1f77b4)]);
        assert!(Palette::Auto.colors(0).is_empty());
    }

    #[test]
    fn jet_endpoints() {
        assert_eq!(jet(0.0), Rgb(0, 0, 128));
        assert_eq!(jet(1.0), Rgb(128, 0, 0));
        assert_eq!(jet(0.5), Rgb(128, 255, 128));
    }

    #[test]
    fn rgb_hex_display() {
        assert_eq!(Rgb(255, 127, 14).to_string(), "#ff7f0e");
    }

    #[test]
    fn style_from_toml() {
        let style: ChartStyle = toml::from_str("palette = \"jet\"\nwidth = 1024\n").unwrap();
        assert_eq!(style.palette, Palette::Jet);
        assert_eq!(style.width, 1024);
        assert_eq!(style.height, 600);
    }

    #[test]
    fn size_has_floor() {
        let style = ChartStyle::default().with_size(10, 10);
        assert_eq!((style.width, style.height), (200, 150));
    }
}
