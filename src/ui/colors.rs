//! Board palette and color parsing.
//!
//! Line colors arrive as strings in configuration: any color ratatui can
//! parse (`"yellow"`, `"#eab308"`, `"214"`) or a CSS-style
//! `"hsl(44, 82%, 49%)"`.

use std::str::FromStr;

use owo_colors::Rgb;
use ratatui::style::Color;

/// 24-bit RGB palette for the board.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Default glyph color (245, 245, 245)
    pub foreground: Rgb,
    /// Flap face color (24, 24, 27)
    pub flap: Rgb,
    /// Hinge line between the flap halves (63, 63, 70)
    pub hinge: Rgb,
    /// Background grid dots (39, 39, 42)
    pub grid: Rgb,
    /// Muted/secondary text color - gray (107, 114, 128)
    pub muted: Rgb,
    /// Control key highlight - amber (234, 179, 8)
    pub accent: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            foreground: Rgb(245, 245, 245),
            flap: Rgb(24, 24, 27),
            hinge: Rgb(63, 63, 70),
            grid: Rgb(39, 39, 42),
            muted: Rgb(107, 114, 128),
            accent: Rgb(234, 179, 8),
        }
    }
}

impl Theme {
    /// Create a new theme with default colors.
    pub fn new() -> Self {
        Self::default()
    }

    /// A palette entry as a ratatui color.
    pub fn color(rgb: Rgb) -> Color {
        Color::Rgb(rgb.0, rgb.1, rgb.2)
    }
}

/// Parse a color string. Returns `None` when it is not recognised.
pub fn parse_color(input: &str) -> Option<Color> {
    let trimmed = input.trim();
    if let Some(args) = trimmed
        .strip_prefix("hsl(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_hsl(args);
    }
    Color::from_str(trimmed).ok()
}

fn parse_hsl(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let [h, s, l] = parts.as_slice() else {
        return None;
    };
    let hue: f64 = h.trim_end_matches("deg").parse().ok()?;
    let saturation: f64 = s.strip_suffix('%')?.parse().ok()?;
    let lightness: f64 = l.strip_suffix('%')?.parse().ok()?;
    if !(0.0..=100.0).contains(&saturation) || !(0.0..=100.0).contains(&lightness) {
        return None;
    }
    let (r, g, b) = hsl_to_rgb(hue, saturation / 100.0, lightness / 100.0);
    Some(Color::Rgb(r, g, b))
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (channel(r), channel(g), channel(b))
}

/// RGB components of a color, when it has fixed ones.
pub fn rgb_of(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        Color::Black => Some((0, 0, 0)),
        Color::Red => Some((205, 49, 49)),
        Color::Green => Some((13, 188, 121)),
        Color::Yellow => Some((229, 229, 16)),
        Color::Blue => Some((36, 114, 200)),
        Color::Magenta => Some((188, 63, 188)),
        Color::Cyan => Some((17, 168, 205)),
        Color::Gray => Some((229, 229, 229)),
        Color::DarkGray => Some((102, 102, 102)),
        Color::LightRed => Some((241, 76, 76)),
        Color::LightGreen => Some((35, 209, 139)),
        Color::LightYellow => Some((245, 245, 67)),
        Color::LightBlue => Some((59, 142, 234)),
        Color::LightMagenta => Some((214, 112, 214)),
        Color::LightCyan => Some((41, 184, 219)),
        Color::White => Some((255, 255, 255)),
        Color::Reset | Color::Indexed(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_and_hex() {
        assert_eq!(parse_color("yellow"), Some(Color::Yellow));
        assert_eq!(parse_color("#eab308"), Some(Color::Rgb(234, 179, 8)));
        assert_eq!(parse_color("not-a-color"), None);
    }

    #[test]
    fn test_parse_hsl() {
        assert_eq!(parse_color("hsl(0, 100%, 50%)"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_color("hsl(120, 100%, 50%)"), Some(Color::Rgb(0, 255, 0)));
        assert_eq!(parse_color("hsl(0, 0%, 100%)"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_color("hsl(44, 82%, 49%)"), Some(Color::Rgb(227, 173, 22)));
    }

    #[test]
    fn test_parse_hsl_rejects_malformed() {
        assert_eq!(parse_color("hsl(44, 82, 49%)"), None);
        assert_eq!(parse_color("hsl(44, 82%)"), None);
        assert_eq!(parse_color("hsl(44, 182%, 49%)"), None);
    }

    #[test]
    fn test_rgb_of() {
        assert_eq!(rgb_of(Color::Rgb(1, 2, 3)), Some((1, 2, 3)));
        assert_eq!(rgb_of(Color::Reset), None);
    }

    #[test]
    fn test_theme_color() {
        let theme = Theme::new();
        assert_eq!(Theme::color(theme.accent), Color::Rgb(234, 179, 8));
    }
}
