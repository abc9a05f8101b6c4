use std::str::FromStr;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Dashboard palettes
// ---------------------------------------------------------------------------

pub const SEGMENT_PALETTE: [&str; 3] = ["#BFC8AE", "#E2DBD3", "#F0D6CB"];
pub const RANKING_PALETTE: [&str; 5] = ["#B7B7A4", "#DDBEA9", "#CB997E", "#A5A58D", "#F0EFEB"];
pub const SALES_COLOR: &str = "#6b9080";
pub const PROFIT_COLOR: &str = "#98c1d9";

/// Parse a `#rrggbb` colour; unparseable input renders grey.
pub fn hex(code: &str) -> Color32 {
    match Srgb::<u8>::from_str(code) {
        Ok(rgb) => Color32::from_rgb(rgb.red, rgb.green, rgb.blue),
        Err(_) => {
            log::warn!("Invalid colour '{code}'");
            Color32::GRAY
        }
    }
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.45, 0.65);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Bar colours for `n` groups: the fixed palette while it lasts, generated
/// hues when a chart has more groups than the palette has entries.
pub fn bar_colors(palette: &[&str], n: usize) -> Vec<Color32> {
    if n <= palette.len() {
        palette.iter().take(n).map(|c| hex(c)).collect()
    } else {
        generate_palette(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_codes() {
        assert_eq!(hex("#6b9080"), Color32::from_rgb(0x6b, 0x90, 0x80));
        assert_eq!(hex("nonsense"), Color32::GRAY);
    }

    #[test]
    fn bar_colors_cover_every_group() {
        assert_eq!(bar_colors(&SEGMENT_PALETTE, 3)[0], hex("#BFC8AE"));
        assert_eq!(bar_colors(&RANKING_PALETTE, 10).len(), 10);
    }
}
