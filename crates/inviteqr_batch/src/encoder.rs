//! QR raster encoder seam and its PNG implementation.

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};
use qrcode::{Color, QrCode};

use crate::spec::SpecQrRenderOptions;

/// Render a URL into PNG bytes.
///
/// Errors are plain text; the batch loop records them per item.
pub trait QrImageEncoder {
    fn encode_png(&self, c_url: &str) -> Result<Vec<u8>, String>;
}

/// `qrcode` symbol rasterized with `image`.
#[derive(Debug, Clone, Default)]
pub struct PngQrEncoder {
    options: SpecQrRenderOptions,
}

impl PngQrEncoder {
    /// Encoder drawing with `options`.
    pub fn new(options: SpecQrRenderOptions) -> Self {
        Self { options }
    }
}

impl QrImageEncoder for PngQrEncoder {
    fn encode_png(&self, c_url: &str) -> Result<Vec<u8>, String> {
        let code = QrCode::new(c_url.as_bytes()).map_err(|e| format!("QR encode failed: {e}"))?;
        let rgb_dark = parse_hex_color(&self.options.color_dark)?;
        let rgb_light = parse_hex_color(&self.options.color_light)?;

        let n_modules = code.width();
        let l_colors = code.to_colors();
        let n_width = self.options.width_px;
        let n_margin = self.options.margin_modules as usize;
        // The symbol plus quiet zone is stretched over the exact pixel width.
        let n_scale = f64::from(n_width) / (n_modules + 2 * n_margin) as f64;

        let mut img = RgbImage::from_pixel(n_width, n_width, Rgb(rgb_light));
        for n_py in 0..n_width {
            let Some(n_row) = derive_module_index(n_py, n_scale, n_margin, n_modules) else {
                continue;
            };
            for n_px in 0..n_width {
                let Some(n_col) = derive_module_index(n_px, n_scale, n_margin, n_modules) else {
                    continue;
                };
                if l_colors[n_row * n_modules + n_col] == Color::Dark {
                    img.put_pixel(n_px, n_py, Rgb(rgb_dark));
                }
            }
        }

        let mut v_png = Vec::new();
        img.write_to(&mut Cursor::new(&mut v_png), ImageFormat::Png)
            .map_err(|e| format!("PNG write failed: {e}"))?;
        Ok(v_png)
    }
}

/// Parse `#RRGGBB` into an RGB triple.
pub fn parse_hex_color(value: &str) -> Result<[u8; 3], String> {
    let c_hex = value
        .strip_prefix('#')
        .filter(|c_hex| c_hex.len() == 6 && c_hex.chars().all(|ch| ch.is_ascii_hexdigit()))
        .ok_or_else(|| format!("Invalid color (expected #RRGGBB): {value}"))?;

    let mut rgb = [0u8; 3];
    for (n_idx, channel) in rgb.iter_mut().enumerate() {
        *channel = u8::from_str_radix(&c_hex[n_idx * 2..n_idx * 2 + 2], 16)
            .map_err(|e| format!("Invalid color {value}: {e}"))?;
    }
    Ok(rgb)
}

fn derive_module_index(
    n_pixel: u32,
    n_scale: f64,
    n_margin: usize,
    n_modules: usize,
) -> Option<usize> {
    let n_cell = (f64::from(n_pixel) / n_scale).floor() as usize;
    n_cell
        .checked_sub(n_margin)
        .filter(|n_module| *n_module < n_modules)
}

#[cfg(test)]
mod tests {
    use super::*;

    const V_PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn encode_png_renders_exact_square() {
        let c_url = "https://invite-wedding.netlify.app/welcome.html?first=Jane&last=Doe";
        let v_png = PngQrEncoder::default().encode_png(c_url).expect("encode");

        assert_eq!(v_png[..8], V_PNG_SIGNATURE);
        let img = image::load_from_memory_with_format(&v_png, ImageFormat::Png)
            .expect("decode")
            .to_rgb8();
        assert_eq!(img.dimensions(), (200, 200));
        // Quiet zone corner stays light, finder pattern corner is dark.
        assert_eq!(img.get_pixel(0, 0), &Rgb([255, 255, 255]));
        let n_modules = QrCode::new(c_url).expect("code").width();
        let n_scale = 200.0 / (n_modules + 4) as f64;
        let n_finder = (2.5 * n_scale) as u32;
        assert_eq!(img.get_pixel(n_finder, n_finder), &Rgb([0, 0, 0]));
    }

    #[test]
    fn encode_png_honors_custom_options() {
        let encoder = PngQrEncoder::new(SpecQrRenderOptions {
            width_px: 64,
            margin_modules: 0,
            color_dark: "#102030".to_string(),
            color_light: "#ffeedd".to_string(),
        });
        let v_png = encoder.encode_png("x").expect("encode");
        let img = image::load_from_memory(&v_png).expect("decode").to_rgb8();
        assert_eq!(img.dimensions(), (64, 64));
        assert_eq!(img.get_pixel(0, 0), &Rgb([0x10, 0x20, 0x30]));
    }

    #[test]
    fn encode_png_reports_bad_color() {
        let encoder = PngQrEncoder::new(SpecQrRenderOptions {
            color_dark: "black".to_string(),
            ..SpecQrRenderOptions::default()
        });
        let err = encoder.encode_png("x").expect_err("bad color must fail");
        assert!(err.contains("#RRGGBB"));
    }

    #[test]
    fn encode_png_reports_oversized_payload() {
        let c_url = "a".repeat(8_000);
        let err = PngQrEncoder::default()
            .encode_png(&c_url)
            .expect_err("payload too long");
        assert!(err.starts_with("QR encode failed"));
    }

    #[test]
    fn parse_hex_color_accepts_only_rrggbb() {
        assert_eq!(parse_hex_color("#000000"), Ok([0, 0, 0]));
        assert_eq!(parse_hex_color("#FFfF00"), Ok([255, 255, 0]));
        assert!(parse_hex_color("000000").is_err());
        assert!(parse_hex_color("#FFF").is_err());
        assert!(parse_hex_color("#GGGGGG").is_err());
        assert!(parse_hex_color("#ééé").is_err());
    }
}
