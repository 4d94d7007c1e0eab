//! Canvas rendering for preview images.
//!
//! Produces the 1200x630 background, border band, and logo for one
//! descriptor and encodes it as PNG. Text rasterization happens in the
//! downstream preview layer, which reads the descriptor and the bundled
//! fonts.

use std::io::Cursor;

use image::{DynamicImage, RgbImage, imageops};

use super::OgError;
use super::options::{BorderSide, OgImageOptions, Rgb};

/// Canvas size shared by every preview image.
pub const CANVAS_WIDTH: u32 = 1200;
pub const CANVAS_HEIGHT: u32 = 630;

/// Render one descriptor onto a fresh canvas and encode it as PNG.
pub fn render_png(options: &OgImageOptions, logo_bytes: &[u8]) -> Result<Vec<u8>, OgError> {
    let mut canvas = RgbImage::new(CANVAS_WIDTH, CANVAS_HEIGHT);

    fill_gradient(&mut canvas, &options.bg_gradient);
    fill_border(&mut canvas, options);
    composite_logo(&mut canvas, options, logo_bytes)?;

    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(canvas)
        .write_to(&mut buf, image::ImageFormat::Png)
        .map_err(|e| OgError::Render(e.to_string()))?;
    Ok(buf.into_inner())
}

/// Fill the canvas with a vertical gradient across the stops. A single
/// stop is a solid fill.
fn fill_gradient(canvas: &mut RgbImage, stops: &[Rgb]) {
    let (width, height) = canvas.dimensions();
    let last_row = height.saturating_sub(1).max(1);
    for y in 0..height {
        let color = gradient_at(stops, f64::from(y) / f64::from(last_row));
        for x in 0..width {
            canvas.put_pixel(x, y, image::Rgb([color.0, color.1, color.2]));
        }
    }
}

fn gradient_at(stops: &[Rgb], t: f64) -> Rgb {
    match stops {
        [] => Rgb(255, 255, 255),
        [only] => *only,
        _ => {
            let span = (stops.len() - 1) as f64;
            let pos = t.clamp(0.0, 1.0) * span;
            let i = (pos.floor() as usize).min(stops.len() - 2);
            let frac = pos - i as f64;
            let (a, b) = (stops[i], stops[i + 1]);
            Rgb(
                lerp(a.0, b.0, frac),
                lerp(a.1, b.1, frac),
                lerp(a.2, b.2, frac),
            )
        }
    }
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
}

/// Paint the border band along its logical edge.
fn fill_border(canvas: &mut RgbImage, options: &OgImageOptions) {
    let (w, h) = canvas.dimensions();
    let band = options.border.width;
    let color = options.border.color;
    let pixel = image::Rgb([color.0, color.1, color.2]);

    let (xs, ys) = match options.border.side {
        BorderSide::InlineStart => (0..band.min(w), 0..h),
        BorderSide::InlineEnd => (w.saturating_sub(band)..w, 0..h),
        BorderSide::BlockStart => (0..w, 0..band.min(h)),
        BorderSide::BlockEnd => (0..w, h.saturating_sub(band)..h),
    };
    for x in xs {
        for y in ys.clone() {
            canvas.put_pixel(x, y, pixel);
        }
    }
}

fn composite_logo(
    canvas: &mut RgbImage,
    options: &OgImageOptions,
    logo_bytes: &[u8],
) -> Result<(), OgError> {
    let logo = image::load_from_memory(logo_bytes).map_err(|e| OgError::Logo {
        path: options.logo.path.clone(),
        reason: e.to_string(),
    })?;

    let [w, h] = options.logo.size;
    let resized = logo
        .resize_exact(w, h, imageops::FilterType::Lanczos3)
        .to_rgb8();

    let (x, y) = logo_origin(options);
    imageops::overlay(canvas, &resized, i64::from(x), i64::from(y));
    Ok(())
}

/// Padded origin for the logo, shifted past the border band when the
/// band shares its corner.
fn logo_origin(options: &OgImageOptions) -> (u32, u32) {
    let p = options.padding;
    let b = options.border.width;
    match options.border.side {
        BorderSide::InlineStart => (p + b, p),
        BorderSide::BlockStart => (p, p + b),
        BorderSide::InlineEnd | BorderSide::BlockEnd => (p, p),
    }
}
