use image::RgbaImage;
use qrcode::{Color, QrCode};

use crate::{error::ServiceError, qr::types::QrOptions};

/// Encodes the content and rasterizes it to exactly `size x size` pixels.
pub fn render_code(options: &QrOptions) -> Result<RgbaImage, ServiceError> {
    let code = QrCode::with_error_correction_level(
        options.content.as_bytes(),
        options.error_correction.ec_level(),
    )?;
    rasterize(&code, options)
}

fn rasterize(code: &QrCode, options: &QrOptions) -> Result<RgbaImage, ServiceError> {
    let modules = code.width() as u32;
    let span = modules + 2 * options.margin;
    if options.size < span {
        return Err(ServiceError::MatrixTooLarge {
            required: span,
            size: options.size,
        });
    }

    let colors = code.to_colors();
    let scale = f64::from(options.size) / f64::from(span);
    let module_at = |px: u32| (f64::from(px) / scale).floor() as u32;

    let image = RgbaImage::from_fn(options.size, options.size, |x, y| {
        let (mx, my) = (module_at(x), module_at(y));
        let inside = options.margin..options.margin + modules;
        if !inside.contains(&mx) || !inside.contains(&my) {
            return options.light;
        }
        let index = ((my - options.margin) * modules + (mx - options.margin)) as usize;
        match colors[index] {
            Color::Dark => options.dark,
            Color::Light => options.light,
        }
    });

    Ok(image)
}
