use std::io::Cursor;

use image::{GrayImage, ImageReader, Luma, RgbaImage, imageops};

use crate::error::ServiceError;

/// Fraction of the code width covered by the icon.
pub const ICON_SCALE: f64 = 0.25;

pub fn icon_side(code_size: u32) -> u32 {
    (f64::from(code_size) * ICON_SCALE).floor() as u32
}

/// Decodes the upload and crops it to fill a `side x side` square.
pub fn resize_icon(data: &[u8], side: u32) -> Result<RgbaImage, ServiceError> {
    if side == 0 {
        return Err(ServiceError::IconTooSmall(side));
    }
    let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    let icon = reader.decode()?;
    Ok(icon
        .resize_to_fill(side, side, imageops::FilterType::Lanczos3)
        .to_rgba8())
}

/// Filled circle inscribed in a `side x side` square, with an anti-aliased edge.
pub fn circle_mask(side: u32) -> GrayImage {
    let radius = f64::from(side) / 2.0;
    GrayImage::from_fn(side, side, |x, y| {
        let dx = f64::from(x) + 0.5 - radius;
        let dy = f64::from(y) + 0.5 - radius;
        let coverage = (radius - dx.hypot(dy) + 0.5).clamp(0.0, 1.0);
        Luma([(coverage * 255.0).round() as u8])
    })
}

/// Destination-in: keeps icon pixels only where the mask is opaque.
pub fn cut_to_shape(icon: &mut RgbaImage, mask: &GrayImage) {
    for (pixel, coverage) in icon.pixels_mut().zip(mask.pixels()) {
        let alpha = u16::from(pixel[3]) * u16::from(coverage[0]) / 255;
        pixel[3] = alpha as u8;
    }
}

/// Places the icon at the visual center of the code.
pub fn overlay_center(code: &mut RgbaImage, icon: &RgbaImage) {
    let x = (i64::from(code.width()) - i64::from(icon.width())) / 2;
    let y = (i64::from(code.height()) - i64::from(icon.height())) / 2;
    imageops::overlay(code, icon, x, y);
}

/// Resize, mask to a circle and composite the icon onto the code.
pub fn apply_icon(code: &mut RgbaImage, data: &[u8]) -> Result<(), ServiceError> {
    let side = icon_side(code.width());
    let mut icon = resize_icon(data, side)?;
    let mask = circle_mask(icon.width());
    cut_to_shape(&mut icon, &mask);
    overlay_center(code, &icon);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};

    fn encoded_icon(width: u32, height: u32, color: Rgba<u8>) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, color);
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn icon_side_is_a_quarter_of_the_code() {
        assert_eq!(icon_side(512), 128);
        assert_eq!(icon_side(301), 75);
    }

    #[test]
    fn resize_crops_non_square_icons_to_a_square() {
        let data = encoded_icon(300, 100, Rgba([0, 0, 255, 255]));
        let icon = resize_icon(&data, 64).unwrap();
        assert_eq!(icon.dimensions(), (64, 64));
        assert!(icon.get_pixel(0, 0)[2] > 250);
        assert!(icon.get_pixel(63, 63)[3] > 250);
    }

    #[test]
    fn corrupt_icon_is_rejected() {
        let err = resize_icon(b"definitely not an image", 64).unwrap_err();
        assert!(matches!(err, ServiceError::Image(_)));
    }

    #[test]
    fn mask_is_opaque_in_the_middle_and_clear_in_the_corners() {
        let mask = circle_mask(100);
        assert_eq!(mask.dimensions(), (100, 100));
        assert_eq!(mask.get_pixel(50, 50)[0], 255);
        assert_eq!(mask.get_pixel(0, 0)[0], 0);
        assert_eq!(mask.get_pixel(99, 99)[0], 0);
        assert!(mask.get_pixel(0, 50)[0] > 200);
    }

    #[test]
    fn cut_to_shape_clears_pixels_outside_the_circle() {
        let mut icon = RgbaImage::from_pixel(40, 40, Rgba([255, 0, 0, 255]));
        cut_to_shape(&mut icon, &circle_mask(40));
        assert_eq!(*icon.get_pixel(20, 20), Rgba([255, 0, 0, 255]));
        assert_eq!(icon.get_pixel(0, 0)[3], 0);
        assert_eq!(icon.get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn apply_icon_only_touches_the_center() {
        let white = Rgba([255, 255, 255, 255]);
        let red = Rgba([255, 0, 0, 255]);
        let mut code = RgbaImage::from_pixel(200, 200, white);
        apply_icon(&mut code, &encoded_icon(10, 10, red)).unwrap();

        assert_eq!(code.dimensions(), (200, 200));
        let center = code.get_pixel(100, 100);
        assert!(center[0] > 250 && center[1] < 5 && center[2] < 5);
        // Corner of the icon's square lies outside the circle.
        assert_eq!(*code.get_pixel(75, 75), white);
        assert_eq!(*code.get_pixel(10, 10), white);
    }
}
