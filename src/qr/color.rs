use image::Rgba;

use crate::error::ServiceError;

pub const DEFAULT_DARK: Rgba<u8> = Rgba([0x00, 0x00, 0x00, 0xff]);
pub const DEFAULT_LIGHT: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);

/// Parses `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`; a single leading `#` is optional.
pub fn parse_hex_color(raw: &str) -> Result<Rgba<u8>, ServiceError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

    let expanded = match digits.len() {
        3 | 4 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 | 8 => digits.to_string(),
        _ => return Err(ServiceError::InvalidColor(raw.to_string())),
    };

    let bytes = hex::decode(&expanded).map_err(|_| ServiceError::InvalidColor(raw.to_string()))?;
    let alpha = bytes.get(3).copied().unwrap_or(0xff);
    Ok(Rgba([bytes[0], bytes[1], bytes[2], alpha]))
}

/// Absent or blank values take the default; anything else must parse.
pub fn color_or_default(raw: Option<&str>, default: Rgba<u8>) -> Result<Rgba<u8>, ServiceError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(value) => parse_hex_color(value),
    }
}
