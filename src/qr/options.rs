use crate::{
    config::AppConfig,
    error::ServiceError,
    qr::{
        color::{DEFAULT_DARK, DEFAULT_LIGHT, color_or_default},
        types::{ErrorCorrection, GenerationJob, GenerationRequest, QrOptions},
    },
};

pub const DEFAULT_SIZE: u32 = 512;
pub const MARGIN_MODULES: u32 = 1;

impl GenerationRequest {
    /// Fills every default and validates the request before any rendering.
    pub fn normalize(self, config: &AppConfig) -> Result<GenerationJob, ServiceError> {
        let content = match self.content {
            Some(content) if !content.is_empty() => content,
            _ => return Err(ServiceError::MissingContent),
        };

        let options = QrOptions {
            content,
            size: size_or_default(self.size.as_deref(), config.max_qr_size)?,
            error_correction: ErrorCorrection::parse_or_default(self.error_correction.as_deref()),
            dark: color_or_default(self.qr_color.as_deref(), DEFAULT_DARK)?,
            light: color_or_default(self.bg_color.as_deref(), DEFAULT_LIGHT)?,
            margin: MARGIN_MODULES,
        };

        Ok(GenerationJob {
            options,
            icon: self.icon,
        })
    }
}

/// Unparsable sizes fall back to the default; a valid size over `max` fails.
fn size_or_default(raw: Option<&str>, max: u32) -> Result<u32, ServiceError> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(DEFAULT_SIZE);
    };

    let parsed = raw
        .parse::<u32>()
        .ok()
        .or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 1.0 && *v <= f64::from(u32::MAX))
                .map(|v| v.trunc() as u32)
        })
        .filter(|&v| v > 0);

    match parsed {
        Some(size) if size <= max => Ok(size),
        Some(size) => Err(ServiceError::SizeTooLarge { size, max }),
        None => Ok(DEFAULT_SIZE),
    }
}
