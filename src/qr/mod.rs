mod color;
mod composer;
mod icon;
mod options;
mod render;
mod types;

pub use composer::compose;
pub use types::{
    ErrorCorrection, GenerationJob, GenerationRequest, GenerationResponse, Icon, QrOptions,
};
