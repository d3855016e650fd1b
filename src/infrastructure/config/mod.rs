//! 장비 설정 모듈.

mod loader;
mod types;

pub use loader::{JsonConfigRepository, config_paths};
pub use types::{DeviceConfig, ResolvedConfig};
