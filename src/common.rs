//! 通用模块，包含错误处理、配置与工具函数

pub mod config;
pub mod errors;
pub mod utils;

pub use self::config::PrimitivesConfig;
pub use self::errors::{Error, Result};
pub use self::utils::SecureBytes;
