//!
//! # 通用配置模块
//!
//! 包含密钥生成所使用的参数：素数字节长度、Miller-Rabin 轮数，
//! 以及拒绝采样循环的可选迭代上限。
//!
use crate::common::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 生成参数配置
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PrimitivesConfig {
    /// 每个素数的字节数（256 字节即 2048 位素数，对应 4096 位模数）
    #[serde(default = "default_prime_bytes")]
    pub prime_bytes: usize,
    /// Miller-Rabin 见证轮数，轮数越少越快，但伪素数概率越高
    #[serde(default = "default_miller_rabin_rounds")]
    pub miller_rabin_rounds: usize,
    /// 单次素数搜索最多尝试的候选数，`None` 表示不限
    #[serde(default)]
    pub max_prime_candidates: Option<u64>,
    /// 寻找与 e 兼容的 (p, q) 时最多尝试的次数，`None` 表示不限
    #[serde(default)]
    pub max_keypair_attempts: Option<u64>,
}

fn default_prime_bytes() -> usize {
    256
}

fn default_miller_rabin_rounds() -> usize {
    64
}

impl Default for PrimitivesConfig {
    fn default() -> Self {
        Self {
            prime_bytes: default_prime_bytes(),
            miller_rabin_rounds: default_miller_rabin_rounds(),
            max_prime_candidates: None,
            max_keypair_attempts: None,
        }
    }
}

impl PrimitivesConfig {
    /// 检查配置取值是否合法
    pub fn validate(&self) -> Result<()> {
        if self.prime_bytes < 2 {
            return Err(Error::invalid_argument(format!(
                "prime_bytes must be at least 2, got {}",
                self.prime_bytes
            )));
        }
        if self.miller_rabin_rounds == 0 {
            return Err(Error::invalid_argument(
                "miller_rabin_rounds must be greater than 0",
            ));
        }
        Ok(())
    }

    /// 从 JSON 字符串解析并校验配置
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PrimitivesConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 JSON 文件加载并校验配置
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}
