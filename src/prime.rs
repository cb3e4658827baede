//! 随机素数生成
//!
//! 候选数来自哈希链引擎，Miller-Rabin 的见证数来自一个单独的 ChaCha8 生成器，
//! 该生成器每次搜索只从引擎取一次种子。

pub mod miller_rabin;

pub use self::miller_rabin::is_probable_prime;

use crate::common::config::PrimitivesConfig;
use crate::common::errors::{Error, Result};
use crate::random::RandomEngine;
use log::{debug, warn};
use num_bigint_dig::BigUint;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;

/// 默认的 Miller-Rabin 见证轮数
pub const DEFAULT_MILLER_RABIN_ROUNDS: usize = 64;

/// 素数生成器
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrimeGenerator {
    rounds: usize,
    max_candidates: Option<u64>,
}

impl Default for PrimeGenerator {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_MILLER_RABIN_ROUNDS,
            max_candidates: None,
        }
    }
}

impl PrimeGenerator {
    pub fn new(rounds: usize, max_candidates: Option<u64>) -> Result<Self> {
        if rounds == 0 {
            return Err(Error::invalid_argument(
                "Miller-Rabin rounds must be greater than 0",
            ));
        }
        Ok(Self {
            rounds,
            max_candidates,
        })
    }

    /// 按配置中的轮数和候选上限构建
    pub fn from_config(config: &PrimitivesConfig) -> Result<Self> {
        Self::new(config.miller_rabin_rounds, config.max_prime_candidates)
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn max_candidates(&self) -> Option<u64> {
        self.max_candidates
    }

    /// 生成一个 `num_bytes` 字节的随机（概率）素数。
    ///
    /// 候选数不强制最高位，结果可能比 `num_bytes * 8` 位短。
    pub fn generate(&self, num_bytes: usize, engine: &mut RandomEngine) -> Result<BigUint> {
        if num_bytes == 0 {
            return Err(Error::invalid_argument("prime length can't be 0 bytes"));
        }

        let mut witnesses = ChaCha8Rng::seed_from_u64(engine.next_u64()?);
        let mut candidates: u64 = 0;
        loop {
            if let Some(max) = self.max_candidates {
                if candidates >= max {
                    warn!(
                        "Prime search for {} bytes hit the cap of {} candidates",
                        num_bytes, max
                    );
                    return Err(Error::AttemptsExhausted {
                        operation: "prime search",
                        attempts: candidates,
                    });
                }
            }

            let candidate = engine.random_integer(num_bytes)?;
            candidates += 1;
            if is_probable_prime(&candidate, self.rounds, &mut witnesses) {
                debug!(
                    "Found {}-byte prime after {} candidates",
                    num_bytes, candidates
                );
                return Ok(candidate);
            }
        }
    }
}

/// 使用默认参数（64 轮、不限候选数）生成随机素数
pub fn generate_random_prime(num_bytes: usize, engine: &mut RandomEngine) -> Result<BigUint> {
    PrimeGenerator::default().generate(num_bytes, engine)
}
