//! 并行批量生成 RSA 密钥对
//!
//! 每个任务各自用系统熵源播种一个 `RandomEngine`，任务之间不共享任何生成器状态。

use crate::asymmetric::rsa::RsaKeypair;
use crate::common::config::PrimitivesConfig;
use crate::common::errors::Result;
use crate::random::RandomEngine;
use log::debug;
use rayon::prelude::*;

/// 并行生成 `count` 个密钥对，结果按任务顺序返回；任一任务失败则整体失败
pub fn generate_keypairs(count: usize, config: &PrimitivesConfig) -> Result<Vec<RsaKeypair>> {
    config.validate()?;
    debug!(
        "Generating {} RSA keypairs in parallel with {}-byte primes",
        count, config.prime_bytes
    );

    // 并行生成，随后按顺序收集
    let results: Vec<Result<RsaKeypair>> = (0..count)
        .into_par_iter()
        .map(|_| {
            let mut engine = RandomEngine::from_entropy()?;
            RsaKeypair::generate_with_config(&mut engine, config)
        })
        .collect();

    results.into_iter().collect()
}
