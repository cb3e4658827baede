//! 基于 SHA-512 哈希链的密码学安全伪随机数生成器

use crate::common::errors::Result;
use crate::common::utils::SecureBytes;
use crate::hash::{DIGEST_SIZE, Digest, Sha512};
use crate::random::seed::{absorb_integer, absorb_iter, absorb_slice, ensure_absorbed};
use chrono::Utc;
use log::debug;
use num_bigint_dig::BigUint;
use rand_core::{OsRng, TryRngCore};
use zeroize::Zeroizing;

/// 种子缓冲区大小。
///
/// 链状态的可表示组合数：hash_values 2^512、message_block 2^1024、
/// bit_counter 2^128、填充计数 128 种，合计约 log2(2^1664 * 128) = 1671 位，
/// 向上取整为 208 字节。
pub const OPTIMAL_SEED_SIZE: usize = 208;

/// 哈希链随机数引擎
///
/// 内部状态是一个 `Sha512` 实例，种子只通过 `update` 吸收，从不原样保存。
/// 每个实例独占自己的状态，不要在多个任务间共享同一个引擎；
/// 并发生成密钥时应为每个任务单独用真随机数播种。
pub struct RandomEngine {
    state: Sha512,
}

impl std::fmt::Debug for RandomEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomEngine").finish_non_exhaustive()
    }
}

impl RandomEngine {
    pub const OPTIMAL_SEED_SIZE: usize = OPTIMAL_SEED_SIZE;

    /// 使用操作系统熵源与高精度时间戳播种。可能阻塞在系统熵源上
    pub fn from_entropy() -> Result<Self> {
        let seed = gather_entropy()?;
        debug!(
            "Seeding random engine with {} bytes of OS entropy",
            OPTIMAL_SEED_SIZE
        );
        Self::from_seed_array(&seed)
    }

    /// 使用调用方提供的字节作为种子
    pub fn from_seed(seed: &[u8]) -> Result<Self> {
        let mut state = Sha512::new();
        ensure_absorbed(absorb_slice(&mut state, seed)?, "byte slice")?;
        Ok(Self { state })
    }

    /// 使用最优长度的字节数组作为种子
    pub fn from_seed_array(seed: &[u8; OPTIMAL_SEED_SIZE]) -> Result<Self> {
        Self::from_seed(seed)
    }

    /// 使用大整数作为种子（大端序导出）
    pub fn from_integer(seed: &BigUint) -> Result<Self> {
        let mut state = Sha512::new();
        ensure_absorbed(absorb_integer(&mut state, seed)?, "integer")?;
        Ok(Self { state })
    }

    /// 逐字节吸收迭代器作为种子
    pub fn from_byte_iter<I: IntoIterator<Item = u8>>(seed: I) -> Result<Self> {
        let mut state = Sha512::new();
        ensure_absorbed(absorb_iter(&mut state, seed)?, "byte iterator")?;
        Ok(Self { state })
    }

    /// 生成一个 512 位的伪随机块。
    ///
    /// 链前进两次，返回两个相邻摘要的异或。单独返回任一摘要都会让调用方得到链的确切状态。
    pub fn generate_block(&mut self) -> Result<Digest> {
        let first = self.state.digest()?;
        self.state.update(first.as_bytes())?;
        let second = self.state.digest()?;
        self.state.update(second.as_bytes())?;
        Ok(first.xor(&second))
    }

    /// 生成恰好 `num_bytes` 个伪随机字节
    pub fn random_bytes(&mut self, num_bytes: usize) -> Result<SecureBytes> {
        let mut out = SecureBytes::with_capacity(num_bytes);
        while out.len() < num_bytes {
            let block = self.generate_block()?;
            let take = (num_bytes - out.len()).min(DIGEST_SIZE);
            out.extend_from_slice(&block.as_bytes()[..take]);
        }
        Ok(out)
    }

    /// 生成 `num_bytes` 字节的伪随机整数（大端序导入），`num_bytes == 0` 时为 0
    pub fn random_integer(&mut self, num_bytes: usize) -> Result<BigUint> {
        let bytes = self.random_bytes(num_bytes)?;
        Ok(BigUint::from_bytes_be(&bytes))
    }

    /// 取 8 个伪随机字节组成一个 `u64`
    pub fn next_u64(&mut self) -> Result<u64> {
        let bytes = self.random_bytes(8)?;
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&bytes);
        Ok(u64::from_be_bytes(buf))
    }
}

/// 收集真随机种子：系统熵源填满缓冲区，再把纳秒级时间戳异或进开头 8 个字节
fn gather_entropy() -> Result<Zeroizing<[u8; OPTIMAL_SEED_SIZE]>> {
    let mut seed = Zeroizing::new([0u8; OPTIMAL_SEED_SIZE]);
    OsRng.try_fill_bytes(&mut seed[..])?;

    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    for (byte, stamp) in seed.iter_mut().zip(nanos.to_ne_bytes()) {
        *byte ^= stamp;
    }
    Ok(seed)
}
