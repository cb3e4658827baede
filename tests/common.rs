//!
//! 集成测试的通用辅助函数
//!
#![allow(dead_code)]

use num_bigint_dig::{BigInt, Sign};
use seal_primitives::{RandomEngine, RsaKeypair, Sha512};

/// 集成测试使用的素数字节数，模数约 256 位
pub const TEST_PRIME_BYTES: usize = 16;

/// 用固定标签播种一个可复现的引擎
pub fn setup_engine(label: &str) -> RandomEngine {
    RandomEngine::from_seed(label.as_bytes()).unwrap()
}

/// 直接生成一个小尺寸的测试密钥对
pub fn setup_keypair(label: &str) -> RsaKeypair {
    let mut engine = setup_engine(label);
    RsaKeypair::generate(&mut engine, TEST_PRIME_BYTES).unwrap()
}

/// 对消息做 SHA-512 摘要并约简到 `[0, n)`，作为待签名的消息摘要
pub fn hash_to_integer(message: &[u8], n: &BigInt) -> BigInt {
    let digest = Sha512::digest_of(message).unwrap();
    BigInt::from_bytes_be(Sign::Plus, digest.as_bytes()) % n
}
