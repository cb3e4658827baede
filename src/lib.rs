//! # Seal-Primitives: 从零实现的密码学原语
//!
//! `seal-primitives` 提供一组自包含的密码学原语：
//!
//! - **`Sha512`**: Merkle–Damgård 结构的 SHA-512 哈希引擎，支持流式输入。
//! - **`RandomEngine`**: 以 SHA-512 状态为链的密码学安全伪随机数生成器。
//! - **`PrimeGenerator`**: 拒绝采样 + Miller-Rabin 的随机素数生成。
//! - **`RsaKeypair`**: 教科书式 RSA 密钥生成、加解密与签名验证。
//!
//! 本库只输出原始整数与字节，不做任何填充方案或密钥序列化。
//! 日志通过 `log` 门面输出，由调用方决定是否接入具体的日志实现。
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use seal_primitives::{RandomEngine, RsaKeypair};
//! use num_bigint_dig::BigInt;
//!
//! fn main() -> seal_primitives::Result<()> {
//!     let mut engine = RandomEngine::from_entropy()?;
//!     let keypair = RsaKeypair::generate(&mut engine, 64)?;
//!
//!     let message = BigInt::from(42u32);
//!     let public_key = keypair.public_key();
//!     let ciphertext = public_key.encrypt(&message).expect("message is below N");
//!     assert_eq!(keypair.decrypt(&ciphertext), Some(message));
//!     Ok(())
//! }
//! ```

pub mod asymmetric;
pub mod common;
pub mod hash;
pub mod prime;
pub mod random;

pub use crate::asymmetric::{RsaKeypair, RsaPublicKey};
pub use crate::common::{Error, PrimitivesConfig, Result};
pub use crate::hash::{Digest, Sha512};
pub use crate::prime::{PrimeGenerator, generate_random_prime, is_probable_prime};
pub use crate::random::{ByteSink, RandomEngine};

#[cfg(feature = "parallel")]
pub use crate::asymmetric::generate_keypairs;

/// The version of the `seal-primitives` crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
