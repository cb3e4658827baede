//! `RsaKeypair` 实现教科书式 RSA：密钥生成、加解密与签名验证。
//!
//! 加解密、签名与验证都是纯函数，越界输入返回 `None` 或 `false`，不会报错；
//! 只有密钥生成与加载会返回 `Result`。

use crate::asymmetric::euclid::find_private_exponent;
use crate::common::config::PrimitivesConfig;
use crate::common::errors::{Error, Result};
use crate::prime::PrimeGenerator;
use crate::random::RandomEngine;
use log::{debug, trace, warn};
use num_bigint_dig::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed};
use zeroize::Zeroizing;

/// 固定的公钥指数
pub const PUBLIC_EXPONENT: u32 = 65537;
/// 每个素数最少的字节数
pub const MIN_PRIME_BYTES: usize = 2;
/// 自检时与 `N - 1` 一起使用的固定明文
pub const SELF_TEST_VALUE: u32 = 5;

/// RSA 公钥 (e, N)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaPublicKey {
    e: BigInt,
    n: BigInt,
}

impl RsaPublicKey {
    pub fn exponent(&self) -> &BigInt {
        &self.e
    }

    pub fn modulus(&self) -> &BigInt {
        &self.n
    }

    pub fn encrypt(&self, message: &BigInt) -> Option<BigInt> {
        RsaKeypair::encrypt(message, &self.e, &self.n)
    }

    pub fn verify(&self, message_hash: &BigInt, signature: &BigInt) -> bool {
        RsaKeypair::is_valid_signature(message_hash, signature, &self.e, &self.n)
    }
}

/// RSA 密钥对
///
/// 私钥指数在释放时清零，`Debug` 输出中不会出现。
#[derive(Clone)]
pub struct RsaKeypair {
    e: BigInt,
    d: Zeroizing<BigInt>,
    n: BigInt,
}

impl std::fmt::Debug for RsaKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaKeypair")
            .field("e", &self.e)
            .field("d", &"[REDACTED]")
            .field("n", &self.n)
            .finish()
    }
}

impl RsaKeypair {
    /// 生成密钥对，每个素数 `prime_bytes` 字节，其余参数取默认值
    pub fn generate(engine: &mut RandomEngine, prime_bytes: usize) -> Result<Self> {
        let config = PrimitivesConfig {
            prime_bytes,
            ..PrimitivesConfig::default()
        };
        Self::generate_with_config(engine, &config)
    }

    /// 按配置生成密钥对。
    ///
    /// 反复抽取 (p, q)，直到 e 与 N、PhiN 都互素且 e < PhiN；
    /// 求出 d 后对新密钥做一次自检。
    pub fn generate_with_config(
        engine: &mut RandomEngine,
        config: &PrimitivesConfig,
    ) -> Result<Self> {
        if config.prime_bytes < MIN_PRIME_BYTES {
            return Err(Error::invalid_argument(format!(
                "prime size must be at least {} bytes, got {}",
                MIN_PRIME_BYTES, config.prime_bytes
            )));
        }
        config.validate()?;
        let primes = PrimeGenerator::from_config(config)?;

        debug!(
            "Generating RSA keypair with {}-byte primes",
            config.prime_bytes
        );

        let e = BigInt::from(PUBLIC_EXPONENT);
        let one = BigInt::one();
        let mut attempts: u64 = 0;
        let (n, phi_n) = loop {
            if let Some(max) = config.max_keypair_attempts {
                if attempts >= max {
                    warn!("Keypair generation hit the cap of {} attempts", max);
                    return Err(Error::AttemptsExhausted {
                        operation: "keypair generation",
                        attempts,
                    });
                }
            }
            attempts += 1;

            let p = Zeroizing::new(BigInt::from(primes.generate(config.prime_bytes, engine)?));
            let mut q = Zeroizing::new(BigInt::from(primes.generate(config.prime_bytes, engine)?));
            while *q == *p {
                q = Zeroizing::new(BigInt::from(primes.generate(config.prime_bytes, engine)?));
            }

            let n = &*p * &*q;
            let phi_n = Zeroizing::new((&*p - &one) * (&*q - &one));
            if e.gcd(&n).is_one() && e.gcd(&phi_n).is_one() && e < *phi_n {
                break (n, phi_n);
            }
            trace!("Rejected prime pair on attempt {}", attempts);
        };

        let d = Zeroizing::new(find_private_exponent(&phi_n, &e)?);
        if !d.is_positive() {
            return Err(Error::logic("private exponent must be positive"));
        }

        let keypair = Self { e, d, n };
        keypair.self_test()?;
        debug!(
            "Generated {}-bit RSA keypair after {} attempts",
            keypair.n.bits(),
            attempts
        );
        Ok(keypair)
    }

    /// 由已有的 (e, d, N) 加载密钥对，不做自检
    pub fn from_components(e: BigInt, d: BigInt, n: BigInt) -> Result<Self> {
        let d = Zeroizing::new(d);
        if !Self::is_valid_public_key(&e, &n) {
            return Err(Error::invalid_argument(
                "public key needs e >= 2 and N >= 6",
            ));
        }
        if !d.is_positive() || *d >= n {
            return Err(Error::invalid_argument(
                "private exponent must satisfy 0 < d < N",
            ));
        }
        Ok(Self { e, d, n })
    }

    /// 用 `SELF_TEST_VALUE` 和 `N - 1` 各做一次加解密与签名验证往返
    pub fn self_test(&self) -> Result<()> {
        let samples = [BigInt::from(SELF_TEST_VALUE), &self.n - BigInt::one()];
        for value in samples.iter() {
            let ciphertext = Self::encrypt(value, &self.e, &self.n)
                .ok_or_else(|| Error::logic("self-test encryption was rejected"))?;
            let recovered = self
                .decrypt(&ciphertext)
                .ok_or_else(|| Error::logic("self-test decryption was rejected"))?;
            if &recovered != value {
                return Err(Error::logic("self-test decryption mismatch"));
            }

            let signature = self
                .sign(value)
                .ok_or_else(|| Error::logic("self-test signing was rejected"))?;
            if !Self::is_valid_signature(value, &signature, &self.e, &self.n) {
                return Err(Error::logic("self-test signature did not verify"));
            }
        }
        Ok(())
    }

    pub fn public_exponent(&self) -> &BigInt {
        &self.e
    }

    pub fn modulus(&self) -> &BigInt {
        &self.n
    }

    /// 私钥指数。调用方取得后自行负责其保密与擦除
    pub fn private_exponent(&self) -> &BigInt {
        &self.d
    }

    pub fn public_key(&self) -> RsaPublicKey {
        RsaPublicKey {
            e: self.e.clone(),
            n: self.n.clone(),
        }
    }

    /// 计算 `message^e mod N`。公钥无效或消息不在 `[0, N)` 内时返回 `None`
    pub fn encrypt(message: &BigInt, e: &BigInt, n: &BigInt) -> Option<BigInt> {
        if !Self::is_valid_public_key(e, n) || message.is_negative() || message >= n {
            return None;
        }
        Some(message.modpow(e, n))
    }

    /// 计算 `ciphertext^d mod N`。密文不在 `[0, N)` 内时返回 `None`
    pub fn decrypt(&self, ciphertext: &BigInt) -> Option<BigInt> {
        if ciphertext.is_negative() || ciphertext >= &self.n {
            return None;
        }
        Some(ciphertext.modpow(&self.d, &self.n))
    }

    /// 对消息摘要签名，运算与 `decrypt` 相同
    pub fn sign(&self, message_hash: &BigInt) -> Option<BigInt> {
        self.decrypt(message_hash)
    }

    pub fn is_valid_signature(
        message_hash: &BigInt,
        signature: &BigInt,
        e: &BigInt,
        n: &BigInt,
    ) -> bool {
        match Self::encrypt(signature, e, n) {
            Some(recovered) => &recovered == message_hash,
            None => false,
        }
    }

    pub fn is_valid_public_key(e: &BigInt, n: &BigInt) -> bool {
        e >= &BigInt::from(2u32) && n >= &BigInt::from(6u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 16 字节素数，模数约 256 位，足够测试且速度快
    const TEST_PRIME_BYTES: usize = 16;

    fn setup_keypair(seed: &[u8]) -> RsaKeypair {
        let mut engine = RandomEngine::from_seed(seed).unwrap();
        RsaKeypair::generate(&mut engine, TEST_PRIME_BYTES).unwrap()
    }

    fn textbook_keypair() -> RsaKeypair {
        RsaKeypair::from_components(
            BigInt::from(17u32),
            BigInt::from(2753u32),
            BigInt::from(3233u32),
        )
        .unwrap()
    }

    #[test]
    fn test_generated_keypair_shape() {
        let keypair = setup_keypair(b"shape");
        assert_eq!(keypair.public_exponent(), &BigInt::from(PUBLIC_EXPONENT));
        assert!(keypair.modulus().bits() <= TEST_PRIME_BYTES * 16);
        assert!(keypair.private_exponent().is_positive());
        assert!(keypair.private_exponent() < keypair.modulus());
        assert!(keypair.self_test().is_ok());
    }

    #[test]
    fn test_rsa_encryption_roundtrip() {
        let keypair = setup_keypair(b"roundtrip");
        let n = keypair.modulus().clone();
        let messages = [
            BigInt::from(0u32),
            BigInt::from(1u32),
            BigInt::from(42u32),
            &n - BigInt::one(),
        ];
        for m in messages.iter() {
            let c = RsaKeypair::encrypt(m, keypair.public_exponent(), &n).unwrap();
            assert_eq!(&keypair.decrypt(&c).unwrap(), m);
        }
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let keypair = setup_keypair(b"signature");
        let hash = BigInt::from(0x1234_5678u32);
        let signature = keypair.sign(&hash).unwrap();
        assert!(RsaKeypair::is_valid_signature(
            &hash,
            &signature,
            keypair.public_exponent(),
            keypair.modulus()
        ));
        assert!(keypair.public_key().verify(&hash, &signature));
    }

    #[test]
    fn test_verify_tampered_signature_fails() {
        let keypair = setup_keypair(b"tamper");
        let hash = BigInt::from(987_654_321u32);
        let signature = keypair.sign(&hash).unwrap();
        let public_key = keypair.public_key();
        assert!(public_key.verify(&hash, &signature));

        let top_bit = keypair.modulus().bits() - 1;
        for bit in [0usize, 1, 7, 64, top_bit - 1, top_bit] {
            let flip = BigInt::one() << bit;
            let tampered = &signature ^ &flip;
            assert_ne!(tampered, signature);
            assert!(
                !public_key.verify(&hash, &tampered),
                "flipping bit {} still verified",
                bit
            );

            let tampered_hash = &hash ^ &flip;
            assert!(!public_key.verify(&tampered_hash, &signature));
        }
    }

    #[test]
    fn test_out_of_range_inputs_are_rejected() {
        let keypair = setup_keypair(b"bounds");
        let e = keypair.public_exponent();
        let n = keypair.modulus();
        assert!(RsaKeypair::encrypt(n, e, n).is_none());
        assert!(RsaKeypair::encrypt(&BigInt::from(-1), e, n).is_none());
        assert!(keypair.decrypt(n).is_none());
        assert!(keypair.decrypt(&BigInt::from(-1)).is_none());
        assert!(keypair.sign(&(n + BigInt::one())).is_none());
        assert!(!RsaKeypair::is_valid_signature(
            &BigInt::from(5u32),
            &BigInt::from(-5),
            e,
            n
        ));
    }

    #[test]
    fn test_public_key_validity() {
        let valid = |e: u32, n: u32| {
            RsaKeypair::is_valid_public_key(&BigInt::from(e), &BigInt::from(n))
        };
        assert!(!valid(1, 100));
        assert!(!valid(3, 4));
        assert!(!valid(3, 5));
        assert!(valid(2, 6));
        assert!(valid(65537, 3233));
        assert!(
            RsaKeypair::encrypt(
                &BigInt::from(2u32),
                &BigInt::from(1u32),
                &BigInt::from(100u32)
            )
            .is_none()
        );
    }

    #[test]
    fn test_textbook_keypair() {
        let keypair = textbook_keypair();
        let c = keypair.public_key().encrypt(&BigInt::from(65u32)).unwrap();
        assert_eq!(c, BigInt::from(2790u32));
        assert_eq!(keypair.decrypt(&c).unwrap(), BigInt::from(65u32));
        assert!(keypair.self_test().is_ok());
    }

    #[test]
    fn test_from_components_rejects_bad_values() {
        let e = BigInt::from(17u32);
        let n = BigInt::from(3233u32);
        assert!(matches!(
            RsaKeypair::from_components(e.clone(), BigInt::from(0u32), n.clone()),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            RsaKeypair::from_components(e.clone(), n.clone(), n.clone()),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            RsaKeypair::from_components(BigInt::from(1u32), BigInt::from(2753u32), n),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_self_test_catches_wrong_private_exponent() {
        let keypair = RsaKeypair::from_components(
            BigInt::from(17u32),
            BigInt::from(2752u32),
            BigInt::from(3233u32),
        )
        .unwrap();
        assert!(matches!(keypair.self_test(), Err(Error::Logic(_))));
    }

    #[test]
    fn test_debug_redacts_private_exponent() {
        let keypair = textbook_keypair();
        let debug = format!("{:?}", keypair);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("2753"));
        assert!(debug.contains("3233"));
    }

    #[test]
    fn test_prime_size_too_small() {
        let mut engine = RandomEngine::from_seed(b"small").unwrap();
        for prime_bytes in [0usize, 1] {
            assert!(matches!(
                RsaKeypair::generate(&mut engine, prime_bytes),
                Err(Error::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_minimum_prime_size_works() {
        let mut engine = RandomEngine::from_seed(b"minimum").unwrap();
        let keypair = RsaKeypair::generate(&mut engine, MIN_PRIME_BYTES).unwrap();
        let m = BigInt::from(SELF_TEST_VALUE);
        let c = keypair.public_key().encrypt(&m).unwrap();
        assert_eq!(keypair.decrypt(&c).unwrap(), m);
    }

    #[test]
    fn test_same_seed_same_keypair() {
        let a = setup_keypair(b"deterministic keypair");
        let b = setup_keypair(b"deterministic keypair");
        assert_eq!(a.public_key(), b.public_key());
        assert_eq!(a.private_exponent(), b.private_exponent());
    }

    #[test]
    fn test_attempt_cap_is_enforced() {
        let mut engine = RandomEngine::from_seed(b"cap").unwrap();
        let config = PrimitivesConfig {
            prime_bytes: TEST_PRIME_BYTES,
            max_keypair_attempts: Some(0),
            ..PrimitivesConfig::default()
        };
        assert!(matches!(
            RsaKeypair::generate_with_config(&mut engine, &config),
            Err(Error::AttemptsExhausted {
                operation: "keypair generation",
                ..
            })
        ));
    }
}
