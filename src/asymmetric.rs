//! 非对称密码模块：扩展欧几里得求逆与 RSA 密钥对

pub mod euclid;
pub mod rsa;

#[cfg(feature = "parallel")]
pub mod batch;

pub use self::euclid::find_private_exponent;
pub use self::rsa::{
    MIN_PRIME_BYTES, PUBLIC_EXPONENT, RsaKeypair, RsaPublicKey, SELF_TEST_VALUE,
};

#[cfg(feature = "parallel")]
pub use self::batch::generate_keypairs;
