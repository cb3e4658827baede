//! 哈希引擎模块，提供 Merkle–Damgård 结构的 SHA-512 实现

pub mod sha512;

pub use self::sha512::{BLOCK_SIZE, DIGEST_SIZE, Digest, Sha512};
