//! SHA-512 哈希引擎（FIPS 180-4）
//!
//! 消息按大端序逐字节打包进 16 个 64 位字组成的消息块；块一旦填满立即压缩。
//! `digest` 只在状态副本上完成填充与最终压缩，因此可以在任意时刻反复调用。

use crate::common::errors::{Error, Result};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// 摘要长度（字节）
pub const DIGEST_SIZE: usize = 64;
/// 消息块长度（字节）
pub const BLOCK_SIZE: usize = 128;

const BLOCK_WORDS: usize = BLOCK_SIZE / 8;
// 填充末尾的 128 位长度字段
const LENGTH_FIELD_BYTES: usize = 16;

type MessageBlock = [u64; BLOCK_WORDS];

const INITIAL_HASH_VALUES: [u64; 8] = [
    0x6a09e667f3bcc908,
    0xbb67ae8584caa73b,
    0x3c6ef372fe94f82b,
    0xa54ff53a5f1d36f1,
    0x510e527fade682d1,
    0x9b05688c2b3e6c1f,
    0x1f83d9abfb41bd6b,
    0x5be0cd19137e2179,
];

const ROUND_CONSTANTS: [u64; 80] = [
    0x428a2f98d728ae22, 0x7137449123ef65cd, 0xb5c0fbcfec4d3b2f, 0xe9b5dba58189dbbc,
    0x3956c25bf348b538, 0x59f111f1b605d019, 0x923f82a4af194f9b, 0xab1c5ed5da6d8118,
    0xd807aa98a3030242, 0x12835b0145706fbe, 0x243185be4ee4b28c, 0x550c7dc3d5ffb4e2,
    0x72be5d74f27b896f, 0x80deb1fe3b1696b1, 0x9bdc06a725c71235, 0xc19bf174cf692694,
    0xe49b69c19ef14ad2, 0xefbe4786384f25e3, 0x0fc19dc68b8cd5b5, 0x240ca1cc77ac9c65,
    0x2de92c6f592b0275, 0x4a7484aa6ea6e483, 0x5cb0a9dcbd41fbd4, 0x76f988da831153b5,
    0x983e5152ee66dfab, 0xa831c66d2db43210, 0xb00327c898fb213f, 0xbf597fc7beef0ee4,
    0xc6e00bf33da88fc2, 0xd5a79147930aa725, 0x06ca6351e003826f, 0x142929670a0e6e70,
    0x27b70a8546d22ffc, 0x2e1b21385c26c926, 0x4d2c6dfc5ac42aed, 0x53380d139d95b3df,
    0x650a73548baf63de, 0x766a0abb3c77b2a8, 0x81c2c92e47edaee6, 0x92722c851482353b,
    0xa2bfe8a14cf10364, 0xa81a664bbc423001, 0xc24b8b70d0f89791, 0xc76c51a30654be30,
    0xd192e819d6ef5218, 0xd69906245565a910, 0xf40e35855771202a, 0x106aa07032bbd1b8,
    0x19a4c116b8d2d0c8, 0x1e376c085141ab53, 0x2748774cdf8eeb99, 0x34b0bcb5e19b48a8,
    0x391c0cb3c5c95a63, 0x4ed8aa4ae3418acb, 0x5b9cca4f7763e373, 0x682e6ff3d6b2b8a3,
    0x748f82ee5defb2fc, 0x78a5636f43172f60, 0x84c87814a1f0ab72, 0x8cc702081a6439ec,
    0x90befffa23631e28, 0xa4506cebde82bde9, 0xbef9a3f7b2c67915, 0xc67178f2e372532b,
    0xca273eceea26619c, 0xd186b8c721c0c207, 0xeada7dd6cde0eb1e, 0xf57d4f7fee6ed178,
    0x06f067aa72176fba, 0x0a637dc5a2c898a6, 0x113f9804bef90dae, 0x1b710b35131c471b,
    0x28db77f523047d84, 0x32caab7b40c72493, 0x3c9ebe0a15c9bebc, 0x431d67c49c100d4c,
    0x4cc5d4becb3e42b6, 0x597f299cfc657e2a, 0x5fcb6fab3ad6faec, 0x6c44198c4a475817,
];

/// 64 字节的 SHA-512 摘要（大端序）
#[derive(Clone, PartialEq, Eq, Hash, Zeroize, ZeroizeOnDrop)]
pub struct Digest([u8; DIGEST_SIZE]);

impl Digest {
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    pub fn to_bytes(&self) -> [u8; DIGEST_SIZE] {
        self.0
    }

    /// 小写十六进制表示（128 个字符）
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// 逐字节异或两个摘要
    pub fn xor(&self, other: &Digest) -> Digest {
        let mut out = [0u8; DIGEST_SIZE];
        for (dst, (a, b)) in out.iter_mut().zip(self.0.iter().zip(other.0.iter())) {
            *dst = a ^ b;
        }
        Digest(out)
    }
}

impl From<[u8; DIGEST_SIZE]> for Digest {
    fn from(bytes: [u8; DIGEST_SIZE]) -> Self {
        Digest(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

/// SHA-512 流式哈希状态
///
/// 内部状态只能通过 `update` 修改、通过 `digest` 读取。
/// 随机数引擎把它当作哈希链使用，泄露原始字段会破坏前向安全性，所以字段全部私有。
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Sha512 {
    // 已完整压缩的所有消息块的累计哈希值
    hash_values: [u64; 8],
    // 尚未压缩的部分消息块，每个字内按大端序填充
    message_block: MessageBlock,
    // message_block 中已使用的字节数，始终处于 [0, 128)
    bytes_filled: usize,
    // 已追加的总位数
    bit_counter: u128,
}

impl Default for Sha512 {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Sha512 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sha512").finish_non_exhaustive()
    }
}

impl Sha512 {
    pub fn new() -> Self {
        Self {
            hash_values: INITIAL_HASH_VALUES,
            message_block: [0; BLOCK_WORDS],
            bytes_filled: 0,
            bit_counter: 0,
        }
    }

    /// 创建并立即吸收 `data`
    pub fn with_data(data: &[u8]) -> Result<Self> {
        let mut hasher = Self::new();
        hasher.update(data)?;
        Ok(hasher)
    }

    /// 一次性计算 `data` 的摘要，空输入同样合法
    pub fn digest_of(data: &[u8]) -> Result<Digest> {
        let mut hasher = Self::new();
        if !data.is_empty() {
            hasher.update(data)?;
        }
        hasher.digest()
    }

    /// 追加消息的下一部分。
    ///
    /// 内存占用恒定：块一填满就压缩进 `hash_values`。分多次调用与拼接后一次调用结果相同。
    pub fn update(&mut self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Err(Error::invalid_argument(
                "Sha512::update: data can't be empty",
            ));
        }
        if self.bytes_filled >= BLOCK_SIZE {
            return Err(Error::logic(format!(
                "Sha512::update: bytes_filled ({}) is out of range",
                self.bytes_filled
            )));
        }

        let mut remaining = data;
        while !remaining.is_empty() {
            let unfilled = BLOCK_SIZE - self.bytes_filled;
            let (chunk, rest) = remaining.split_at(unfilled.min(remaining.len()));
            copy_bytes_into_block(chunk, &mut self.message_block, self.bytes_filled)?;
            self.bytes_filled += chunk.len();
            remaining = rest;

            if self.bytes_filled == BLOCK_SIZE {
                compress(&self.message_block, &mut self.hash_values);
                self.bytes_filled = 0;
            }
        }

        // 字节数乘 8 得到位数
        self.bit_counter = self.bit_counter.wrapping_add((data.len() as u128) << 3);
        Ok(())
    }

    /// 返回到目前为止拼接数据的摘要，不修改内部状态。
    ///
    /// 填充步骤全部作用在 `message_block` 与 `hash_values` 的副本上。
    pub fn digest(&self) -> Result<Digest> {
        if self.bytes_filled > BLOCK_SIZE {
            return Err(Error::logic(format!(
                "Sha512::digest: bytes_filled ({}) is out of range",
                self.bytes_filled
            )));
        }

        let mut final_hash = self.hash_values;
        let mut block = self.message_block;
        let mut filled = self.bytes_filled;

        if filled == BLOCK_SIZE {
            // 终止位放不下，先压缩再换新块
            compress(&block, &mut final_hash);
            block = [0; BLOCK_WORDS];
            filled = 0;
        } else {
            zero_tail(&mut block, filled)?;
        }

        // 终止位位于第一个未填充字节的最高位
        block[filled / 8] |= 0x80u64 << ((7 - filled % 8) * 8);
        filled += 1;

        if BLOCK_SIZE - filled < LENGTH_FIELD_BYTES {
            compress(&block, &mut final_hash);
            block = [0; BLOCK_WORDS];
        }
        block[BLOCK_WORDS - 2] = (self.bit_counter >> 64) as u64;
        block[BLOCK_WORDS - 1] = self.bit_counter as u64;
        compress(&block, &mut final_hash);

        let mut out = [0u8; DIGEST_SIZE];
        for (chunk, word) in out.chunks_exact_mut(8).zip(final_hash.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }

        block.zeroize();
        final_hash.zeroize();
        Ok(Digest(out))
    }
}

/// 将 `bytes` 以大端序写入 `block`，从第 `offset` 个字节开始。
///
/// 目标范围之外的字节保持不变。例如 `bytes = [0x01, 0x02]`、`offset = 56`、
/// `block[7] = 0xffffffffffffffff` 时，`block[7]` 变为 `0x0102ffffffffffff`。
fn copy_bytes_into_block(bytes: &[u8], block: &mut MessageBlock, offset: usize) -> Result<()> {
    if offset >= BLOCK_SIZE {
        return Err(Error::logic(format!(
            "copy_bytes_into_block: offset {} is out of range [0, {})",
            offset, BLOCK_SIZE
        )));
    }
    if bytes.is_empty() {
        return Err(Error::logic("copy_bytes_into_block: bytes can't be empty"));
    }
    if bytes.len() > BLOCK_SIZE - offset {
        return Err(Error::logic(format!(
            "copy_bytes_into_block: {} bytes don't fit after offset {}",
            bytes.len(),
            offset
        )));
    }

    let mut index = offset;
    let mut rest = bytes;

    // 开头可能落在一个已部分使用的字中间
    while index % 8 != 0 && !rest.is_empty() {
        set_byte(&mut block[index / 8], index % 8, rest[0]);
        index += 1;
        rest = &rest[1..];
    }

    let mut words = rest.chunks_exact(8);
    for word in &mut words {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(word);
        block[index / 8] = u64::from_be_bytes(buf);
        index += 8;
    }
    for &byte in words.remainder() {
        set_byte(&mut block[index / 8], index % 8, byte);
        index += 1;
    }
    Ok(())
}

/// 设置字内第 `index_in_word` 个字节（0 为最高有效字节）
fn set_byte(word: &mut u64, index_in_word: usize, byte: u8) {
    let shift = (7 - index_in_word) * 8;
    *word = (*word & !(0xffu64 << shift)) | ((byte as u64) << shift);
}

/// 从第 `start` 个字节起把块的剩余部分清零
fn zero_tail(block: &mut MessageBlock, start: usize) -> Result<()> {
    if start >= BLOCK_SIZE {
        return Err(Error::logic(format!(
            "zero_tail: start {} is out of range [0, {})",
            start, BLOCK_SIZE
        )));
    }
    let junction = start / 8;
    let used_bytes = start % 8;
    if used_bytes == 0 {
        block[junction] = 0;
    } else {
        // 只保留交界字中已使用的高位字节
        block[junction] &= u64::MAX << (64 - used_bytes * 8);
    }
    block[junction + 1..].fill(0);
    Ok(())
}

#[inline]
fn lowercase_sigma0(x: u64) -> u64 {
    x.rotate_right(1) ^ x.rotate_right(8) ^ (x >> 7)
}

#[inline]
fn lowercase_sigma1(x: u64) -> u64 {
    x.rotate_right(19) ^ x.rotate_right(61) ^ (x >> 6)
}

#[inline]
fn uppercase_sigma0(x: u64) -> u64 {
    x.rotate_right(28) ^ x.rotate_right(34) ^ x.rotate_right(39)
}

#[inline]
fn uppercase_sigma1(x: u64) -> u64 {
    x.rotate_right(14) ^ x.rotate_right(18) ^ x.rotate_right(41)
}

#[inline]
fn choice(x: u64, y: u64, z: u64) -> u64 {
    (x & y) ^ (!x & z)
}

#[inline]
fn majority(x: u64, y: u64, z: u64) -> u64 {
    (x & y) ^ (x & z) ^ (y & z)
}

/// SHA-512 压缩函数：把一个完整消息块并入 `hash_values`
pub fn compress(block: &[u64; BLOCK_WORDS], hash_values: &mut [u64; 8]) {
    let mut schedule = [0u64; 80];
    schedule[..BLOCK_WORDS].copy_from_slice(block);
    for i in BLOCK_WORDS..80 {
        schedule[i] = lowercase_sigma1(schedule[i - 2])
            .wrapping_add(schedule[i - 7])
            .wrapping_add(lowercase_sigma0(schedule[i - 15]))
            .wrapping_add(schedule[i - 16]);
    }

    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *hash_values;
    for i in 0..80 {
        let t1 = h
            .wrapping_add(uppercase_sigma1(e))
            .wrapping_add(choice(e, f, g))
            .wrapping_add(ROUND_CONSTANTS[i])
            .wrapping_add(schedule[i]);
        let t2 = uppercase_sigma0(a).wrapping_add(majority(a, b, c));
        h = g;
        g = f;
        f = e;
        e = d.wrapping_add(t1);
        d = c;
        c = b;
        b = a;
        a = t1.wrapping_add(t2);
    }

    for (value, working) in hash_values.iter_mut().zip([a, b, c, d, e, f, g, h]) {
        *value = value.wrapping_add(working);
    }
    schedule.zeroize();
}
