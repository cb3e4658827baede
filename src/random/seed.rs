//! 种子吸收接口
//!
//! 任意来源的种子材料（字节切片、大整数、字节迭代器）都经由同一个 `ByteSink`
//! 进入哈希链，而不是为每种来源各写一个构造函数。

use crate::common::errors::{Error, Result};
use crate::common::utils::SecureBytes;
use crate::hash::Sha512;
use num_bigint_dig::BigUint;

/// 可以逐段吸收字节的接收端
pub trait ByteSink {
    /// 吸收一段非空字节
    fn absorb(&mut self, bytes: &[u8]) -> Result<()>;
}

impl ByteSink for Sha512 {
    fn absorb(&mut self, bytes: &[u8]) -> Result<()> {
        self.update(bytes)
    }
}

/// 整段吸收字节切片，返回吸收的字节数
pub fn absorb_slice<S: ByteSink + ?Sized>(sink: &mut S, bytes: &[u8]) -> Result<usize> {
    if bytes.is_empty() {
        return Ok(0);
    }
    sink.absorb(bytes)?;
    Ok(bytes.len())
}

/// 以大端序导出整数后吸收。0 导出为单个 `0x00` 字节
pub fn absorb_integer<S: ByteSink + ?Sized>(sink: &mut S, value: &BigUint) -> Result<usize> {
    let bytes = SecureBytes::new(value.to_bytes_be());
    absorb_slice(sink, &bytes)
}

/// 逐字节吸收迭代器中的内容
pub fn absorb_iter<S, I>(sink: &mut S, bytes: I) -> Result<usize>
where
    S: ByteSink + ?Sized,
    I: IntoIterator<Item = u8>,
{
    let mut count = 0;
    for byte in bytes {
        sink.absorb(&[byte])?;
        count += 1;
    }
    Ok(count)
}

/// 确认至少吸收了一个字节，否则生成器将处于可预测的初始状态
pub(crate) fn ensure_absorbed(count: usize, source: &str) -> Result<()> {
    if count == 0 {
        return Err(Error::invalid_argument(format!(
            "seed from {} can't be empty",
            source
        )));
    }
    Ok(())
}
