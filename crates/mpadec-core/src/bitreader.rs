//! 比特流读取器.
//!
//! 从任意 `std::io::Read` 字节源中按位读取数据, 按大端位序 (MSB first).
//!
//! 与切片读取器不同, 本读取器只缓存一个前瞻字节: 当前字节的全部位被消费后,
//! 才会在下一次读取时从字节源拉取新字节. 因此恰好在流末尾结束的读取不会报错,
//! 只有真正越过最后一个字节的读取才会返回 [`MpaError::Eof`].

use std::io::{ErrorKind, Read};

use crate::{MpaError, MpaResult};

/// 比特流读取器
///
/// # 示例
/// ```
/// use mpadec_core::bitreader::BitReader;
///
/// let data: &[u8] = &[0b10110001, 0b01010101];
/// let mut br = BitReader::new(data);
/// assert_eq!(br.read_bits(4).unwrap(), 0b1011);
/// assert_eq!(br.read_bits(4).unwrap(), 0b0001);
/// assert_eq!(br.read_bits(8).unwrap(), 0b01010101);
/// assert!(br.read_bits(1).is_err());
/// ```
pub struct BitReader<R> {
    /// 字节源
    inner: R,
    /// 当前字节 (None 表示尚未拉取)
    current: Option<u8>,
    /// 当前字节中的位位置 (0-7, 0 表示最高位)
    bit_pos: u8,
    /// 已从字节源拉取的字节数
    bytes_pulled: u64,
}

impl<R: Read> BitReader<R> {
    /// 创建新的比特流读取器
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            current: None,
            bit_pos: 0,
            bytes_pulled: 0,
        }
    }

    /// 从字节源拉取一个字节, 源耗尽时返回 None
    fn pull(&mut self) -> MpaResult<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.bytes_pulled += 1;
                    return Ok(Some(buf[0]));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(MpaError::Io(e)),
            }
        }
    }

    /// 确保当前字节可用, 返回 None 表示字节源已耗尽
    fn fill(&mut self) -> MpaResult<Option<u8>> {
        if self.current.is_none() {
            self.current = self.pull()?;
        }
        Ok(self.current)
    }

    /// 读取 1 个位
    pub fn read_bit(&mut self) -> MpaResult<bool> {
        Ok(self.read_bits(1)? != 0)
    }

    /// 读取 N 个位 (最多 32 位)
    ///
    /// 按大端位序读取, 返回值的低 N 位有效.
    pub fn read_bits(&mut self, n: u32) -> MpaResult<u32> {
        if n > 32 {
            return Err(MpaError::InvalidArgument(format!(
                "read_bits: n={} 超过 32 位",
                n,
            )));
        }

        let mut result: u64 = 0;
        let mut remaining = n;

        while remaining > 0 {
            let byte = self.fill()?.ok_or(MpaError::Eof)?;
            let available = 8 - u32::from(self.bit_pos);
            let to_read = remaining.min(available);

            // 从当前字节中提取位
            let shift = available - to_read;
            let mask = (1u32 << to_read) - 1;
            let bits = (u32::from(byte) >> shift) & mask;

            result = (result << to_read) | u64::from(bits);

            self.bit_pos += to_read as u8;
            if self.bit_pos >= 8 {
                self.bit_pos = 0;
                self.current = None;
            }
            remaining -= to_read;
        }

        Ok(result as u32)
    }

    /// 跳过 N 个位
    pub fn skip_bits(&mut self, n: u32) -> MpaResult<()> {
        let mut remaining = n;
        while remaining > 0 {
            let chunk = remaining.min(32);
            self.read_bits(chunk)?;
            remaining -= chunk;
        }
        Ok(())
    }

    /// 是否位于字节边界
    pub fn is_byte_aligned(&self) -> bool {
        self.bit_pos == 0
    }

    /// 丢弃当前字节的剩余位, 对齐到下一个字节边界
    ///
    /// 如果当前已在字节边界, 则不做任何事.
    pub fn align_to_byte(&mut self) -> MpaResult<()> {
        if self.bit_pos > 0 {
            let rest = 8 - u32::from(self.bit_pos);
            self.read_bits(rest)?;
        }
        Ok(())
    }

    /// 在字节边界处窥视下一个字节 (不移动位置)
    ///
    /// 字节源耗尽时返回 `Ok(None)`, 这不是错误.
    pub fn peek_byte(&mut self) -> MpaResult<Option<u8>> {
        if !self.is_byte_aligned() {
            return Err(MpaError::InvalidArgument("peek_byte 需要字节对齐".into()));
        }
        self.fill()
    }

    /// 在字节边界处读取下一个完整字节
    ///
    /// 字节源耗尽时返回 `Ok(None)`, 这不是错误.
    pub fn next_byte(&mut self) -> MpaResult<Option<u8>> {
        let byte = self.peek_byte()?;
        self.current = None;
        Ok(byte)
    }

    /// 获取已从字节源拉取的字节数
    pub fn bytes_pulled(&self) -> u64 {
        self.bytes_pulled
    }
}
