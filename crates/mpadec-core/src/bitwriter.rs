//! 比特流写入器.
//!
//! 按大端位序 (MSB first) 向字节缓冲区写入数据, 与 [`BitReader`](crate::bitreader::BitReader) 对应.
//! 解码器本身不需要写入, 该工具用于测试和基准中构造合成的 MPEG 音频码流.

/// 比特流写入器
///
/// # 示例
/// ```
/// use mpadec_core::bitwriter::BitWriter;
///
/// let mut bw = BitWriter::new();
/// bw.write_bits(0xFFF, 12);
/// bw.write_bits(0b1101, 4);
/// assert_eq!(bw.finish(), vec![0xFF, 0xFD]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct BitWriter {
    /// 已完成的字节
    data: Vec<u8>,
    /// 尚未凑满一个字节的位累加器
    acc: u32,
    /// 累加器中的有效位数 (0-7)
    acc_bits: u32,
}

impl BitWriter {
    /// 创建新的比特流写入器
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取已写入的总位数
    pub fn bits_written(&self) -> usize {
        self.data.len() * 8 + self.acc_bits as usize
    }

    /// 写入 1 个位
    pub fn write_bit(&mut self, bit: bool) {
        self.write_bits(u32::from(bit), 1);
    }

    /// 写入 N 个位 (最多 32 位)
    ///
    /// 值的低 N 位被写入, 高位在前.
    pub fn write_bits(&mut self, value: u32, n: u32) {
        debug_assert!(n <= 32, "write_bits: n={} 超过 32 位", n);

        for i in (0..n).rev() {
            self.acc = (self.acc << 1) | ((value >> i) & 1);
            self.acc_bits += 1;
            if self.acc_bits == 8 {
                self.data.push(self.acc as u8);
                self.acc = 0;
                self.acc_bits = 0;
            }
        }
    }

    /// 写入完整字节
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        if self.acc_bits == 0 {
            self.data.extend_from_slice(bytes);
        } else {
            for &b in bytes {
                self.write_bits(u32::from(b), 8);
            }
        }
    }

    /// 对齐到字节边界 (用 0 填充)
    pub fn align_to_byte(&mut self) {
        if self.acc_bits > 0 {
            let pad = 8 - self.acc_bits;
            self.write_bits(0, pad);
        }
    }

    /// 完成写入, 返回字节数据
    ///
    /// 如果当前不在字节边界, 自动用 0 填充.
    pub fn finish(mut self) -> Vec<u8> {
        self.align_to_byte();
        self.data
    }
}
