//! 浮点样本到 16 位有符号小端 PCM 的转换

use byteorder::{ByteOrder, LittleEndian};

use crate::tables::SBLIMIT;

/// 浮点样本转换为 i16: 乘以 32768 后四舍五入并饱和
#[inline]
pub fn to_s16(sample: f32) -> i16 {
    let scaled = (sample * 32768.0).round();
    scaled.clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

/// 交错 PCM 输出缓冲
///
/// 每次追加一个时隙 (每声道 32 个样本), 按 `L R L R ...` 交错写入.
#[derive(Debug, Default)]
pub struct PcmBuffer {
    data: Vec<u8>,
}

impl PcmBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个时隙, `channels` 中每项是一个声道的 32 个样本
    pub fn push_slot(&mut self, channels: &[&[f32; SBLIMIT]]) {
        let nch = channels.len();
        let start = self.data.len();
        self.data.resize(start + SBLIMIT * nch * 2, 0);
        let buf = &mut self.data[start..];

        for j in 0..SBLIMIT {
            for (ch, samples) in channels.iter().enumerate() {
                let pos = (j * nch + ch) * 2;
                LittleEndian::write_i16(&mut buf[pos..pos + 2], to_s16(samples[j]));
            }
        }
    }

    /// 已写入的字节数
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}
