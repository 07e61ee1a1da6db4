//! 解码结果
//!
//! [`DecodedSound`] 持有整段交错 PCM (16 位有符号小端) 以及流参数.
//! 可以直接取字节, 作为 `Read` 反复读取, 或写成 WAV 文件.

use std::io::Write;
use std::time::Duration;

use byteorder::{LittleEndian, WriteBytesExt};
use bytes::{Buf, Bytes};
use log::debug;
use mpadec_core::{ChannelLayout, MpaError, MpaResult};

/// 输出样本位深
pub const BITS_PER_SAMPLE: u16 = 16;

/// WAV 音频格式码: PCM 整数
const WAV_FORMAT_PCM: u16 = 0x0001;
/// RIFF 头 + fmt 块 + data 块头的总长度
const WAV_HEADER_SIZE: u32 = 44;

/// PCM 数据格式描述
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    /// 采样率 (Hz)
    pub sample_rate: u32,
    /// 每样本位数, 固定为 16
    pub bits_per_sample: u16,
    /// 声道数
    pub channels: u16,
    /// 样本是否有符号, 固定为 true
    pub signed: bool,
    /// 是否大端, 固定为 false
    pub big_endian: bool,
}

impl AudioFormat {
    /// 每个采样帧 (所有声道各一个样本) 的字节数
    pub fn block_align(&self) -> u16 {
        self.channels * self.bits_per_sample / 8
    }

    /// 每秒字节数
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * u32::from(self.block_align())
    }
}

/// 解码完成的声音
#[derive(Debug, Clone)]
pub struct DecodedSound {
    data: Bytes,
    sample_rate: u32,
    layout: ChannelLayout,
    nb_samples: u64,
}

impl DecodedSound {
    pub(crate) fn new(data: Bytes, sample_rate: u32, layout: ChannelLayout, nb_samples: u64) -> Self {
        Self {
            data,
            sample_rate,
            layout,
            nb_samples,
        }
    }

    /// 交错 PCM 字节
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// 取出 PCM 字节 (零拷贝)
    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    /// 采样率 (Hz)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn is_stereo(&self) -> bool {
        self.layout.is_stereo()
    }

    pub fn channels(&self) -> u32 {
        self.layout.channels
    }

    pub fn channel_layout(&self) -> ChannelLayout {
        self.layout
    }

    /// 每声道样本数
    pub fn nb_samples(&self) -> u64 {
        self.nb_samples
    }

    /// 播放时长
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        let secs = self.nb_samples / u64::from(self.sample_rate);
        let rem = self.nb_samples % u64::from(self.sample_rate);
        let nanos = rem * 1_000_000_000 / u64::from(self.sample_rate);
        Duration::new(secs, nanos as u32)
    }

    /// PCM 数据格式
    pub fn audio_format(&self) -> AudioFormat {
        AudioFormat {
            sample_rate: self.sample_rate,
            bits_per_sample: BITS_PER_SAMPLE,
            channels: self.layout.channels as u16,
            signed: true,
            big_endian: false,
        }
    }

    /// 以 `Read` 方式读取 PCM 字节
    ///
    /// 每次调用都从头开始, 互不影响.
    pub fn reader(&self) -> bytes::buf::Reader<Bytes> {
        self.data.clone().reader()
    }

    /// 写出为 WAV 文件 (RIFF WAVE, PCM 16 位)
    pub fn write_wav<W: Write>(&self, mut writer: W) -> MpaResult<()> {
        let format = self.audio_format();
        let data_size = u32::try_from(self.data.len())
            .ok()
            .filter(|&n| n <= u32::MAX - (WAV_HEADER_SIZE - 8))
            .ok_or_else(|| {
                MpaError::InvalidArgument(format!(
                    "PCM 数据过大, 无法写入 WAV: {} 字节",
                    self.data.len()
                ))
            })?;

        // RIFF 头
        writer.write_all(b"RIFF")?;
        writer.write_u32::<LittleEndian>(WAV_HEADER_SIZE - 8 + data_size)?;
        writer.write_all(b"WAVE")?;

        // fmt 块
        writer.write_all(b"fmt ")?;
        writer.write_u32::<LittleEndian>(16)?;
        writer.write_u16::<LittleEndian>(WAV_FORMAT_PCM)?;
        writer.write_u16::<LittleEndian>(format.channels)?;
        writer.write_u32::<LittleEndian>(format.sample_rate)?;
        writer.write_u32::<LittleEndian>(format.byte_rate())?;
        writer.write_u16::<LittleEndian>(format.block_align())?;
        writer.write_u16::<LittleEndian>(format.bits_per_sample)?;

        // data 块
        writer.write_all(b"data")?;
        writer.write_u32::<LittleEndian>(data_size)?;
        writer.write_all(&self.data)?;
        writer.flush()?;

        debug!(
            "WAV 写入完成: {} Hz, {}, {} 字节 PCM",
            format.sample_rate, self.layout, data_size
        );
        Ok(())
    }
}
