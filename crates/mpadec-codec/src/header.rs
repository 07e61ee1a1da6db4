//! MPEG-1 音频帧头解析
//!
//! 同步字之后的 20 位帧头字段:
//!
//! ```text
//! ID(1) Layer(2) Protection(1) Bitrate(4) Samplerate(2) Padding(1) Private(1)
//! Mode(2) ModeExt(2) Copyright(1) Original(1) Emphasis(2)
//! ```
//!
//! Protection 位为 0 时随后跟 16 位 CRC, 该字段被读取并丢弃, 不做校验.
//!
//! 保留的比特率索引 (15) 和采样率索引 (3) 在解析时不报错, 对应字段为 `None`,
//! 由解码器决定该帧是否可用.

use std::io::Read;

use mpadec_core::bitreader::BitReader;
use mpadec_core::MpaResult;

use crate::tables::{BITRATE_LAYER1, BITRATE_LAYER2, BITRATE_LAYER3, SAMPLE_RATES, SBLIMIT};

/// MPEG 版本 (ID 位)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpegVersion {
    /// ID = 1
    Mpeg1,
    /// ID = 0, 低采样率扩展; 仍按 MPEG-1 表解码
    Mpeg2Lsf,
}

/// MPEG Layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpegLayer {
    Layer1,
    Layer2,
    Layer3,
    /// Layer 字段为 00
    Reserved,
}

impl MpegLayer {
    fn from_bits(bits: u32) -> Self {
        match bits {
            0b11 => Self::Layer1,
            0b10 => Self::Layer2,
            0b01 => Self::Layer3,
            _ => Self::Reserved,
        }
    }

    /// 本解码器是否支持该 Layer
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Layer1 | Self::Layer2)
    }
}

/// 声道模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    Stereo,
    /// 联合立体声 (Layer I/II 中为强度立体声)
    JointStereo,
    DualChannel,
    SingleChannel,
}

impl ChannelMode {
    fn from_bits(bits: u32) -> Self {
        match bits {
            0b00 => Self::Stereo,
            0b01 => Self::JointStereo,
            0b10 => Self::DualChannel,
            _ => Self::SingleChannel,
        }
    }
}

/// MPEG-1 音频帧头
///
/// 生命周期只有一帧, 每次迭代重新构建.
#[derive(Debug, Clone)]
pub struct FrameHeader {
    pub version: MpegVersion,
    pub layer: MpegLayer,
    /// 是否携带 16 位 CRC
    pub has_crc: bool,
    pub bitrate_index: u8,
    pub sample_rate_index: u8,
    pub padding: bool,
    pub private: bool,
    pub mode: ChannelMode,
    pub mode_extension: u8,
    pub copyright: bool,
    pub original: bool,
    pub emphasis: u8,

    /// 比特率 (kbps), 0 表示自由格式, 保留索引为 None
    pub bitrate: Option<u32>,
    /// 采样率 (Hz), 保留索引为 None
    pub sample_rate: Option<u32>,
}

impl FrameHeader {
    /// 从读取器解析帧头
    ///
    /// 调用前读取器必须刚好位于 12 位同步字之后. 若帧头声明了 CRC,
    /// 其 16 位也在这里被消费.
    pub fn parse<R: Read>(br: &mut BitReader<R>) -> MpaResult<Self> {
        let version = if br.read_bit()? {
            MpegVersion::Mpeg1
        } else {
            MpegVersion::Mpeg2Lsf
        };
        let layer = MpegLayer::from_bits(br.read_bits(2)?);
        let has_crc = !br.read_bit()?; // 0 表示有 CRC
        let bitrate_index = br.read_bits(4)? as u8;
        let sample_rate_index = br.read_bits(2)? as u8;
        let padding = br.read_bit()?;
        let private = br.read_bit()?;
        let mode = ChannelMode::from_bits(br.read_bits(2)?);
        let mode_extension = br.read_bits(2)? as u8;
        let copyright = br.read_bit()?;
        let original = br.read_bit()?;
        let emphasis = br.read_bits(2)? as u8;

        let sample_rate = SAMPLE_RATES.get(sample_rate_index as usize).copied();
        let bitrate = Self::lookup_bitrate(layer, bitrate_index);

        if has_crc {
            // 校验和只读取, 不验证
            br.skip_bits(16)?;
        }

        Ok(Self {
            version,
            layer,
            has_crc,
            bitrate_index,
            sample_rate_index,
            padding,
            private,
            mode,
            mode_extension,
            copyright,
            original,
            emphasis,
            bitrate,
            sample_rate,
        })
    }

    fn lookup_bitrate(layer: MpegLayer, index: u8) -> Option<u32> {
        let table = match layer {
            MpegLayer::Layer1 => &BITRATE_LAYER1,
            MpegLayer::Layer2 => &BITRATE_LAYER2,
            MpegLayer::Layer3 => &BITRATE_LAYER3,
            MpegLayer::Reserved => return None,
        };
        table.get(index as usize).copied()
    }

    /// 声道数: 单声道模式为 1, 其余为 2
    pub fn channels(&self) -> usize {
        if self.mode == ChannelMode::SingleChannel {
            1
        } else {
            2
        }
    }

    /// 强度立体声的起始子带 (bound)
    ///
    /// 低于 bound 的子带按声道独立编码, 之后的子带两声道共享样本.
    /// 非联合立体声模式返回 None, 即所有子带独立编码.
    pub fn bound(&self) -> Option<usize> {
        if self.mode == ChannelMode::JointStereo {
            Some(4 + 4 * self.mode_extension as usize)
        } else {
            None
        }
    }

    /// 独立编码的子带数, 不超过 `limit`
    pub fn independent_subbands(&self, limit: usize) -> usize {
        self.bound().unwrap_or(SBLIMIT).min(limit)
    }

    /// 每声道每帧输出的 PCM 样本数
    pub fn samples_per_frame(&self) -> usize {
        match self.layer {
            MpegLayer::Layer1 => 384,
            MpegLayer::Layer2 | MpegLayer::Layer3 => 1152,
            MpegLayer::Reserved => 0,
        }
    }
}
