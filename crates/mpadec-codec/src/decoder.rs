//! MPEG-1 音频流解码器
//!
//! 单遍顺序驱动整个流水线, 每帧依次经历:
//!
//! ```text
//! 同步 -> 帧头 -> Layer 解码 -> 合成 + PCM -> 字节对齐 -> 同步 ...
//! ```
//!
//! 同步失败 (字节源耗尽) 是唯一的正常结束路径. 帧内遇到输入结束视为截断,
//! 整个解码以 [`MpaError::Eof`](mpadec_core::MpaError::Eof) 失败.
//!
//! Layer III 与保留 Layer 的帧只记录警告, 不产生样本, 也不跳过其负载:
//! 之后的同步扫描会从帧头之后逐字节继续. 这类帧头的比特率和采样率字段不做检查.
//!
//! Layer I/II 帧头中的保留字段 (建立流参数时的采样率索引 3, Layer II 的比特率索引 15)
//! 使该同步候选被丢弃, 扫描同样从帧头之后继续, 解码不会因此中止.

use std::io::Read;

use bytes::Bytes;
use log::{debug, trace, warn};
use mpadec_core::bitreader::BitReader;
use mpadec_core::{ChannelLayout, MpaError, MpaResult};

use crate::header::{FrameHeader, MpegLayer};
use crate::layer1::decode_layer1;
use crate::layer2::decode_layer2;
use crate::pcm::PcmBuffer;
use crate::sound::DecodedSound;
use crate::subband::SubbandFrame;
use crate::synthesis::SynthContext;
use crate::sync::seek_sync;
use crate::tables::{SBLIMIT, select_alloc_table};

/// 由首个可解码帧确定的流参数
#[derive(Debug, Clone, Copy)]
struct StreamParams {
    sample_rate: u32,
    layout: ChannelLayout,
}

/// MPEG-1 Layer I/II 解码器
///
/// 一个实例解码一条流, 解码过程中持有合成滤波器状态和输出缓冲.
///
/// # 示例
/// ```no_run
/// use mpadec_codec::MpaDecoder;
///
/// let file = std::fs::File::open("test.mp2").unwrap();
/// let sound = MpaDecoder::new().decode_stream(file).unwrap();
/// ```
pub struct MpaDecoder {
    /// 每个输出声道一个合成器, 跨帧保持
    synth: [SynthContext; 2],
    /// 当前帧的子带样本
    subbands: Box<SubbandFrame>,
    /// 输出 PCM
    pcm: PcmBuffer,
    /// 流参数, 首个 Layer I/II 帧之前为 None
    params: Option<StreamParams>,
    /// 已解码的 Layer I/II 帧数
    frames_decoded: u64,
    /// 跳过的不支持帧数
    frames_skipped: u64,
    /// 因保留字段丢弃的同步候选数
    frames_dropped: u64,
    /// 每声道输出样本数
    nb_samples: u64,
    /// 上一个可解码帧的声道数
    last_frame_channels: usize,
}

impl Default for MpaDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MpaDecoder {
    /// 创建解码器
    pub fn new() -> Self {
        Self {
            synth: [SynthContext::new(), SynthContext::new()],
            subbands: Box::default(),
            pcm: PcmBuffer::new(),
            params: None,
            frames_decoded: 0,
            frames_skipped: 0,
            frames_dropped: 0,
            nb_samples: 0,
            last_frame_channels: 0,
        }
    }

    /// 解码整条流
    ///
    /// 未找到任何可解码帧时返回 `Ok(None)`.
    /// 调用方可以传入带缓冲的读取器; 解码器逐字节拉取数据.
    pub fn decode_stream<R: Read>(mut self, reader: R) -> MpaResult<Option<DecodedSound>> {
        let mut br = BitReader::new(reader);

        while seek_sync(&mut br)? {
            let header = FrameHeader::parse(&mut br)?;
            trace!(
                "帧 #{}: {:?} {:?}, {:?} kbps, {:?} Hz, {:?}, 偏移 {}",
                self.frames_decoded + self.frames_skipped + self.frames_dropped,
                header.version,
                header.layer,
                header.bitrate,
                header.sample_rate,
                header.mode,
                br.bytes_pulled(),
            );
            self.decode_frame(&mut br, &header)?;
            br.align_to_byte()?;
        }

        debug!(
            "MPEG 音频流结束: 解码 {} 帧, 跳过 {} 帧, 丢弃 {} 个候选, 每声道 {} 个样本, 输出 {} 字节, 读取 {} 字节",
            self.frames_decoded,
            self.frames_skipped,
            self.frames_dropped,
            self.nb_samples,
            self.pcm.len(),
            br.bytes_pulled()
        );
        Ok(self.finish())
    }

    /// 解码单帧负载
    fn decode_frame<R: Read>(&mut self, br: &mut BitReader<R>, header: &FrameHeader) -> MpaResult<()> {
        if !header.layer.is_supported() {
            if self.frames_skipped == 0 {
                warn!("不支持的 Layer: {:?}, 该帧及后续同类帧将被跳过", header.layer);
            }
            self.frames_skipped += 1;
            return Ok(());
        }

        // 采样率由首帧确定, 之后帧头中的采样率字段不再使用
        let sample_rate = match (self.params, header.sample_rate) {
            (Some(params), _) => params.sample_rate,
            (None, Some(rate)) => rate,
            (None, None) => {
                self.drop_candidate("保留的采样率索引", header.sample_rate_index, br.bytes_pulled());
                return Ok(());
            }
        };

        if header.layer == MpegLayer::Layer2 {
            let Some(bitrate) = header.bitrate else {
                self.drop_candidate("保留的比特率索引", header.bitrate_index, br.bytes_pulled());
                return Ok(());
            };
            let table = select_alloc_table(sample_rate, bitrate, header.channels() as u32);
            decode_layer2(br, header, table, &mut self.subbands)?;
        } else {
            decode_layer1(br, header, &mut self.subbands)?;
        }

        let params = self.stream_params(header, sample_rate)?;
        self.emit(params.layout.channels as usize);
        self.frames_decoded += 1;
        self.nb_samples += header.samples_per_frame() as u64;
        Ok(())
    }

    /// 丢弃无法解码的同步候选, 扫描从帧头之后继续
    fn drop_candidate(&mut self, reason: &str, index: u8, offset: u64) {
        debug!("丢弃同步候选: {} {}, 偏移 {}", reason, index, offset);
        self.frames_dropped += 1;
    }

    /// 获取流参数, 首个可解码帧时建立
    fn stream_params(&mut self, header: &FrameHeader, sample_rate: u32) -> MpaResult<StreamParams> {
        let frame_channels = header.channels();
        let previous = std::mem::replace(&mut self.last_frame_channels, frame_channels);

        if let Some(params) = self.params {
            if frame_channels != previous {
                warn!(
                    "声道模式变化: 流为 {}, 当前帧 {:?} ({} 声道)",
                    params.layout, header.mode, frame_channels
                );
            }
            if header.sample_rate.is_some_and(|rate| rate != params.sample_rate) {
                warn!(
                    "采样率变化被忽略: 流为 {} Hz, 当前帧索引 {}",
                    params.sample_rate, header.sample_rate_index
                );
            }
            return Ok(params);
        }

        let layout = ChannelLayout::from_channels(frame_channels as u32).ok_or_else(|| {
            MpaError::InvalidData(format!("不支持的声道数: {}", frame_channels))
        })?;
        let params = StreamParams {
            sample_rate,
            layout,
        };
        debug!(
            "MPEG 音频流参数: {:?}, {} Hz, {}, {:?} kbps",
            header.layer, params.sample_rate, params.layout, header.bitrate
        );
        self.params = Some(params);
        Ok(params)
    }

    /// 对当前帧的子带样本做合成并输出 PCM
    ///
    /// 单声道帧在立体声流中复制到两个声道, 立体声帧在单声道流中只输出第一个声道.
    fn emit(&mut self, out_channels: usize) {
        let active = self.subbands.channels().min(out_channels);
        let mut pcm = [[0.0f32; SBLIMIT]; 2];

        for slot in 0..self.subbands.slots() {
            for (ch, out) in pcm.iter_mut().enumerate().take(active) {
                self.synth[ch].synthesize(self.subbands.slot(ch, slot), out);
            }
            match (out_channels, active) {
                (1, _) => self.pcm.push_slot(&[&pcm[0]]),
                (_, 1) => self.pcm.push_slot(&[&pcm[0], &pcm[0]]),
                _ => self.pcm.push_slot(&[&pcm[0], &pcm[1]]),
            }
        }
    }

    fn finish(self) -> Option<DecodedSound> {
        if self.pcm.is_empty() {
            return None;
        }
        let params = self.params?;
        Some(DecodedSound::new(
            Bytes::from(self.pcm.into_vec()),
            params.sample_rate,
            params.layout,
            self.nb_samples,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpadec_core::bitwriter::BitWriter;

    /// 写入一个全静音的 Layer I 帧 (所有分配为 0)
    fn write_silent_layer1(bw: &mut BitWriter, mode: u32) {
        bw.write_bits(0xFFF, 12);
        bw.write_bits(1, 1);
        bw.write_bits(0b11, 2);
        bw.write_bits(1, 1);
        bw.write_bits(4, 4);
        bw.write_bits(0, 2);
        bw.write_bits(0, 2);
        bw.write_bits(mode, 2);
        bw.write_bits(0, 2);
        bw.write_bits(0, 4);
        let nch = if mode == 0b11 { 1 } else { 2 };
        for _ in 0..SBLIMIT * nch {
            bw.write_bits(0, 4);
        }
    }

    #[test]
    fn test_empty_input() {
        let empty: &[u8] = &[];
        assert!(MpaDecoder::new().decode_stream(empty).unwrap().is_none());
    }

    #[test]
    fn test_single_silent_frame() {
        let mut bw = BitWriter::new();
        write_silent_layer1(&mut bw, 0b11);
        let data = bw.finish();

        let sound = MpaDecoder::new()
            .decode_stream(data.as_slice())
            .unwrap()
            .unwrap();
        assert_eq!(sound.sample_rate(), 44100);
        assert!(!sound.is_stereo());
        assert_eq!(sound.nb_samples(), 384);
        assert_eq!(sound.data().len(), 768);
        assert!(sound.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_mono_frame_in_stereo_stream_is_duplicated() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut bw = BitWriter::new();
        write_silent_layer1(&mut bw, 0b00);
        write_silent_layer1(&mut bw, 0b11);
        let data = bw.finish();

        let sound = MpaDecoder::new()
            .decode_stream(data.as_slice())
            .unwrap()
            .unwrap();
        assert!(sound.is_stereo());
        assert_eq!(sound.nb_samples(), 768);
        assert_eq!(sound.data().len(), 768 * 4);
    }

    #[test]
    fn test_layer3_frame_is_skipped() {
        let mut bw = BitWriter::new();
        // Layer III 帧头, 无负载
        bw.write_bits(0xFFF, 12);
        bw.write_bits(0b1_01_1, 4);
        bw.write_bits(0b1001_00_0_0, 8);
        bw.write_bits(0b11_00_0000, 8);
        let data = bw.finish();

        assert!(MpaDecoder::new().decode_stream(data.as_slice()).unwrap().is_none());
    }

    #[test]
    fn test_truncated_frame_fails() {
        let mut bw = BitWriter::new();
        write_silent_layer1(&mut bw, 0b00);
        let mut data = bw.finish();
        data.truncate(data.len() - 4);

        let err = MpaDecoder::new().decode_stream(data.as_slice()).unwrap_err();
        assert!(err.is_eof());
    }
}
