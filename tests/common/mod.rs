//! 合成 MPEG-1 Layer I/II 码流的工具
//!
//! 按码流语法写出帧头、比特分配、比例因子和样本, 内容由固定种子的伪随机数决定.

#![allow(dead_code)]

use mpadec::codec::tables::{BITRATE_LAYER2, SAMPLE_RATES, SBLIMIT, select_alloc_table};
use mpadec::core::bitwriter::BitWriter;

/// 声道模式字段
pub const MODE_STEREO: u32 = 0b00;
pub const MODE_JOINT: u32 = 0b01;
pub const MODE_DUAL: u32 = 0b10;
pub const MODE_MONO: u32 = 0b11;

/// 线性同余伪随机数
pub struct Lcg(u32);

impl Lcg {
    pub fn new(seed: u32) -> Self {
        Self(seed)
    }

    /// 取 n 位随机值
    pub fn bits(&mut self, n: u32) -> u32 {
        self.0 = self.0.wrapping_mul(1_103_515_245).wrapping_add(12345);
        if n == 0 { 0 } else { (self.0 >> 8) & ((1u32 << n) - 1) }
    }

    /// 温和的比例因子索引 (8..28)
    pub fn scale_index(&mut self) -> u32 {
        8 + self.bits(5) % 20
    }
}

/// 帧参数
#[derive(Debug, Clone, Copy)]
pub struct FrameSpec {
    pub mode: u32,
    pub mode_extension: u32,
    pub bitrate_index: u32,
    pub sample_rate_index: u32,
    pub crc: bool,
}

impl FrameSpec {
    pub fn new(mode: u32) -> Self {
        Self {
            mode,
            mode_extension: 0,
            bitrate_index: 4,
            sample_rate_index: 0,
            crc: false,
        }
    }

    pub fn channels(&self) -> usize {
        if self.mode == MODE_MONO { 1 } else { 2 }
    }

    pub fn bound(&self, limit: usize) -> usize {
        let bound = if self.mode == MODE_JOINT {
            4 + 4 * self.mode_extension as usize
        } else {
            SBLIMIT
        };
        bound.min(limit)
    }
}

/// 写入同步字与帧头, `layer` 为帧头中的 2 位 Layer 字段
pub fn write_header(bw: &mut BitWriter, layer: u32, spec: &FrameSpec) {
    bw.write_bits(0xFFF, 12);
    bw.write_bits(1, 1);
    bw.write_bits(layer, 2);
    bw.write_bits(u32::from(!spec.crc), 1);
    bw.write_bits(spec.bitrate_index, 4);
    bw.write_bits(spec.sample_rate_index, 2);
    bw.write_bits(0, 1);
    bw.write_bits(0, 1);
    bw.write_bits(spec.mode, 2);
    bw.write_bits(spec.mode_extension, 2);
    bw.write_bits(0, 1);
    bw.write_bits(1, 1);
    bw.write_bits(0, 2);
    if spec.crc {
        bw.write_bits(0x1234, 16);
    }
}

/// 写入一个 Layer I 帧
pub fn write_layer1_frame(bw: &mut BitWriter, spec: &FrameSpec, rng: &mut Lcg) {
    write_header(bw, 0b11, spec);
    let nch = spec.channels();
    let bound = spec.bound(SBLIMIT);

    let mut allocation = [[0u32; SBLIMIT]; 2];
    for sb in 0..SBLIMIT {
        let channels = if sb < bound { nch } else { 1 };
        for ch in 0..channels {
            let value = if sb < 12 { rng.bits(4) % 15 } else { 0 };
            bw.write_bits(value, 4);
            allocation[ch][sb] = value;
        }
        if sb >= bound {
            allocation[1][sb] = allocation[0][sb];
        }
    }

    for sb in 0..SBLIMIT {
        for alloc in allocation.iter().take(nch) {
            if alloc[sb] != 0 {
                bw.write_bits(rng.scale_index(), 6);
            }
        }
    }

    for _ in 0..12 {
        for sb in 0..SBLIMIT {
            let channels = if sb < bound { nch } else { 1 };
            for alloc in allocation.iter().take(channels) {
                let n = alloc[sb];
                if n != 0 {
                    bw.write_bits(rng.bits(n + 1), n + 1);
                }
            }
        }
    }
    bw.align_to_byte();
}

/// 写入一个 Layer II 帧
pub fn write_layer2_frame(bw: &mut BitWriter, spec: &FrameSpec, rng: &mut Lcg) {
    write_layer2_frame_for_rate(bw, spec, spec.sample_rate_index, rng);
}

/// 写入一个 Layer II 帧, 比特分配表按 `table_rate_index` 对应的采样率选择,
/// 与帧头中的采样率字段无关
pub fn write_layer2_frame_for_rate(
    bw: &mut BitWriter,
    spec: &FrameSpec,
    table_rate_index: u32,
    rng: &mut Lcg,
) {
    write_header(bw, 0b10, spec);
    let nch = spec.channels();
    let bitrate = BITRATE_LAYER2[spec.bitrate_index as usize];
    let sample_rate = SAMPLE_RATES[table_rate_index as usize];
    let table = select_alloc_table(sample_rate, bitrate, nch as u32);
    let sblimit = table.sblimit;
    let bound = spec.bound(sblimit);

    let mut allocation = [[0u32; SBLIMIT]; 2];
    for sb in 0..sblimit {
        let nbal = table.nbal(sb);
        let channels = if sb < bound { nch } else { 1 };
        for ch in 0..channels {
            let value = if sb < 10 { rng.bits(nbal) } else { 0 };
            bw.write_bits(value, nbal);
            allocation[ch][sb] = value;
        }
        if sb >= bound {
            allocation[1][sb] = allocation[0][sb];
        }
    }

    let mut scfsi = [[0u32; SBLIMIT]; 2];
    for sb in 0..sblimit {
        for ch in 0..nch {
            if allocation[ch][sb] != 0 {
                scfsi[ch][sb] = rng.bits(2);
                bw.write_bits(scfsi[ch][sb], 2);
            }
        }
    }

    for sb in 0..sblimit {
        for ch in 0..nch {
            if allocation[ch][sb] != 0 {
                let count = match scfsi[ch][sb] {
                    0 => 3,
                    2 => 1,
                    _ => 2,
                };
                for _ in 0..count {
                    bw.write_bits(rng.scale_index(), 6);
                }
            }
        }
    }

    for _ in 0..12 {
        for sb in 0..sblimit {
            let channels = if sb < bound { nch } else { 1 };
            for alloc in allocation.iter().take(channels) {
                let n = alloc[sb];
                if n == 0 {
                    continue;
                }
                let class = table.quant_class(sb, n);
                if class.grouped {
                    let levels = class.levels;
                    let mut code = 0;
                    for _ in 0..3 {
                        code = code * levels + rng.bits(16) % levels;
                    }
                    bw.write_bits(code, class.bits);
                } else {
                    for _ in 0..3 {
                        bw.write_bits(rng.bits(16) % class.levels, class.bits);
                    }
                }
            }
        }
    }
    bw.align_to_byte();
}

/// 写入一个满幅 Layer I 单声道帧: 所有子带最大分配、最大比例因子、最大码字
pub fn write_loud_layer1_frame(bw: &mut BitWriter) {
    let spec = FrameSpec::new(MODE_MONO);
    write_header(bw, 0b11, &spec);
    for _ in 0..SBLIMIT {
        bw.write_bits(14, 4);
    }
    for _ in 0..SBLIMIT {
        bw.write_bits(0, 6);
    }
    for _ in 0..12 * SBLIMIT {
        bw.write_bits(0x7FFF, 15);
    }
    bw.align_to_byte();
}

/// 写入一个只有帧头的 Layer III 帧
pub fn write_layer3_header(bw: &mut BitWriter, mode: u32) {
    let mut spec = FrameSpec::new(mode);
    spec.bitrate_index = 9;
    write_header(bw, 0b01, &spec);
}

/// 写入一个只有帧头的 Layer III 帧, 比特率和采样率字段均为保留值
pub fn write_reserved_layer3_header(bw: &mut BitWriter) {
    let mut spec = FrameSpec::new(MODE_STEREO);
    spec.bitrate_index = 15;
    spec.sample_rate_index = 3;
    write_header(bw, 0b01, &spec);
}

/// 逐字节写入原始数据, 调用时须字节对齐
pub fn write_raw(bw: &mut BitWriter, bytes: &[u8]) {
    for &b in bytes {
        bw.write_bits(u32::from(b), 8);
    }
}

/// 生成 `count` 帧的 Layer I 码流
pub fn layer1_stream(spec: &FrameSpec, count: usize, seed: u32) -> Vec<u8> {
    let mut bw = BitWriter::new();
    let mut rng = Lcg::new(seed);
    for _ in 0..count {
        write_layer1_frame(&mut bw, spec, &mut rng);
    }
    bw.finish()
}

/// 生成 `count` 帧的 Layer II 码流
pub fn layer2_stream(spec: &FrameSpec, count: usize, seed: u32) -> Vec<u8> {
    let mut bw = BitWriter::new();
    let mut rng = Lcg::new(seed);
    for _ in 0..count {
        write_layer2_frame(&mut bw, spec, &mut rng);
    }
    bw.finish()
}

/// PCM 字节转为 i16 样本
pub fn samples(data: &[u8]) -> Vec<i16> {
    data.chunks_exact(2)
        .map(|c| i16::from_le_bytes([c[0], c[1]]))
        .collect()
}
