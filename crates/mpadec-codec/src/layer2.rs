//! Layer II 子带解码
//!
//! 相比 Layer I 增加了:
//! - 按流采样率和比特率选择的比特分配表 (由解码器选定后传入), 每子带分配位宽不同,
//!   只编码 sblimit 个子带
//! - 比例因子选择信息 (SCFSI), 每子带每声道最多 3 个比例因子
//! - 3、5、9 级量化的 3 样本分组编码
//!
//! 每帧 12 个颗粒 (granule), 每颗粒每子带 3 个样本, 共 36 个时隙.

use std::io::Read;

use mpadec_core::MpaResult;
use mpadec_core::bitreader::BitReader;

use crate::header::FrameHeader;
use crate::subband::SubbandFrame;
use crate::tables::{AllocTable, LAYER2_SLOTS, QuantClass, SBLIMIT, scale_factor};

/// 每帧颗粒数
const GRANULES: usize = 12;

/// 按 SCFSI 读取一个子带的 3 个比例因子
fn read_scale_factors<R: Read>(br: &mut BitReader<R>, scfsi: u32) -> MpaResult<[f32; 3]> {
    let sf = match scfsi {
        0 => {
            let a = scale_factor(br.read_bits(6)?);
            let b = scale_factor(br.read_bits(6)?);
            let c = scale_factor(br.read_bits(6)?);
            [a, b, c]
        }
        1 => {
            let a = scale_factor(br.read_bits(6)?);
            let c = scale_factor(br.read_bits(6)?);
            [a, a, c]
        }
        2 => {
            let a = scale_factor(br.read_bits(6)?);
            [a, a, a]
        }
        _ => {
            let a = scale_factor(br.read_bits(6)?);
            let b = scale_factor(br.read_bits(6)?);
            [a, b, b]
        }
    };
    Ok(sf)
}

/// 反量化一个码字 (未乘比例因子)
fn requantize(code: u32, class: &QuantClass) -> f32 {
    let msb = class.msb();
    let mut value = if (code >> msb) & 1 == 0 { -1.0 } else { 0.0 };
    value += (code & ((1 << msb) - 1)) as f32 / (1u32 << msb) as f32;
    value += class.d;
    value * class.c
}

/// 读取一个子带的 3 个连续样本
fn read_triple<R: Read>(br: &mut BitReader<R>, class: &QuantClass) -> MpaResult<[f32; 3]> {
    let mut codes = [0u32; 3];
    if class.grouped {
        let mut code = br.read_bits(class.bits)?;
        for c in codes.iter_mut() {
            *c = code % class.levels;
            code /= class.levels;
        }
    } else {
        for c in codes.iter_mut() {
            *c = br.read_bits(class.bits)?;
        }
    }
    Ok(codes.map(|c| requantize(c, class)))
}

/// 按给定比特分配表解码一个 Layer II 帧的子带数据
pub fn decode_layer2<R: Read>(
    br: &mut BitReader<R>,
    header: &FrameHeader,
    table: &AllocTable,
    out: &mut SubbandFrame,
) -> MpaResult<()> {
    let nch = header.channels();
    let sblimit = table.sblimit;
    let bound = header.independent_subbands(sblimit);
    out.reset(nch, LAYER2_SLOTS);

    log::trace!(
        "Layer II: 分配表 {}, sblimit={}, bound={}",
        table.index,
        sblimit,
        bound
    );

    // 1. 比特分配
    let mut allocation = [[0u32; SBLIMIT]; 2];
    for sb in 0..bound {
        let nbal = table.nbal(sb);
        for alloc in allocation.iter_mut().take(nch) {
            alloc[sb] = br.read_bits(nbal)?;
        }
    }
    for sb in bound..sblimit {
        let shared = br.read_bits(table.nbal(sb))?;
        allocation[0][sb] = shared;
        allocation[1][sb] = shared;
    }

    // 2. SCFSI
    let mut scfsi = [[0u32; SBLIMIT]; 2];
    for sb in 0..sblimit {
        for ch in 0..nch {
            if allocation[ch][sb] != 0 {
                scfsi[ch][sb] = br.read_bits(2)?;
            }
        }
    }

    // 3. 比例因子
    let mut scalefactor = [[[0.0f32; 3]; SBLIMIT]; 2];
    for sb in 0..sblimit {
        for ch in 0..nch {
            if allocation[ch][sb] != 0 {
                scalefactor[ch][sb] = read_scale_factors(br, scfsi[ch][sb])?;
            }
        }
    }

    // 4. 样本: 颗粒 gr 使用第 gr / 4 个比例因子
    for gr in 0..GRANULES {
        let part = gr / 4;
        let slot = gr * 3;

        for sb in 0..bound {
            for ch in 0..nch {
                let n = allocation[ch][sb];
                if n == 0 {
                    continue;
                }
                let triple = read_triple(br, table.quant_class(sb, n))?;
                let sf = scalefactor[ch][sb][part];
                for (i, value) in triple.iter().enumerate() {
                    out.set(ch, slot + i, sb, value * sf);
                }
            }
        }

        for sb in bound..sblimit {
            let n = allocation[0][sb];
            if n == 0 {
                continue;
            }
            let triple = read_triple(br, table.quant_class(sb, n))?;
            for ch in 0..nch {
                let sf = scalefactor[ch][sb][part];
                for (i, value) in triple.iter().enumerate() {
                    out.set(ch, slot + i, sb, value * sf);
                }
            }
        }
    }

    Ok(())
}
