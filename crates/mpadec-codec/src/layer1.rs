//! Layer I 子带解码
//!
//! 每帧 32 个子带 x 12 个时隙:
//! 1. 4 位比特分配 (bound 以下按声道, 以上两声道共享)
//! 2. 分配非零的子带读取 6 位比例因子索引 (每声道一个)
//! 3. 12 个时隙内逐子带读取 (分配 + 1) 位样本并线性反量化

use std::io::Read;

use mpadec_core::MpaResult;
use mpadec_core::bitreader::BitReader;

use crate::header::FrameHeader;
use crate::subband::SubbandFrame;
use crate::tables::{LAYER1_SLOTS, SBLIMIT, layer1_requant_factor, scale_factor};

/// 读取并反量化一个 Layer I 样本 (未乘比例因子)
///
/// `allocation` 为非零分配码 n, 码字宽度为 n + 1 位. 最高位为 0 时取 -1 偏移,
/// 再加上剩余位表示的小数和 1/2^n, 最后乘以 2^(n+1) / (2^(n+1) - 1).
fn read_sample<R: Read>(br: &mut BitReader<R>, allocation: u32) -> MpaResult<f32> {
    let n = allocation;
    let code = br.read_bits(n + 1)?;
    let step = (1u32 << n) as f32;

    let mut fraction = if (code >> n) & 1 == 0 { -1.0 } else { 0.0 };
    fraction += (code & ((1 << n) - 1)) as f32 / step + 1.0 / step;
    Ok(fraction * layer1_requant_factor(n + 1))
}

/// 解码一个 Layer I 帧的子带数据
pub fn decode_layer1<R: Read>(
    br: &mut BitReader<R>,
    header: &FrameHeader,
    out: &mut SubbandFrame,
) -> MpaResult<()> {
    let nch = header.channels();
    let bound = header.independent_subbands(SBLIMIT);
    out.reset(nch, LAYER1_SLOTS);

    // 1. 比特分配
    let mut allocation = [[0u32; SBLIMIT]; 2];
    for sb in 0..bound {
        for alloc in allocation.iter_mut().take(nch) {
            alloc[sb] = br.read_bits(4)?;
        }
    }
    for sb in bound..SBLIMIT {
        let shared = br.read_bits(4)?;
        allocation[0][sb] = shared;
        allocation[1][sb] = shared;
    }

    // 2. 比例因子
    let mut scalefactor = [[0.0f32; SBLIMIT]; 2];
    for sb in 0..SBLIMIT {
        for ch in 0..nch {
            if allocation[ch][sb] != 0 {
                scalefactor[ch][sb] = scale_factor(br.read_bits(6)?);
            }
        }
    }

    // 3. 样本
    for slot in 0..LAYER1_SLOTS {
        for sb in 0..bound {
            for ch in 0..nch {
                let n = allocation[ch][sb];
                if n != 0 {
                    let value = read_sample(br, n)?;
                    out.set(ch, slot, sb, value * scalefactor[ch][sb]);
                }
            }
        }
        // 强度立体声子带: 一个样本, 各声道使用自己的比例因子
        for sb in bound..SBLIMIT {
            let n = allocation[0][sb];
            if n != 0 {
                let value = read_sample(br, n)?;
                for ch in 0..nch {
                    out.set(ch, slot, sb, value * scalefactor[ch][sb]);
                }
            }
        }
    }

    Ok(())
}
