//! 帧同步
//!
//! 逐字节扫描 `11111111 1111xxxx` 模式. 只匹配这 12 位, 不再验证后续帧头,
//! 因此能容忍帧前或帧间的任意垃圾数据 (例如 ID3 标签), 代价是理论上存在误同步.

use std::io::Read;

use mpadec_core::MpaResult;
use mpadec_core::bitreader::BitReader;

/// 同步字第一个字节
const SYNC_BYTE: u8 = 0xFF;

/// 查找下一个同步字
///
/// 调用时读取器必须字节对齐. 找到时返回 `true`, 读取器恰好位于 12 位同步字之后;
/// 字节源在找到同步字前耗尽时返回 `false`, 这是正常的流结束而不是错误.
pub fn seek_sync<R: Read>(br: &mut BitReader<R>) -> MpaResult<bool> {
    loop {
        match br.next_byte()? {
            None => return Ok(false),
            Some(SYNC_BYTE) => {}
            Some(_) => continue,
        }

        match br.peek_byte()? {
            None => return Ok(false),
            Some(b) if b >> 4 == 0xF => {
                br.skip_bits(4)?;
                return Ok(true);
            }
            // 该字节高 4 位不全为 1, 不可能是 0xFF, 由下一轮消费
            Some(_) => continue,
        }
    }
}
