//! # mpadec-codec
//!
//! MPEG-1 Audio Layer I/II 解码引擎.
//!
//! 将原始 MPEG 音频字节流 (可带任意前导数据, 如 ID3 标签) 解码为交错的
//! 16 位有符号小端 PCM. Layer III 帧被识别但不解码.
//!
//! # 示例
//! ```no_run
//! let sound = mpadec_codec::decode_file("music.mp2").unwrap();
//! if let Some(sound) = sound {
//!     println!("{} Hz, {} 声道, {:?}", sound.sample_rate(), sound.channels(), sound.duration());
//! }
//! ```

pub mod decoder;
pub mod header;
pub mod layer1;
pub mod layer2;
pub mod pcm;
pub mod sound;
pub mod subband;
pub mod synthesis;
pub mod sync;
pub mod tables;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use mpadec_core::MpaResult;

pub use decoder::MpaDecoder;
pub use header::{ChannelMode, FrameHeader, MpegLayer, MpegVersion};
pub use sound::{AudioFormat, DecodedSound};

/// 解码任意字节源
///
/// 读取器内部会被包一层缓冲. 没有找到任何 Layer I/II 帧时返回 `Ok(None)`.
pub fn decode<R: Read>(reader: R) -> MpaResult<Option<DecodedSound>> {
    MpaDecoder::new().decode_stream(BufReader::new(reader))
}

/// 解码内存中的字节
pub fn decode_bytes(data: &[u8]) -> MpaResult<Option<DecodedSound>> {
    MpaDecoder::new().decode_stream(data)
}

/// 解码文件
pub fn decode_file<P: AsRef<Path>>(path: P) -> MpaResult<Option<DecodedSound>> {
    let file = File::open(path.as_ref())?;
    log::debug!("解码文件: {}", path.as_ref().display());
    decode(file)
}
