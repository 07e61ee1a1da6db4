//! # mpadec
//!
//! 纯 Rust 实现的 MPEG-1 音频解码器, 支持 Layer I 与 Layer II.
//!
//! 输入为原始 MPEG 音频字节流, 输出为交错的 16 位有符号小端 PCM.
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use mpadec::codec::decode_file;
//!
//! if let Some(sound) = decode_file("music.mp2").unwrap() {
//!     println!("{} Hz, {}, {:?}", sound.sample_rate(), sound.channel_layout(), sound.duration());
//!     sound.write_wav(std::fs::File::create("music.wav").unwrap()).unwrap();
//! }
//! ```
//!
//! # Crate 结构
//!
//! | Crate | 功能 |
//! |-------|------|
//! | `mpadec-core` | 错误类型, 比特流读写, 声道布局 |
//! | `mpadec-codec` | 帧同步, 帧头解析, Layer I/II 解码, 合成滤波 |

/// 核心类型与工具
pub use mpadec_core as core;

/// 解码引擎
pub use mpadec_codec as codec;

pub mod logging;

/// 获取 mpadec 版本号
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
