//! # mpadec-core
//!
//! mpadec 核心库, 提供错误类型、比特流读写和声道布局等基础设施.

pub mod bitreader;
pub mod bitwriter;
pub mod channel_layout;
pub mod error;

// 重导出常用类型
pub use channel_layout::{ChannelLayout, ChannelMask};
pub use error::{MpaError, MpaResult};
