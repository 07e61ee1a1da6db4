//! 统一错误类型定义.
//!
//! 所有 mpadec crate 共用的错误类型, 支持跨模块传播.

use thiserror::Error;

/// mpadec 统一错误类型
#[derive(Debug, Error)]
pub enum MpaError {
    /// 无效参数
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    /// I/O 错误 (读取字节源失败)
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 帧内意外到达输入末尾
    #[error("MPEG 数据中意外到达流末尾")]
    Eof,

    /// 无效数据 (无法表示的流参数等)
    #[error("无效数据: {0}")]
    InvalidData(String),
}

impl MpaError {
    /// 是否为帧内截断导致的错误
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}

/// mpadec 统一 Result 类型
pub type MpaResult<T> = Result<T, MpaError>;
