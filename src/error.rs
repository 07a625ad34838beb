//! 索引构建与逆变换的输入校验错误。

use thiserror::Error;

/// 输入不满足索引前提时返回的错误。
///
/// 所有操作都是确定性的纯函数，同样的输入重试只会得到同样的错误，
/// 调用方需要修正输入。模式串未命中不是错误，而是空结果。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("sequence is empty")]
    EmptySequence,

    #[error("sequence does not contain the sentinel {sentinel:?}")]
    MissingSentinel { sentinel: char },

    /// 哨兵出现多次，后缀顺序与逆变换的起点都不再唯一
    #[error("sentinel {sentinel:?} occurs {count} times, expected exactly once")]
    AmbiguousSentinel { sentinel: char, count: usize },

    #[error("sentinel {sentinel:?} found at position {position}, expected it as the final symbol")]
    SentinelNotTerminal { sentinel: char, position: usize },

    #[error("symbol {symbol:?} at position {position} is not in the alphabet")]
    UnknownSymbol { symbol: char, position: usize },

    /// 位置与计数以 u32 存储
    #[error("sequence of {len} symbols exceeds the limit of {max}")]
    SequenceTooLong { len: usize, max: usize },

    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),

    /// LF 映射从哨兵出发的环长度小于 n：输入不是任何序列的 BWT
    #[error("string is not a Burrows-Wheeler transform: LF cycle covers {covered} of {len} rows")]
    MalformedTransform { covered: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, ValidationError>;
