use thiserror::Error;

/// 原语操作可能遇到的错误类型
///
/// `InvalidArgument` 表示调用方可以修正的参数错误；`Logic` 表示内部不变量被破坏，
/// 属于致命错误，调用方不应自动重试。
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Internal logic error: {0}")]
    Logic(String),

    #[error("{operation} gave up after {attempts} attempts")]
    AttemptsExhausted {
        operation: &'static str,
        attempts: u64,
    },

    #[error("Entropy source failed: {0}")]
    Entropy(#[from] rand_core::OsError),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("Configuration error (JSON): {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub(crate) fn logic(msg: impl Into<String>) -> Self {
        Error::Logic(msg.into())
    }

    /// 是否为致命错误（内部运算引擎本身已损坏）
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Logic(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
