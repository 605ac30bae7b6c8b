use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvError {
    #[error("invalid action: {0}")]
    InvalidAction(String),
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("unknown environment id: {0}")]
    UnknownEnvironment(String),
    /// 提交的记录缺少必需的 key
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

pub type Result<T> = std::result::Result<T, EnvError>;
