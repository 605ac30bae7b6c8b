// 核心：动力学、动作转换、观测编码、奖励与结束判定
pub mod action;
pub mod episode;
pub mod observation;
pub mod physics;
pub mod puddle;
pub mod termination;

// 具体环境与配置
pub mod config;
pub mod environments;
pub mod registry;
pub mod wrappers;

// 其他
pub mod records;
pub mod spaces;
pub mod utils;

// Traits
pub mod environment;
pub mod error;
pub mod policy;

pub use environment::{Environment, Info, StepResult};
pub use error::{EnvError, Result};
