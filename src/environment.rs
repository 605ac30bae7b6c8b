use std::collections::HashMap;

use crate::error::Result;
use crate::spaces::{BoxSpace, Space};

/// 附加信息，核心环境总是返回空表
pub type Info = HashMap<String, f64>;

#[derive(Debug, Clone, PartialEq)]
pub struct StepResult<O> {
    pub observation: O,
    pub reward: f64,
    pub done: bool,
    pub info: Info,
}

pub trait Environment {
    type Observation;
    type Action;

    fn reset(&mut self) -> Self::Observation;

    /// (observation, reward, done, info)
    fn step(&mut self, action: &Self::Action) -> Result<StepResult<Self::Observation>>;

    /// 重设随机数种子，`None` 时使用系统熵；返回实际使用的种子
    fn seed(&mut self, seed: Option<u64>) -> Vec<u64>;

    /// 获取当前观测
    fn current_observation(&self) -> Self::Observation;

    /// 动作空间
    fn action_space(&self) -> Space;

    /// 观测空间
    fn observation_space(&self) -> BoxSpace;

    /// 观测维度
    fn observation_dim(&self) -> usize {
        self.observation_space().dim()
    }
}
