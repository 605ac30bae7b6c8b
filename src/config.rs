//! 各环境的构造参数。
//!
//! 每个实例持有自己的一份配置（`Clone`），构造之后不再修改。所有结构体都带
//! `#[serde(default)]`，只写部分字段的 JSON 也能补齐默认值。

use serde::{Deserialize, Serialize};

use crate::error::{EnvError, Result};

/// 经典 CartPole 的物理常数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f64,
    pub masscart: f64,
    pub masspole: f64,
    /// 杆长的一半
    pub length: f64,
    /// 时间步长
    pub tau: f64,
    pub integrator: Integrator,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            masscart: 1.0,
            masspole: 0.1,
            length: 0.5,
            tau: 0.02,
            integrator: Integrator::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Integrator {
    /// 先用旧的速度更新位置，再更新速度
    Euler,
    /// 先更新速度，再用新速度更新位置
    #[default]
    SemiImplicitEuler,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartPosition {
    /// 杆的角度在整圈内均匀随机
    #[default]
    #[serde(alias = "arbitary")]
    Arbitrary,
    /// 杆朝下悬挂
    Bottom,
}

/// 离散动作的 swing-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwingUpConfig {
    pub physics: PhysicsConfig,
    pub start_position: StartPosition,
    pub height_threshold: f64,
    pub theta_dot_threshold: f64,
    pub x_reward_threshold: f64,
    /// 原版 CartPole 为 2.4
    pub x_threshold: f64,
    /// 允许第三个动作（不施加力）
    pub allow_noop: bool,
    pub move_cost: f64,
    pub force_mag: f64,
}

impl Default for SwingUpConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            start_position: StartPosition::Arbitrary,
            height_threshold: 0.5,
            theta_dot_threshold: 1.0,
            x_reward_threshold: 1.0,
            x_threshold: 3.0,
            allow_noop: false,
            move_cost: 0.1,
            force_mag: 10.0,
        }
    }
}

impl SwingUpConfig {
    pub fn validate(&self) -> Result<()> {
        validate_x_threshold(self.x_threshold)
    }
}

/// 连续动作的 swing-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContinuousSwingUpConfig {
    pub physics: PhysicsConfig,
    pub start_position: StartPosition,
    pub height_threshold: f64,
    pub theta_dot_threshold: f64,
    pub x_reward_threshold: f64,
    pub x_threshold: f64,
    pub move_cost: f64,
    pub max_force: f64,
    pub min_force: f64,
    pub force_mag: f64,
}

impl Default for ContinuousSwingUpConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            start_position: StartPosition::Arbitrary,
            height_threshold: 0.5,
            theta_dot_threshold: 1.0,
            x_reward_threshold: 1.0,
            x_threshold: 3.0,
            move_cost: 0.1,
            max_force: 1.0,
            min_force: -1.0,
            force_mag: 10.0,
        }
    }
}

impl ContinuousSwingUpConfig {
    pub fn validate(&self) -> Result<()> {
        validate_x_threshold(self.x_threshold)?;
        validate_force_range(self.min_force, self.max_force)
    }
}

/// 从竖直附近开始的平衡任务，越过角度界限也会结束
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    pub physics: PhysicsConfig,
    pub height_threshold: f64,
    pub theta_dot_threshold: f64,
    pub x_reward_threshold: f64,
    pub x_threshold: f64,
    /// 弧度
    pub theta_threshold: f64,
    pub move_cost: f64,
    pub max_force: f64,
    pub min_force: f64,
    pub force_mag: f64,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            height_threshold: 0.5,
            theta_dot_threshold: 1.0,
            x_reward_threshold: 1.0,
            x_threshold: 2.4,
            theta_threshold: 12.0 * 2.0 * std::f64::consts::PI / 360.0,
            move_cost: 0.1,
            max_force: 1.0,
            min_force: -1.0,
            force_mag: 10.0,
        }
    }
}

impl BalanceConfig {
    pub fn validate(&self) -> Result<()> {
        validate_x_threshold(self.x_threshold)?;
        validate_force_range(self.min_force, self.max_force)
    }
}

/// Puddle world 的参数。
///
/// `puddles` 和 `start_positions` 保持嵌套数组的形式，形状在环境构造时检查：
/// puddle 为 `[n][2][2]`，起点为 `[m][2]`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuddleWorldConfig {
    /// 过程噪声的标准差
    pub noise: f64,
    pub puddles: Vec<Vec<Vec<f64>>>,
    pub start_positions: Option<Vec<Vec<f64>>>,
    /// 连续动作每个坐标的最大位移
    pub action_scale: f64,
}

impl Default for PuddleWorldConfig {
    fn default() -> Self {
        Self {
            noise: 0.01,
            puddles: default_puddles(),
            start_positions: None,
            action_scale: 0.1,
        }
    }
}

impl PuddleWorldConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.noise.is_finite() || self.noise < 0.0 {
            return Err(EnvError::Configuration(format!(
                "noise must be a finite non-negative number, got {}",
                self.noise
            )));
        }
        if !(self.action_scale.is_finite() && self.action_scale > 0.0) {
            return Err(EnvError::Configuration(format!(
                "action_scale must be positive, got {}",
                self.action_scale
            )));
        }
        Ok(())
    }
}

pub fn default_puddles() -> Vec<Vec<Vec<f64>>> {
    vec![
        vec![vec![0.1, 0.75], vec![0.45, 0.75]],
        vec![vec![0.45, 0.4], vec![0.45, 0.8]],
    ]
}

fn validate_x_threshold(x_threshold: f64) -> Result<()> {
    if x_threshold.is_finite() && x_threshold > 0.0 {
        Ok(())
    } else {
        Err(EnvError::Configuration(format!(
            "x_threshold must be positive, got {x_threshold}"
        )))
    }
}

fn validate_force_range(min_force: f64, max_force: f64) -> Result<()> {
    if min_force.is_nan() || max_force.is_nan() || min_force > max_force {
        return Err(EnvError::Configuration(format!(
            "force range [{min_force}, {max_force}] is empty"
        )));
    }
    Ok(())
}
