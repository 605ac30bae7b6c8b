//! 把外部动作转换成物理量：小车受力或平面位移。

use crate::error::{EnvError, Result};
use crate::spaces::{BoxSpace, Space};

pub trait ActionAdapter {
    type Action;
    type Output;

    fn adapt(&self, action: &Self::Action) -> Result<Self::Output>;

    fn space(&self) -> Space;
}

/// 下标 0, 1, 2 分别对应 -F, +F, 0
const ACT_TO_FORCE: [f64; 3] = [-1.0, 1.0, 0.0];

#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteForce {
    force_mag: f64,
    allow_noop: bool,
}

impl DiscreteForce {
    pub fn new(force_mag: f64, allow_noop: bool) -> Self {
        Self {
            force_mag,
            allow_noop,
        }
    }

    pub fn n_actions(&self) -> usize {
        if self.allow_noop { 3 } else { 2 }
    }
}

impl ActionAdapter for DiscreteForce {
    type Action = usize;
    type Output = f64;

    fn adapt(&self, action: &usize) -> Result<f64> {
        if *action >= self.n_actions() {
            return Err(EnvError::InvalidAction(format!(
                "{action} is outside 0..{}",
                self.n_actions()
            )));
        }
        Ok(self.force_mag * ACT_TO_FORCE[*action])
    }

    fn space(&self) -> Space {
        Space::Discrete(self.n_actions())
    }
}

/// 连续力：先截断到 [min_force, max_force] 再乘以 force_mag
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuousForce {
    min_force: f64,
    max_force: f64,
    force_mag: f64,
}

impl ContinuousForce {
    /// 调用方需保证 `min_force <= max_force`
    pub fn new(min_force: f64, max_force: f64, force_mag: f64) -> Self {
        Self {
            min_force,
            max_force,
            force_mag,
        }
    }
}

impl ActionAdapter for ContinuousForce {
    type Action = f64;
    type Output = f64;

    fn adapt(&self, action: &f64) -> Result<f64> {
        Ok(action.clamp(self.min_force, self.max_force) * self.force_mag)
    }

    fn space(&self) -> Space {
        Space::Box(BoxSpace::new(vec![self.min_force], vec![self.max_force]))
    }
}

/// 平面位移，逐坐标截断到 [-scale, scale]
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarDisplacement {
    scale: f64,
}

impl PlanarDisplacement {
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }
}

impl ActionAdapter for PlanarDisplacement {
    type Action = [f64; 2];
    type Output = [f64; 2];

    fn adapt(&self, action: &[f64; 2]) -> Result<[f64; 2]> {
        Ok(action.map(|a| a.clamp(-self.scale, self.scale)))
    }

    fn space(&self) -> Space {
        Space::Box(BoxSpace::uniform(2, -self.scale, self.scale))
    }
}

/// 右、上、左、下
const MOVES: [[f64; 2]; 4] = [[1.0, 0.0], [0.0, 1.0], [-1.0, 0.0], [0.0, -1.0]];

/// 四个方向的固定步长移动
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteDisplacement {
    step: f64,
}

impl DiscreteDisplacement {
    pub const DEFAULT_STEP: f64 = 0.05;

    pub fn new(step: f64) -> Self {
        Self { step }
    }
}

impl Default for DiscreteDisplacement {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STEP)
    }
}

impl ActionAdapter for DiscreteDisplacement {
    type Action = usize;
    type Output = [f64; 2];

    fn adapt(&self, action: &usize) -> Result<[f64; 2]> {
        MOVES
            .get(*action)
            .map(|m| m.map(|v| v * self.step))
            .ok_or_else(|| EnvError::InvalidAction(format!("{action} is outside 0..4")))
    }

    fn space(&self) -> Space {
        Space::Discrete(MOVES.len())
    }
}
