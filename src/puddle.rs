//! Puddle world 的势场奖励。
//!
//! 每个 puddle 是一条线段，半径 [`PUDDLE_RADIUS`] 以内的点受到与距离成比例的
//! 惩罚；多个 puddle 重叠时只取最近的那一个。

use crate::error::{EnvError, Result};
use crate::termination::Termination;

pub const REWARD_UNIT: f64 = 0.01;
pub const PUDDLE_RADIUS: f64 = 0.1;
/// 坐标和超过该值即到达右上角的目标区域
pub const GOAL_THRESHOLD: f64 = 0.95 * 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: [f64; 2],
    pub end: [f64; 2],
}

impl Segment {
    pub fn new(start: [f64; 2], end: [f64; 2]) -> Self {
        Self { start, end }
    }

    /// 线段上离 `point` 最近的点
    pub fn nearest_point(&self, point: &[f64; 2]) -> [f64; 2] {
        let d = [self.end[0] - self.start[0], self.end[1] - self.start[1]];
        let denom = d[0] * d[0] + d[1] * d[1];
        // 退化为一个点
        if denom == 0.0 {
            return self.start;
        }
        let g = ((point[0] - self.start[0]) * d[0] + (point[1] - self.start[1]) * d[1]) / denom;
        let g = g.clamp(0.0, 1.0);
        [self.start[0] + g * d[0], self.start[1] + g * d[1]]
    }

    pub fn distance(&self, point: &[f64; 2]) -> f64 {
        let [nx, ny] = self.nearest_point(point);
        (point[0] - nx).hypot(point[1] - ny)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PuddleField {
    segments: Vec<Segment>,
}

impl PuddleField {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// 从 `[n][2][2]` 形状的嵌套数组构造
    pub fn from_nested(puddles: &[Vec<Vec<f64>>]) -> Result<Self> {
        let segments = puddles
            .iter()
            .enumerate()
            .map(|(i, puddle)| match puddle.as_slice() {
                [a, b] => Ok(Segment::new(point2(a, i)?, point2(b, i)?)),
                _ => Err(EnvError::Configuration(format!(
                    "puddle {i} must have 2 endpoints, got {}",
                    puddle.len()
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(segments))
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_goal(point: &[f64; 2]) -> bool {
        point[0] + point[1] > GOAL_THRESHOLD
    }

    /// 最近的 puddle 带来的惩罚（非负），不在任何 puddle 范围内时为 0
    pub fn penalty(&self, point: &[f64; 2]) -> f64 {
        self.segments
            .iter()
            .map(|s| s.distance(point))
            .filter(|d| *d < PUDDLE_RADIUS)
            .map(|d| PUDDLE_RADIUS - d)
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
            .map_or(0.0, |closest| REWARD_UNIT * 10.0 * closest)
    }

    pub fn reward_at(&self, point: &[f64; 2]) -> f64 {
        if Self::is_goal(point) {
            return REWARD_UNIT * 10.0;
        }
        -REWARD_UNIT - self.penalty(point)
    }

    /// 在 [0,1]^2 的 `resolution` x `resolution` 网格上采样奖励，
    /// 行对应 y，列对应 x
    pub fn reward_map(&self, resolution: usize) -> Vec<Vec<f64>> {
        let coord = |i: usize| {
            if resolution > 1 {
                i as f64 / (resolution - 1) as f64
            } else {
                0.0
            }
        };
        (0..resolution)
            .map(|j| {
                (0..resolution)
                    .map(|i| self.reward_at(&[coord(i), coord(j)]))
                    .collect()
            })
            .collect()
    }
}

impl Termination for PuddleField {
    type State = [f64; 2];

    fn is_terminal(&self, state: &[f64; 2]) -> bool {
        Self::is_goal(state)
    }

    fn reward(&self, state: &[f64; 2]) -> f64 {
        self.reward_at(state)
    }
}

/// 把 `[x, y]` 形式的切片转成定长数组
pub(crate) fn point2(values: &[f64], index: usize) -> Result<[f64; 2]> {
    match values {
        [x, y] => Ok([*x, *y]),
        _ => Err(EnvError::Configuration(format!(
            "entry {index} must be a 2-D point, got {} coordinates",
            values.len()
        ))),
    }
}
