use rand::Rng;
use serde::{Deserialize, Serialize};

/// 连续空间，逐维的上下界
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpace {
    pub low: Vec<f64>,
    pub high: Vec<f64>,
}

impl BoxSpace {
    pub fn new(low: Vec<f64>, high: Vec<f64>) -> Self {
        debug_assert_eq!(low.len(), high.len());
        Self { low, high }
    }

    /// 对称区间 [-high, high]
    pub fn symmetric(high: Vec<f64>) -> Self {
        let low = high.iter().map(|h| -h).collect();
        Self { low, high }
    }

    pub fn uniform(dim: usize, low: f64, high: f64) -> Self {
        Self {
            low: vec![low; dim],
            high: vec![high; dim],
        }
    }

    pub fn dim(&self) -> usize {
        self.low.len()
    }

    pub fn contains(&self, value: &[f64]) -> bool {
        value.len() == self.dim()
            && value
                .iter()
                .zip(self.low.iter().zip(&self.high))
                .all(|(v, (lo, hi))| *lo <= *v && *v <= *hi)
    }

    /// 用 sigmoid 把任意实数动作逐维压到 `[low, high]`，0 对应区间中点
    pub fn sigmoid_scale(&self, action: &[f64]) -> Vec<f64> {
        debug_assert_eq!(action.len(), self.dim());
        action
            .iter()
            .zip(self.low.iter().zip(&self.high))
            .map(|(a, (lo, hi))| (hi - lo) / (1.0 + (-a).exp()) + lo)
            .collect()
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        self.low
            .iter()
            .zip(&self.high)
            .map(|(lo, hi)| if lo < hi { rng.random_range(*lo..=*hi) } else { *lo })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Space {
    /// 动作为 0..n 的下标
    Discrete(usize),
    Box(BoxSpace),
}

impl Space {
    pub fn dim(&self) -> usize {
        match self {
            Space::Discrete(_) => 1,
            Space::Box(b) => b.dim(),
        }
    }
}
