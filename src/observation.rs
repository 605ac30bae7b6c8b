use crate::physics::CartPoleState;
use crate::spaces::BoxSpace;

pub type CartPoleObservation = [f64; 5];
pub type PlanarObservation = [f64; 2];

pub trait ObservationEncoder {
    type State;
    type Observation;

    fn encode(&self, state: &Self::State) -> Self::Observation;

    /// 声明的观测范围
    fn space(&self) -> BoxSpace;
}

/// `[x / x_threshold, x_dot / x_threshold, sin(theta), cos(theta), theta_dot]`
///
/// 角度用 (sin, cos) 表示，在 ±π 处连续。
#[derive(Debug, Clone, PartialEq)]
pub struct SwingUpEncoder {
    x_threshold: f64,
}

impl SwingUpEncoder {
    pub fn new(x_threshold: f64) -> Self {
        Self { x_threshold }
    }
}

impl ObservationEncoder for SwingUpEncoder {
    type State = CartPoleState;
    type Observation = CartPoleObservation;

    fn encode(&self, state: &CartPoleState) -> CartPoleObservation {
        [
            state.x / self.x_threshold,
            state.x_dot / self.x_threshold,
            state.theta.sin(),
            state.theta.cos(),
            state.theta_dot,
        ]
    }

    /// 结束的那一步小车已越界，`x / x_threshold` 会超过 1，所以位置分量和速度一样不设界
    fn space(&self) -> BoxSpace {
        let f32_max = f64::from(f32::MAX);
        BoxSpace::symmetric(vec![f32_max, f32_max, 1.0, 1.0, f32_max])
    }
}

/// 直接返回截断后的 (x, y)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlanarEncoder;

impl ObservationEncoder for PlanarEncoder {
    type State = [f64; 2];
    type Observation = PlanarObservation;

    fn encode(&self, state: &[f64; 2]) -> PlanarObservation {
        *state
    }

    fn space(&self) -> BoxSpace {
        BoxSpace::uniform(2, 0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn angle_encoding_is_continuous_across_the_wrap() {
        let encoder = SwingUpEncoder::new(3.0);
        let below = encoder.encode(&CartPoleState::new(0.0, 0.0, PI - 1e-9, 0.0));
        let above = encoder.encode(&CartPoleState::new(0.0, 0.0, -PI + 1e-9, 0.0));
        assert_relative_eq!(below[2], above[2], epsilon = 1e-8);
        assert_relative_eq!(below[3], above[3], epsilon = 1e-8);
    }

    #[test]
    fn position_is_scaled_by_threshold() {
        let encoder = SwingUpEncoder::new(2.0);
        let obs = encoder.encode(&CartPoleState::new(1.0, -4.0, 0.0, 0.5));
        assert_eq!(obs, [0.5, -2.0, 0.0, 1.0, 0.5]);
        assert!(encoder.space().contains(&obs));
    }

    #[test]
    fn out_of_bounds_cart_is_still_inside_the_box() {
        let encoder = SwingUpEncoder::new(0.1);
        let obs = encoder.encode(&CartPoleState::new(0.103, 11.17, -0.05, -1.8));
        assert!(obs[0] > 1.0);
        assert!(encoder.space().contains(&obs));
    }
}
