use serde::{Deserialize, Serialize};

use crate::config::{Integrator, PhysicsConfig};

/// 小车-杆的物理状态，theta 不做取模
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CartPoleState {
    pub x: f64,
    pub x_dot: f64,
    pub theta: f64,
    pub theta_dot: f64,
}

impl CartPoleState {
    pub fn new(x: f64, x_dot: f64, theta: f64, theta_dot: f64) -> Self {
        Self {
            x,
            x_dot,
            theta,
            theta_dot,
        }
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.x, self.x_dot, self.theta, self.theta_dot]
    }
}

impl From<[f64; 4]> for CartPoleState {
    fn from([x, x_dot, theta, theta_dot]: [f64; 4]) -> Self {
        Self::new(x, x_dot, theta, theta_dot)
    }
}

/// 按经典 CartPole 方程推进一步，不做任何截断
#[derive(Debug, Clone, PartialEq)]
pub struct Dynamics {
    gravity: f64,
    masspole: f64,
    total_mass: f64,
    length: f64,
    polemass_length: f64,
    tau: f64,
    integrator: Integrator,
}

impl Dynamics {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            gravity: config.gravity,
            masspole: config.masspole,
            total_mass: config.masscart + config.masspole,
            length: config.length,
            polemass_length: config.masspole * config.length,
            tau: config.tau,
            integrator: config.integrator,
        }
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// 返回 (x_acc, theta_acc)
    pub fn accelerations(&self, state: &CartPoleState, force: f64) -> (f64, f64) {
        let costheta = state.theta.cos();
        let sintheta = state.theta.sin();
        let temp = (force + self.polemass_length * state.theta_dot.powi(2) * sintheta)
            / self.total_mass;
        let theta_acc = (self.gravity * sintheta - costheta * temp)
            / (self.length * (4.0 / 3.0 - self.masspole * costheta.powi(2) / self.total_mass));
        let x_acc = temp - self.polemass_length * theta_acc * costheta / self.total_mass;
        (x_acc, theta_acc)
    }

    pub fn step(&self, state: &CartPoleState, force: f64) -> CartPoleState {
        let (x_acc, theta_acc) = self.accelerations(state, force);
        let CartPoleState {
            mut x,
            mut x_dot,
            mut theta,
            mut theta_dot,
        } = *state;

        match self.integrator {
            Integrator::Euler => {
                x += self.tau * x_dot;
                x_dot += self.tau * x_acc;
                theta += self.tau * theta_dot;
                theta_dot += self.tau * theta_acc;
            }
            Integrator::SemiImplicitEuler => {
                x_dot += self.tau * x_acc;
                x += self.tau * x_dot;
                theta_dot += self.tau * theta_acc;
                theta += self.tau * theta_dot;
            }
        }

        CartPoleState::new(x, x_dot, theta, theta_dot)
    }
}
