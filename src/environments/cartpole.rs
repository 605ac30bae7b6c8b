use crate::action::{ActionAdapter, ContinuousForce, DiscreteForce};
use crate::config::{BalanceConfig, ContinuousSwingUpConfig, SwingUpConfig};
use crate::environment::{Environment, StepResult};
use crate::episode::CartPoleEpisode;
use crate::error::Result;
use crate::observation::{CartPoleObservation, SwingUpEncoder};
use crate::physics::{CartPoleState, Dynamics};
use crate::spaces::{BoxSpace, Space};
use crate::termination::{CartPoleBounds, CartPoleRules, UprightReward};

/// 带配置的 cart-pole 环境，`Environment` 全部交给内部的 episode
pub struct CartPoleEnv<C, A> {
    config: C,
    episode: CartPoleEpisode<A>,
}

/// CartPole swing-up，离散动作：0 向左，1 向右，2 不施加力（需 `allow_noop`）。
///
/// 观测为 `[x / x_threshold, x_dot / x_threshold, sin(theta), cos(theta), theta_dot]`，
/// 只有小车越界才会结束。
pub type CartPoleSwingUp = CartPoleEnv<SwingUpConfig, DiscreteForce>;

/// CartPole swing-up，连续动作。动作截断到 `[min_force, max_force]` 后乘以 `force_mag`。
pub type CartPoleSwingUpContinuous = CartPoleEnv<ContinuousSwingUpConfig, ContinuousForce>;

/// 连续动作的平衡任务：从竖直附近开始，小车越界或杆倾角超过
/// `theta_threshold` 都会结束。
pub type CartPoleContinuous = CartPoleEnv<BalanceConfig, ContinuousForce>;

impl CartPoleSwingUp {
    pub fn new(config: SwingUpConfig) -> Result<Self> {
        config.validate()?;
        let episode = CartPoleEpisode::new(
            DiscreteForce::new(config.force_mag, config.allow_noop),
            Dynamics::new(&config.physics),
            CartPoleRules {
                bounds: CartPoleBounds::Position {
                    x_threshold: config.x_threshold,
                },
                upright: UprightReward {
                    height_threshold: config.height_threshold,
                    theta_dot_threshold: config.theta_dot_threshold,
                    x_reward_threshold: config.x_reward_threshold,
                    move_cost: config.move_cost,
                },
            },
            SwingUpEncoder::new(config.x_threshold),
            Some(config.start_position),
        );
        Ok(Self { config, episode })
    }
}

impl CartPoleSwingUpContinuous {
    pub fn new(config: ContinuousSwingUpConfig) -> Result<Self> {
        config.validate()?;
        let episode = CartPoleEpisode::new(
            ContinuousForce::new(config.min_force, config.max_force, config.force_mag),
            Dynamics::new(&config.physics),
            CartPoleRules {
                bounds: CartPoleBounds::Position {
                    x_threshold: config.x_threshold,
                },
                upright: UprightReward {
                    height_threshold: config.height_threshold,
                    theta_dot_threshold: config.theta_dot_threshold,
                    x_reward_threshold: config.x_reward_threshold,
                    move_cost: config.move_cost,
                },
            },
            SwingUpEncoder::new(config.x_threshold),
            Some(config.start_position),
        );
        Ok(Self { config, episode })
    }
}

impl CartPoleContinuous {
    pub fn new(config: BalanceConfig) -> Result<Self> {
        config.validate()?;
        let episode = CartPoleEpisode::new(
            ContinuousForce::new(config.min_force, config.max_force, config.force_mag),
            Dynamics::new(&config.physics),
            CartPoleRules {
                bounds: CartPoleBounds::PositionAndAngle {
                    x_threshold: config.x_threshold,
                    theta_threshold: config.theta_threshold,
                },
                upright: UprightReward {
                    height_threshold: config.height_threshold,
                    theta_dot_threshold: config.theta_dot_threshold,
                    x_reward_threshold: config.x_reward_threshold,
                    move_cost: config.move_cost,
                },
            },
            SwingUpEncoder::new(config.x_threshold),
            None,
        );
        Ok(Self { config, episode })
    }
}

impl<C, A> CartPoleEnv<C, A>
where
    A: ActionAdapter<Output = f64>,
{
    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn state(&self) -> &CartPoleState {
        self.episode.state()
    }

    pub fn dynamics(&self) -> &Dynamics {
        self.episode.dynamics()
    }

    pub fn is_done(&self) -> bool {
        self.episode.is_done()
    }

    pub fn steps_beyond_done(&self) -> Option<u32> {
        self.episode.steps_beyond_done()
    }
}

impl<C, A> Environment for CartPoleEnv<C, A>
where
    A: ActionAdapter<Output = f64>,
{
    type Observation = CartPoleObservation;
    type Action = A::Action;

    fn reset(&mut self) -> CartPoleObservation {
        self.episode.reset()
    }

    fn step(&mut self, action: &A::Action) -> Result<StepResult<CartPoleObservation>> {
        self.episode.step(action)
    }

    fn seed(&mut self, seed: Option<u64>) -> Vec<u64> {
        self.episode.seed(seed)
    }

    fn current_observation(&self) -> CartPoleObservation {
        self.episode.current_observation()
    }

    fn action_space(&self) -> Space {
        self.episode.action_space()
    }

    fn observation_space(&self) -> BoxSpace {
        self.episode.observation_space()
    }
}
