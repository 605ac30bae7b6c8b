//! 单个 episode 的可变状态：物理状态、随机数发生器和结束计数。
//!
//! 具体环境由这里的两个结构体组合出来：动作转换、动力学、奖励判定和观测编码
//! 都作为字段传入，而不是通过继承共享。

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::action::ActionAdapter;
use crate::config::StartPosition;
use crate::environment::{Environment, Info, StepResult};
use crate::error::{EnvError, Result};
use crate::observation::{
    CartPoleObservation, ObservationEncoder, PlanarEncoder, PlanarObservation, SwingUpEncoder,
};
use crate::physics::{CartPoleState, Dynamics};
use crate::puddle::PuddleField;
use crate::spaces::{BoxSpace, Space};
use crate::termination::{CartPoleRules, Outcome, TerminationRewardPolicy};

/// 初始状态各分量的均匀采样半宽
const INIT_RANGE: f64 = 0.05;

/// 用给定种子（或系统熵）构造随机数发生器，同时返回实际使用的种子
pub(crate) fn seeded_rng(seed: Option<u64>) -> (StdRng, u64) {
    let seed = seed.unwrap_or_else(rand::random);
    (StdRng::seed_from_u64(seed), seed)
}

pub struct CartPoleEpisode<A> {
    adapter: A,
    dynamics: Dynamics,
    policy: TerminationRewardPolicy<CartPoleRules>,
    encoder: SwingUpEncoder,
    /// `None` 表示保持竖直附近的初始角度
    start_position: Option<StartPosition>,
    state: CartPoleState,
    rng: StdRng,
}

impl<A> CartPoleEpisode<A>
where
    A: ActionAdapter<Output = f64>,
{
    pub fn new(
        adapter: A,
        dynamics: Dynamics,
        rules: CartPoleRules,
        encoder: SwingUpEncoder,
        start_position: Option<StartPosition>,
    ) -> Self {
        let (rng, _) = seeded_rng(None);
        Self {
            adapter,
            dynamics,
            policy: TerminationRewardPolicy::new(rules),
            encoder,
            start_position,
            state: CartPoleState::default(),
            rng,
        }
    }

    pub fn state(&self) -> &CartPoleState {
        &self.state
    }

    pub fn dynamics(&self) -> &Dynamics {
        &self.dynamics
    }

    pub fn is_done(&self) -> bool {
        self.policy.is_terminated()
    }

    pub fn steps_beyond_done(&self) -> Option<u32> {
        self.policy.steps_beyond_done()
    }
}

impl<A> Environment for CartPoleEpisode<A>
where
    A: ActionAdapter<Output = f64>,
{
    type Observation = CartPoleObservation;
    type Action = A::Action;

    fn reset(&mut self) -> CartPoleObservation {
        let mut state = CartPoleState::new(
            self.rng.random_range(-INIT_RANGE..INIT_RANGE),
            self.rng.random_range(-INIT_RANGE..INIT_RANGE),
            self.rng.random_range(-INIT_RANGE..INIT_RANGE),
            self.rng.random_range(-INIT_RANGE..INIT_RANGE),
        );
        match self.start_position {
            Some(StartPosition::Arbitrary) => state.theta = self.rng.random_range(-PI..PI),
            Some(StartPosition::Bottom) => state.theta += PI,
            None => {}
        }
        self.state = state;
        self.policy.reset();
        self.current_observation()
    }

    fn step(&mut self, action: &A::Action) -> Result<StepResult<CartPoleObservation>> {
        let force = self.adapter.adapt(action)?;

        // 已经结束：不再推进物理状态
        let Outcome { reward, done } = if self.policy.is_terminated() {
            self.policy.beyond_done()
        } else {
            self.state = self.dynamics.step(&self.state, force);
            self.policy.evaluate(&self.state)
        };

        Ok(StepResult {
            observation: self.current_observation(),
            reward,
            done,
            info: Info::new(),
        })
    }

    fn seed(&mut self, seed: Option<u64>) -> Vec<u64> {
        let (rng, seed) = seeded_rng(seed);
        self.rng = rng;
        vec![seed]
    }

    fn current_observation(&self) -> CartPoleObservation {
        self.encoder.encode(&self.state)
    }

    fn action_space(&self) -> Space {
        self.adapter.space()
    }

    fn observation_space(&self) -> BoxSpace {
        self.encoder.space()
    }
}

pub struct PlanarEpisode<A> {
    adapter: A,
    policy: TerminationRewardPolicy<PuddleField>,
    encoder: PlanarEncoder,
    noise: f64,
    start_positions: Option<Vec<[f64; 2]>>,
    state: [f64; 2],
    rng: StdRng,
}

impl<A> PlanarEpisode<A>
where
    A: ActionAdapter<Output = [f64; 2]>,
{
    pub fn new(
        adapter: A,
        field: PuddleField,
        noise: f64,
        start_positions: Option<Vec<[f64; 2]>>,
    ) -> Result<Self> {
        if start_positions.as_ref().is_some_and(Vec::is_empty) {
            return Err(EnvError::Configuration(
                "start_positions must not be empty".to_string(),
            ));
        }
        let (rng, _) = seeded_rng(None);
        Ok(Self {
            adapter,
            policy: TerminationRewardPolicy::new(field),
            encoder: PlanarEncoder,
            noise,
            start_positions,
            state: [0.0; 2],
            rng,
        })
    }

    pub fn state(&self) -> &[f64; 2] {
        &self.state
    }

    pub fn field(&self) -> &PuddleField {
        self.policy.rule()
    }

    pub fn is_done(&self) -> bool {
        self.policy.is_terminated()
    }

    pub fn steps_beyond_done(&self) -> Option<u32> {
        self.policy.steps_beyond_done()
    }
}

impl<A> Environment for PlanarEpisode<A>
where
    A: ActionAdapter<Output = [f64; 2]>,
{
    type Observation = PlanarObservation;
    type Action = A::Action;

    fn reset(&mut self) -> PlanarObservation {
        self.state = match &self.start_positions {
            Some(pool) => pool[self.rng.random_range(0..pool.len())],
            None => loop {
                let candidate = [self.rng.random::<f64>(), self.rng.random::<f64>()];
                if !PuddleField::is_goal(&candidate) {
                    break candidate;
                }
            },
        };
        self.policy.reset();
        self.current_observation()
    }

    fn step(&mut self, action: &A::Action) -> Result<StepResult<PlanarObservation>> {
        let displacement = self.adapter.adapt(action)?;

        let Outcome { reward, done } = if self.policy.is_terminated() {
            self.policy.beyond_done()
        } else {
            // 两个坐标共用同一个噪声采样
            let z: f64 = self.rng.sample(StandardNormal);
            let noise = z * self.noise;
            self.state = [0, 1].map(|i| (self.state[i] + displacement[i] + noise).clamp(0.0, 1.0));
            self.policy.evaluate(&self.state)
        };

        Ok(StepResult {
            observation: self.current_observation(),
            reward,
            done,
            info: Info::new(),
        })
    }

    fn seed(&mut self, seed: Option<u64>) -> Vec<u64> {
        let (rng, seed) = seeded_rng(seed);
        self.rng = rng;
        vec![seed]
    }

    fn current_observation(&self) -> PlanarObservation {
        self.encoder.encode(&self.state)
    }

    fn action_space(&self) -> Space {
        self.adapter.space()
    }

    fn observation_space(&self) -> BoxSpace {
        self.encoder.space()
    }
}
