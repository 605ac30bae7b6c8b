use crate::action::{ActionAdapter, DiscreteDisplacement, PlanarDisplacement};
use crate::config::PuddleWorldConfig;
use crate::environment::{Environment, StepResult};
use crate::episode::PlanarEpisode;
use crate::error::Result;
use crate::observation::PlanarObservation;
use crate::puddle::{PuddleField, point2};
use crate::spaces::{BoxSpace, Space};

/// 在 [0,1]^2 中移动，目标是右上角（坐标和大于 1.9）。每步基础奖励为
/// `-0.01`，靠近 puddle 额外扣分，到达目标得 `0.1`。
pub struct PlanarEnv<A> {
    config: PuddleWorldConfig,
    episode: PlanarEpisode<A>,
}

/// 连续动作的 puddle world，位移逐坐标截断到 `[-action_scale, action_scale]`
pub type ContinuousPuddleWorld = PlanarEnv<PlanarDisplacement>;

/// 离散动作的 puddle world：0 右，1 上，2 左，3 下，每步移动 0.05
pub type PuddleWorld = PlanarEnv<DiscreteDisplacement>;

impl ContinuousPuddleWorld {
    pub fn new(config: PuddleWorldConfig) -> Result<Self> {
        let adapter = PlanarDisplacement::new(config.action_scale);
        PlanarEnv::build(config, adapter)
    }
}

impl PuddleWorld {
    pub fn new(config: PuddleWorldConfig) -> Result<Self> {
        PlanarEnv::build(config, DiscreteDisplacement::default())
    }
}

impl<A> PlanarEnv<A>
where
    A: ActionAdapter<Output = [f64; 2]>,
{
    fn build(config: PuddleWorldConfig, adapter: A) -> Result<Self> {
        config.validate()?;
        let field = PuddleField::from_nested(&config.puddles)?;
        let start_positions = config
            .start_positions
            .as_ref()
            .map(|pool| {
                pool.iter()
                    .enumerate()
                    .map(|(i, p)| point2(p, i))
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;
        let episode = PlanarEpisode::new(adapter, field, config.noise, start_positions)?;
        Ok(Self { config, episode })
    }

    pub fn config(&self) -> &PuddleWorldConfig {
        &self.config
    }

    pub fn state(&self) -> &[f64; 2] {
        self.episode.state()
    }

    pub fn field(&self) -> &PuddleField {
        self.episode.field()
    }

    pub fn is_done(&self) -> bool {
        self.episode.is_done()
    }

    pub fn steps_beyond_done(&self) -> Option<u32> {
        self.episode.steps_beyond_done()
    }
}

impl<A> Environment for PlanarEnv<A>
where
    A: ActionAdapter<Output = [f64; 2]>,
{
    type Observation = PlanarObservation;
    type Action = A::Action;

    fn reset(&mut self) -> PlanarObservation {
        self.episode.reset()
    }

    fn step(&mut self, action: &A::Action) -> Result<StepResult<PlanarObservation>> {
        self.episode.step(action)
    }

    fn seed(&mut self, seed: Option<u64>) -> Vec<u64> {
        self.episode.seed(seed)
    }

    fn current_observation(&self) -> PlanarObservation {
        self.episode.current_observation()
    }

    fn action_space(&self) -> Space {
        self.episode.action_space()
    }

    fn observation_space(&self) -> BoxSpace {
        self.episode.observation_space()
    }
}
