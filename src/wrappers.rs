use crate::environment::{Environment, StepResult};
use crate::error::Result;
use crate::spaces::{BoxSpace, Space};

pub const TRUNCATED_KEY: &str = "TimeLimit.truncated";

/// 限制每个 episode 的最大步数。
///
/// 步数用完而环境本身没有结束时，返回 `done = true`，并在 info 中写入
/// `"TimeLimit.truncated" = 1.0`。
pub struct TimeLimit<E> {
    env: E,
    max_episode_steps: Option<u32>,
    elapsed_steps: u32,
}

impl<E: Environment> TimeLimit<E> {
    pub fn new(env: E, max_episode_steps: Option<u32>) -> Self {
        Self {
            env,
            max_episode_steps,
            elapsed_steps: 0,
        }
    }

    pub fn inner(&self) -> &E {
        &self.env
    }

    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn into_inner(self) -> E {
        self.env
    }

    pub fn elapsed_steps(&self) -> u32 {
        self.elapsed_steps
    }

    pub fn max_episode_steps(&self) -> Option<u32> {
        self.max_episode_steps
    }
}

impl<E: Environment> Environment for TimeLimit<E> {
    type Observation = E::Observation;
    type Action = E::Action;

    fn reset(&mut self) -> Self::Observation {
        self.elapsed_steps = 0;
        self.env.reset()
    }

    fn step(&mut self, action: &Self::Action) -> Result<StepResult<Self::Observation>> {
        let mut result = self.env.step(action)?;
        self.elapsed_steps += 1;
        if let Some(max) = self.max_episode_steps {
            if self.elapsed_steps >= max && !result.done {
                result.info.insert(TRUNCATED_KEY.to_string(), 1.0);
                result.done = true;
            }
        }
        Ok(result)
    }

    fn seed(&mut self, seed: Option<u64>) -> Vec<u64> {
        self.env.seed(seed)
    }

    fn current_observation(&self) -> Self::Observation {
        self.env.current_observation()
    }

    fn action_space(&self) -> Space {
        self.env.action_space()
    }

    fn observation_space(&self) -> BoxSpace {
        self.env.observation_space()
    }
}
