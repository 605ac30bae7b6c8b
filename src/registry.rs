//! 按 id 构造预设环境。
//!
//! 各环境的动作类型不同，`make` 返回统一的 [`AnyEnv`]，动作用 [`Action`] 表示，
//! 观测展开成 `Vec<f64>`。

use crate::config::{
    BalanceConfig, ContinuousSwingUpConfig, PuddleWorldConfig, StartPosition, SwingUpConfig,
};
use crate::environment::{Environment, StepResult};
use crate::environments::{
    CartPoleContinuous, CartPoleSwingUp, CartPoleSwingUpContinuous, ContinuousPuddleWorld,
    PuddleWorld,
};
use crate::error::{EnvError, Result};
use crate::spaces::{BoxSpace, Space};
use crate::wrappers::TimeLimit;

const SWING_UP_MAX_STEPS: u32 = 1000;
const SWING_UP_REWARD_THRESHOLD: f64 = 800.0;

#[derive(Debug, Clone, PartialEq)]
pub enum EnvKind {
    SwingUp(SwingUpConfig),
    SwingUpContinuous(ContinuousSwingUpConfig),
    Balance(BalanceConfig),
    ContinuousPuddleWorld(PuddleWorldConfig),
    PuddleWorld(PuddleWorldConfig),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnvSpec {
    pub id: String,
    pub kind: EnvKind,
    pub max_episode_steps: Option<u32>,
    pub reward_threshold: Option<f64>,
}

impl EnvSpec {
    fn swing_up(id: String, kind: EnvKind) -> Self {
        Self {
            id,
            kind,
            max_episode_steps: Some(SWING_UP_MAX_STEPS),
            reward_threshold: Some(SWING_UP_REWARD_THRESHOLD),
        }
    }

    pub fn make(&self) -> Result<TimeLimit<AnyEnv>> {
        let env = match &self.kind {
            EnvKind::SwingUp(c) => AnyEnv::SwingUp(CartPoleSwingUp::new(c.clone())?),
            EnvKind::SwingUpContinuous(c) => {
                AnyEnv::SwingUpContinuous(CartPoleSwingUpContinuous::new(c.clone())?)
            }
            EnvKind::Balance(c) => AnyEnv::Balance(CartPoleContinuous::new(c.clone())?),
            EnvKind::ContinuousPuddleWorld(c) => {
                AnyEnv::ContinuousPuddleWorld(ContinuousPuddleWorld::new(c.clone())?)
            }
            EnvKind::PuddleWorld(c) => AnyEnv::PuddleWorld(PuddleWorld::new(c.clone())?),
        };
        Ok(TimeLimit::new(env, self.max_episode_steps))
    }
}

fn swing_up_presets() -> Vec<SwingUpConfig> {
    let base = SwingUpConfig {
        start_position: StartPosition::Bottom,
        ..Default::default()
    };
    vec![
        // 与 bsuite 相同
        SwingUpConfig {
            allow_noop: true,
            ..base.clone()
        },
        // 困难
        SwingUpConfig {
            allow_noop: true,
            height_threshold: 0.9,
            ..base.clone()
        },
        // 无 noop
        base.clone(),
        // 简单
        SwingUpConfig {
            height_threshold: 0.0,
            theta_dot_threshold: 1.5,
            x_reward_threshold: 1.5,
            ..base
        },
        // 任意初始角度
        SwingUpConfig {
            start_position: StartPosition::Arbitrary,
            ..Default::default()
        },
    ]
}

fn continuous_swing_up_presets() -> Vec<ContinuousSwingUpConfig> {
    let base = ContinuousSwingUpConfig {
        start_position: StartPosition::Bottom,
        ..Default::default()
    };
    vec![
        base.clone(),
        ContinuousSwingUpConfig {
            height_threshold: 0.9,
            ..base.clone()
        },
        ContinuousSwingUpConfig {
            height_threshold: 0.0,
            theta_dot_threshold: 1.5,
            x_reward_threshold: 1.5,
            ..base
        },
        ContinuousSwingUpConfig {
            start_position: StartPosition::Arbitrary,
            ..Default::default()
        },
    ]
}

/// 所有预设
pub fn specs() -> Vec<EnvSpec> {
    let mut specs = Vec::new();
    for (i, config) in swing_up_presets().into_iter().enumerate() {
        specs.push(EnvSpec::swing_up(
            format!("CartPoleSwingUp-v{i}"),
            EnvKind::SwingUp(config),
        ));
    }
    for (i, config) in continuous_swing_up_presets().into_iter().enumerate() {
        specs.push(EnvSpec::swing_up(
            format!("CartPoleSwingUpContinuous-v{i}"),
            EnvKind::SwingUpContinuous(config),
        ));
    }
    specs.push(EnvSpec {
        id: "CartPoleContinuous-v0".to_string(),
        kind: EnvKind::Balance(BalanceConfig::default()),
        max_episode_steps: None,
        reward_threshold: None,
    });
    specs.push(EnvSpec {
        id: "ContinuousPuddleWorld-v0".to_string(),
        kind: EnvKind::ContinuousPuddleWorld(PuddleWorldConfig::default()),
        max_episode_steps: None,
        reward_threshold: None,
    });
    specs.push(EnvSpec {
        id: "PuddleWorld-v0".to_string(),
        kind: EnvKind::PuddleWorld(PuddleWorldConfig::default()),
        max_episode_steps: None,
        reward_threshold: None,
    });
    specs
}

pub fn spec(id: &str) -> Result<EnvSpec> {
    specs()
        .into_iter()
        .find(|s| s.id == id)
        .ok_or_else(|| EnvError::UnknownEnvironment(id.to_string()))
}

pub fn make(id: &str) -> Result<TimeLimit<AnyEnv>> {
    spec(id)?.make()
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Discrete(usize),
    Continuous(Vec<f64>),
}

pub enum AnyEnv {
    SwingUp(CartPoleSwingUp),
    SwingUpContinuous(CartPoleSwingUpContinuous),
    Balance(CartPoleContinuous),
    ContinuousPuddleWorld(ContinuousPuddleWorld),
    PuddleWorld(PuddleWorld),
}

fn discrete(action: &Action) -> Result<usize> {
    match action {
        Action::Discrete(i) => Ok(*i),
        other => Err(EnvError::InvalidAction(format!(
            "expected a discrete action, got {other:?}"
        ))),
    }
}

fn continuous<const N: usize>(action: &Action) -> Result<[f64; N]> {
    match action {
        Action::Continuous(v) => <[f64; N]>::try_from(v.as_slice()).map_err(|_| {
            EnvError::InvalidAction(format!("expected {N} components, got {}", v.len()))
        }),
        other => Err(EnvError::InvalidAction(format!(
            "expected a continuous action, got {other:?}"
        ))),
    }
}

fn flatten<O: AsRef<[f64]>>(result: StepResult<O>) -> StepResult<Vec<f64>> {
    StepResult {
        observation: result.observation.as_ref().to_vec(),
        reward: result.reward,
        done: result.done,
        info: result.info,
    }
}

impl Environment for AnyEnv {
    type Observation = Vec<f64>;
    type Action = Action;

    fn reset(&mut self) -> Vec<f64> {
        match self {
            AnyEnv::SwingUp(e) => e.reset().to_vec(),
            AnyEnv::SwingUpContinuous(e) => e.reset().to_vec(),
            AnyEnv::Balance(e) => e.reset().to_vec(),
            AnyEnv::ContinuousPuddleWorld(e) => e.reset().to_vec(),
            AnyEnv::PuddleWorld(e) => e.reset().to_vec(),
        }
    }

    fn step(&mut self, action: &Action) -> Result<StepResult<Vec<f64>>> {
        Ok(match self {
            AnyEnv::SwingUp(e) => flatten(e.step(&discrete(action)?)?),
            AnyEnv::SwingUpContinuous(e) => flatten(e.step(&continuous::<1>(action)?[0])?),
            AnyEnv::Balance(e) => flatten(e.step(&continuous::<1>(action)?[0])?),
            AnyEnv::ContinuousPuddleWorld(e) => flatten(e.step(&continuous::<2>(action)?)?),
            AnyEnv::PuddleWorld(e) => flatten(e.step(&discrete(action)?)?),
        })
    }

    fn seed(&mut self, seed: Option<u64>) -> Vec<u64> {
        match self {
            AnyEnv::SwingUp(e) => e.seed(seed),
            AnyEnv::SwingUpContinuous(e) => e.seed(seed),
            AnyEnv::Balance(e) => e.seed(seed),
            AnyEnv::ContinuousPuddleWorld(e) => e.seed(seed),
            AnyEnv::PuddleWorld(e) => e.seed(seed),
        }
    }

    fn current_observation(&self) -> Vec<f64> {
        match self {
            AnyEnv::SwingUp(e) => e.current_observation().to_vec(),
            AnyEnv::SwingUpContinuous(e) => e.current_observation().to_vec(),
            AnyEnv::Balance(e) => e.current_observation().to_vec(),
            AnyEnv::ContinuousPuddleWorld(e) => e.current_observation().to_vec(),
            AnyEnv::PuddleWorld(e) => e.current_observation().to_vec(),
        }
    }

    fn action_space(&self) -> Space {
        match self {
            AnyEnv::SwingUp(e) => e.action_space(),
            AnyEnv::SwingUpContinuous(e) => e.action_space(),
            AnyEnv::Balance(e) => e.action_space(),
            AnyEnv::ContinuousPuddleWorld(e) => e.action_space(),
            AnyEnv::PuddleWorld(e) => e.action_space(),
        }
    }

    fn observation_space(&self) -> BoxSpace {
        match self {
            AnyEnv::SwingUp(e) => e.observation_space(),
            AnyEnv::SwingUpContinuous(e) => e.observation_space(),
            AnyEnv::Balance(e) => e.observation_space(),
            AnyEnv::ContinuousPuddleWorld(e) => e.observation_space(),
            AnyEnv::PuddleWorld(e) => e.observation_space(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let specs = specs();
        let mut ids: Vec<_> = specs.iter().map(|s| s.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), specs.len());
        assert_eq!(specs.len(), 12);
    }

    #[test]
    fn swing_up_presets_match_their_names() {
        let EnvKind::SwingUp(v0) = spec("CartPoleSwingUp-v0").unwrap().kind else {
            panic!("v0 should be a discrete swing-up");
        };
        assert!(v0.allow_noop);
        assert_eq!(v0.start_position, StartPosition::Bottom);

        let EnvKind::SwingUp(v4) = spec("CartPoleSwingUp-v4").unwrap().kind else {
            panic!("v4 should be a discrete swing-up");
        };
        assert!(!v4.allow_noop);
        assert_eq!(v4.start_position, StartPosition::Arbitrary);

        let s = spec("CartPoleSwingUpContinuous-v1").unwrap();
        assert_eq!(s.max_episode_steps, Some(1000));
        assert_eq!(s.reward_threshold, Some(800.0));
    }

    #[test]
    fn unknown_id() {
        assert!(matches!(
            make("CartPoleSwingUp-v9"),
            Err(EnvError::UnknownEnvironment(_))
        ));
    }

    #[test]
    fn wrong_action_kind_is_rejected() {
        let mut env = make("CartPoleSwingUpContinuous-v0").unwrap();
        env.reset();
        assert!(env.step(&Action::Discrete(0)).is_err());
        assert!(env.step(&Action::Continuous(vec![0.1, 0.2])).is_err());
        assert!(env.step(&Action::Continuous(vec![0.1])).is_ok());
    }
}
