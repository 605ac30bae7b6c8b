//! 奖励与结束判定，以及结束之后继续 `step()` 的处理。

use crate::physics::CartPoleState;

/// 判定单个状态是否结束以及对应的奖励
pub trait Termination {
    type State;

    fn is_terminal(&self, state: &Self::State) -> bool;

    fn reward(&self, state: &Self::State) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EpisodePhase {
    #[default]
    Running,
    /// `grace` 为结束之后又调用 `step()` 的次数
    Terminated { grace: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub reward: f64,
    pub done: bool,
}

/// 把 [`Termination`] 包装成两态状态机
#[derive(Debug, Clone, PartialEq)]
pub struct TerminationRewardPolicy<T> {
    rule: T,
    phase: EpisodePhase,
}

impl<T: Termination> TerminationRewardPolicy<T> {
    pub fn new(rule: T) -> Self {
        Self {
            rule,
            phase: EpisodePhase::Running,
        }
    }

    pub fn rule(&self) -> &T {
        &self.rule
    }

    pub fn phase(&self) -> EpisodePhase {
        self.phase
    }

    pub fn reset(&mut self) {
        self.phase = EpisodePhase::Running;
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.phase, EpisodePhase::Terminated { .. })
    }

    /// 结束之后的步数，未结束时为 `None`
    pub fn steps_beyond_done(&self) -> Option<u32> {
        match self.phase {
            EpisodePhase::Running => None,
            EpisodePhase::Terminated { grace } => Some(grace),
        }
    }

    /// 对刚推进得到的新状态打分。结束的那一步仍然按正常规则给奖励。
    pub fn evaluate(&mut self, state: &T::State) -> Outcome {
        let done = self.rule.is_terminal(state);
        let reward = self.rule.reward(state);
        if done {
            self.phase = EpisodePhase::Terminated { grace: 0 };
        }
        Outcome { reward, done }
    }

    /// 已结束时再次 `step()`：奖励为 0，只在第一次发出警告
    pub fn beyond_done(&mut self) -> Outcome {
        if let EpisodePhase::Terminated { grace } = &mut self.phase {
            if *grace == 0 {
                tracing::warn!(
                    "You are calling 'step()' after the episode ending. \
                     Call 'reset()' before stepping again."
                );
            }
            *grace += 1;
        }
        Outcome {
            reward: 0.0,
            done: true,
        }
    }
}

/// 竖直奖励：满足条件得 1，且始终扣除移动成本
#[derive(Debug, Clone, PartialEq)]
pub struct UprightReward {
    pub height_threshold: f64,
    pub theta_dot_threshold: f64,
    pub x_reward_threshold: f64,
    pub move_cost: f64,
}

impl UprightReward {
    pub fn is_upright(&self, state: &CartPoleState) -> bool {
        state.theta.cos() > self.height_threshold
            && state.theta_dot.abs() < self.theta_dot_threshold
            && state.x.abs() < self.x_reward_threshold
    }

    pub fn reward(&self, state: &CartPoleState) -> f64 {
        if self.is_upright(state) {
            1.0 - self.move_cost
        } else {
            0.0 - self.move_cost
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CartPoleBounds {
    /// swing-up：只限制小车位置
    Position { x_threshold: f64 },
    /// 平衡任务：位置与角度都限制
    PositionAndAngle {
        x_threshold: f64,
        theta_threshold: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartPoleRules {
    pub bounds: CartPoleBounds,
    pub upright: UprightReward,
}

impl Termination for CartPoleRules {
    type State = CartPoleState;

    fn is_terminal(&self, state: &CartPoleState) -> bool {
        match self.bounds {
            CartPoleBounds::Position { x_threshold } => state.x.abs() > x_threshold,
            CartPoleBounds::PositionAndAngle {
                x_threshold,
                theta_threshold,
            } => state.x.abs() > x_threshold || state.theta.abs() > theta_threshold,
        }
    }

    fn reward(&self, state: &CartPoleState) -> f64 {
        self.upright.reward(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(bounds: CartPoleBounds) -> CartPoleRules {
        CartPoleRules {
            bounds,
            upright: UprightReward {
                height_threshold: 0.5,
                theta_dot_threshold: 1.0,
                x_reward_threshold: 1.0,
                move_cost: 0.1,
            },
        }
    }

    #[test]
    fn move_cost_applies_in_both_branches() {
        let r = rules(CartPoleBounds::Position { x_threshold: 3.0 });
        assert_eq!(r.reward(&CartPoleState::default()), 1.0 - 0.1);
        let hanging = CartPoleState::new(0.0, 0.0, std::f64::consts::PI, 0.0);
        assert_eq!(r.reward(&hanging), -0.1);
        let spinning = CartPoleState::new(0.0, 0.0, 0.0, 2.0);
        assert_eq!(r.reward(&spinning), -0.1);
    }

    #[test]
    fn swing_up_ignores_angle() {
        let r = rules(CartPoleBounds::Position { x_threshold: 3.0 });
        assert!(!r.is_terminal(&CartPoleState::new(0.0, 0.0, 10.0, 0.0)));
        assert!(r.is_terminal(&CartPoleState::new(-3.01, 0.0, 0.0, 0.0)));

        let balance = rules(CartPoleBounds::PositionAndAngle {
            x_threshold: 2.4,
            theta_threshold: 0.2,
        });
        assert!(balance.is_terminal(&CartPoleState::new(0.0, 0.0, -0.21, 0.0)));
        assert!(balance.is_terminal(&CartPoleState::new(2.5, 0.0, 0.0, 0.0)));
        assert!(!balance.is_terminal(&CartPoleState::new(2.3, 0.0, 0.19, 0.0)));
    }

    #[test]
    fn grace_counter_after_termination() {
        let mut policy = TerminationRewardPolicy::new(rules(CartPoleBounds::Position {
            x_threshold: 3.0,
        }));
        assert_eq!(policy.steps_beyond_done(), None);

        let outcome = policy.evaluate(&CartPoleState::new(4.0, 0.0, 0.0, 0.0));
        assert!(outcome.done);
        assert_eq!(outcome.reward, -0.1);
        assert_eq!(policy.steps_beyond_done(), Some(0));

        for expected in 1..=3 {
            let outcome = policy.beyond_done();
            assert_eq!(outcome, Outcome { reward: 0.0, done: true });
            assert_eq!(policy.steps_beyond_done(), Some(expected));
        }

        policy.reset();
        assert_eq!(policy.phase(), EpisodePhase::Running);
    }
}
