use rand::Rng;
use rand::rngs::StdRng;

use crate::episode::seeded_rng;
use crate::registry::Action;
use crate::spaces::Space;

pub trait Policy<S, A> {
    // 根据观测选择动作
    fn select_action(&mut self, state: &S) -> A;
}

/// 在动作空间中均匀采样
pub struct RandomPolicy {
    space: Space,
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(space: Space, seed: Option<u64>) -> Self {
        let (rng, _) = seeded_rng(seed);
        Self { space, rng }
    }
}

impl<S> Policy<S, Action> for RandomPolicy {
    fn select_action(&mut self, _state: &S) -> Action {
        match &self.space {
            Space::Discrete(n) => Action::Discrete(self.rng.random_range(0..*n)),
            Space::Box(b) => Action::Continuous(b.sample(&mut self.rng)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spaces::BoxSpace;

    #[test]
    fn samples_follow_the_space() {
        let mut discrete = RandomPolicy::new(Space::Discrete(3), Some(1));
        for _ in 0..20 {
            match discrete.select_action(&()) {
                Action::Discrete(i) => assert!(i < 3),
                other => panic!("unexpected {other:?}"),
            }
        }

        let space = BoxSpace::uniform(2, -0.1, 0.1);
        let mut continuous = RandomPolicy::new(Space::Box(space.clone()), Some(1));
        match continuous.select_action(&()) {
            Action::Continuous(v) => assert!(space.contains(&v)),
            other => panic!("unexpected {other:?}"),
        }
    }
}
