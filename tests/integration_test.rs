use swingup::config::SwingUpConfig;
use swingup::environment::Environment;
use swingup::environments::CartPoleSwingUp;
use swingup::policy::{Policy, RandomPolicy};
use swingup::registry::{self, Action};
use swingup::wrappers::{TRUNCATED_KEY, TimeLimit};

#[test]
fn random_rollouts_in_every_registered_environment() {
    for spec in registry::specs() {
        let mut env = spec.make().unwrap();
        env.seed(Some(0));
        let mut policy = RandomPolicy::new(env.action_space(), Some(0));
        let dim = env.observation_dim();

        for _ in 0..2 {
            let mut obs = env.reset();
            assert_eq!(obs.len(), dim, "{}", spec.id);
            for _ in 0..200 {
                let action = policy.select_action(&obs);
                let result = env.step(&action).unwrap();
                assert!(result.reward.is_finite());
                obs = result.observation;
                if result.done {
                    break;
                }
            }
        }
    }
}

#[test]
fn time_limit_truncates_long_episodes() {
    let env = CartPoleSwingUp::new(SwingUpConfig {
        allow_noop: true,
        x_threshold: 100.0,
        ..Default::default()
    })
    .unwrap();
    let mut env = TimeLimit::new(env, Some(5));
    env.seed(Some(1));

    for _ in 0..2 {
        env.reset();
        for t in 1..=5 {
            let result = env.step(&2).unwrap();
            assert_eq!(result.done, t == 5);
            assert_eq!(result.info.contains_key(TRUNCATED_KEY), t == 5);
        }
        assert_eq!(env.elapsed_steps(), 5);
    }
}

#[test]
fn registry_environments_are_deterministic() {
    let run = |id: &str| {
        let mut env = registry::make(id).unwrap();
        env.seed(Some(77));
        let mut trajectory = vec![env.reset()];
        for t in 0..30 {
            let action = match env.action_space() {
                swingup::spaces::Space::Discrete(n) => Action::Discrete(t % n),
                swingup::spaces::Space::Box(b) => Action::Continuous(b.low.clone()),
            };
            trajectory.push(env.step(&action).unwrap().observation);
        }
        trajectory
    };
    for id in ["CartPoleSwingUp-v0", "CartPoleSwingUpContinuous-v3", "PuddleWorld-v0"] {
        assert_eq!(run(id), run(id));
    }
}

#[test]
fn swing_up_registry_uses_bottom_start() {
    let mut env = registry::make("CartPoleSwingUp-v2").unwrap();
    env.seed(Some(10));
    let obs = env.reset();
    // cos(theta) 接近 -1
    assert!(obs[3] < -0.99);
    assert_eq!(env.max_episode_steps(), Some(1000));
    assert_eq!(env.action_space(), swingup::spaces::Space::Discrete(2));
}
