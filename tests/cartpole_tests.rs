use std::f64::consts::PI;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use approx::assert_relative_eq;
use swingup::config::{BalanceConfig, ContinuousSwingUpConfig, StartPosition, SwingUpConfig};
use swingup::environment::Environment;
use swingup::environments::{CartPoleContinuous, CartPoleSwingUp, CartPoleSwingUpContinuous};
use swingup::error::EnvError;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

fn bottom_swing_up() -> CartPoleSwingUp {
    CartPoleSwingUp::new(SwingUpConfig {
        start_position: StartPosition::Bottom,
        allow_noop: false,
        ..Default::default()
    })
    .unwrap()
}

#[test]
fn bottom_start_then_one_push_matches_closed_form() {
    let mut env = bottom_swing_up();
    env.seed(Some(42));
    let obs = env.reset();
    let s0 = *env.state();

    // 杆朝下：theta = pi + 小偏移
    assert!((s0.theta - PI).abs() <= 0.05);
    assert!(s0.x.abs() <= 0.05 && s0.x_dot.abs() <= 0.05 && s0.theta_dot.abs() <= 0.05);
    assert!(obs[3] < -0.99);

    let (g, m_p, l, total, tau, force) = (9.8, 0.1, 0.5, 1.1, 0.02, 10.0);
    let (sin, cos) = (s0.theta.sin(), s0.theta.cos());
    let temp = (force + m_p * l * s0.theta_dot.powi(2) * sin) / total;
    let theta_acc = (g * sin - cos * temp) / (l * (4.0 / 3.0 - m_p * cos.powi(2) / total));
    let x_acc = temp - m_p * l * theta_acc * cos / total;

    let result = env.step(&1).unwrap();
    let s1 = *env.state();
    assert_relative_eq!(s1.x_dot - s0.x_dot, tau * x_acc, epsilon = 1e-12);
    assert_relative_eq!(s1.theta_dot - s0.theta_dot, tau * theta_acc, epsilon = 1e-12);
    // 半隐式欧拉：位置用更新后的速度
    assert_relative_eq!(s1.x, s0.x + tau * s1.x_dot, epsilon = 1e-12);
    assert!(!result.done);
    assert!(result.info.is_empty());
    // 杆朝下不满足竖直条件
    assert_relative_eq!(result.reward, -0.1);
}

#[test]
fn arbitrary_start_covers_a_full_rotation() {
    let mut env = CartPoleSwingUp::new(SwingUpConfig::default()).unwrap();
    env.seed(Some(3));
    let mut seen_large = false;
    for _ in 0..50 {
        env.reset();
        let theta = env.state().theta;
        assert!((-PI..PI).contains(&theta));
        seen_large |= theta.abs() > 1.0;
    }
    assert!(seen_large);
}

#[test]
fn invalid_discrete_action() {
    let mut env = bottom_swing_up();
    env.reset();
    assert!(matches!(env.step(&2), Err(EnvError::InvalidAction(_))));

    let mut with_noop = CartPoleSwingUp::new(SwingUpConfig {
        allow_noop: true,
        ..Default::default()
    })
    .unwrap();
    with_noop.reset();
    assert!(with_noop.step(&2).is_ok());
    assert!(with_noop.step(&3).is_err());
}

#[test]
fn stepping_after_done_returns_zero_reward() {
    let mut env = CartPoleSwingUp::new(SwingUpConfig {
        x_threshold: 0.1,
        ..Default::default()
    })
    .unwrap();
    env.seed(Some(0));
    env.reset();

    let mut steps = 0;
    while !env.step(&1).unwrap().done {
        steps += 1;
        assert!(steps < 200, "cart never left the track");
    }
    assert_eq!(env.steps_beyond_done(), Some(0));
    let stale = env.current_observation();

    for (i, action) in [0, 1, 0, 1].iter().enumerate() {
        let result = env.step(action).unwrap();
        assert_eq!(result.reward, 0.0);
        assert!(result.done);
        assert_eq!(result.observation, stale);
        assert_eq!(env.steps_beyond_done(), Some(i as u32 + 1));
    }

    // 非法动作仍然报错
    assert!(env.step(&5).is_err());

    env.reset();
    assert_eq!(env.steps_beyond_done(), None);
    assert!(!env.is_done());
}

#[test]
fn encoded_observations_stay_in_the_declared_box() {
    let mut env = CartPoleSwingUpContinuous::new(ContinuousSwingUpConfig::default()).unwrap();
    env.seed(Some(11));
    let space = env.observation_space();
    for episode in 0..5 {
        env.reset();
        for t in 0..300 {
            let action = ((episode * 31 + t * 7) % 11) as f64 / 5.0 - 1.0;
            let result = env.step(&action).unwrap();
            let obs = result.observation;
            assert_relative_eq!(obs[2].powi(2) + obs[3].powi(2), 1.0, epsilon = 1e-12);
            assert!(space.contains(&obs), "{obs:?} outside {space:?}");
            if result.done {
                break;
            }
        }
    }
}

#[test]
fn terminal_observation_is_inside_the_declared_box() {
    let mut env = CartPoleSwingUp::new(SwingUpConfig {
        x_threshold: 0.1,
        ..Default::default()
    })
    .unwrap();
    env.seed(Some(0));
    env.reset();
    let space = env.observation_space();

    let mut result = env.step(&1).unwrap();
    while !result.done {
        assert!(space.contains(&result.observation));
        result = env.step(&1).unwrap();
    }
    // 越界那一步 |x| > x_threshold
    assert!(result.observation[0].abs() > 1.0);
    assert!(space.contains(&result.observation), "{:?}", result.observation);

    let after = env.step(&0).unwrap();
    assert!(space.contains(&after.observation));
}

/// 统计 WARN 级别事件的 layer
struct WarnCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[test]
fn stepping_after_done_warns_once_per_episode() {
    let warnings = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));

    tracing::subscriber::with_default(subscriber, || {
        let mut env = CartPoleSwingUp::new(SwingUpConfig {
            x_threshold: 0.1,
            ..Default::default()
        })
        .unwrap();
        env.seed(Some(0));

        let run_past_the_end = |env: &mut CartPoleSwingUp| {
            env.reset();
            let mut steps = 0;
            while !env.step(&1).unwrap().done {
                steps += 1;
                assert!(steps < 200, "cart never left the track");
            }
            // 结束那一步本身不告警
            let before = warnings.load(Ordering::SeqCst);
            for _ in 0..5 {
                env.step(&0).unwrap();
            }
            assert_eq!(warnings.load(Ordering::SeqCst), before + 1);
        };

        run_past_the_end(&mut env);
        assert_eq!(warnings.load(Ordering::SeqCst), 1);
        run_past_the_end(&mut env);
        assert_eq!(warnings.load(Ordering::SeqCst), 2);
    });
}

#[test]
fn same_seed_same_trajectory() {
    let run = |seed| {
        let mut env = bottom_swing_up();
        env.seed(Some(seed));
        let mut trajectory = vec![env.reset()];
        for t in 0..100 {
            let result = env.step(&(t % 2)).unwrap();
            trajectory.push(result.observation);
        }
        trajectory
    };
    assert_eq!(run(5), run(5));
    assert_ne!(run(5)[0], run(6)[0]);
}

#[test]
fn seed_none_reports_a_reusable_seed() {
    let mut env = bottom_swing_up();
    let seed = env.seed(None);
    assert_eq!(seed.len(), 1);
    let first = env.reset();
    env.seed(Some(seed[0]));
    assert_eq!(env.reset(), first);
}

#[test]
fn continuous_force_is_clamped() {
    let make = || {
        let mut env = CartPoleSwingUpContinuous::new(ContinuousSwingUpConfig::default()).unwrap();
        env.seed(Some(9));
        env.reset();
        env
    };
    let (mut a, mut b) = (make(), make());
    let ra = a.step(&5.0).unwrap();
    let rb = b.step(&1.0).unwrap();
    assert_eq!(ra.observation, rb.observation);
}

#[test]
fn balance_ends_when_the_pole_falls() {
    let config = BalanceConfig::default();
    let mut env = CartPoleContinuous::new(config.clone()).unwrap();
    env.seed(Some(1));
    let obs = env.reset();
    // 从竖直附近开始
    assert!(obs[3] > 0.99);

    let mut done = false;
    for _ in 0..500 {
        if env.step(&0.0).unwrap().done {
            done = true;
            break;
        }
    }
    assert!(done);
    let s = env.state();
    assert!(s.theta.abs() > config.theta_threshold || s.x.abs() > config.x_threshold);
}

#[test]
fn swing_up_does_not_end_on_angle() {
    let mut env = bottom_swing_up();
    env.seed(Some(2));
    env.reset();
    // 不断施加同向力，杆会转过很大的角度，但只有小车越界才结束
    for _ in 0..20 {
        let result = env.step(&0).unwrap();
        assert_eq!(result.done, env.state().x.abs() > 3.0);
    }
}
