//! 用随机策略跑若干 episode，输出回报统计。
//!
//! ```text
//! rollout --env CartPoleSwingUp-v0 --episodes 20 --seed 0
//! ```

use anyhow::Result;
use clap::Parser;

use swingup::environment::Environment;
use swingup::policy::{Policy, RandomPolicy};
use swingup::records::Records;
use swingup::registry;

#[derive(Parser, Debug)]
#[command(about = "Run random rollouts in a registered environment")]
struct Args {
    /// Registered environment id
    #[arg(long, default_value = "CartPoleSwingUp-v0")]
    env: String,

    #[arg(long, default_value_t = 10)]
    episodes: usize,

    /// Seed for both the environment and the policy
    #[arg(long)]
    seed: Option<u64>,

    /// Step budget per episode for environments without a time limit
    #[arg(long, default_value_t = 1000)]
    max_steps: usize,

    /// Log a summary every N episodes
    #[arg(long, default_value_t = 5)]
    log_interval: usize,

    /// Write a plot of episode returns to this PNG file
    #[cfg(feature = "plot")]
    #[arg(long)]
    plot: Option<std::path::PathBuf>,

    /// List registered environment ids and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    if args.list {
        for spec in registry::specs() {
            println!("{}", spec.id);
        }
        return Ok(());
    }

    let mut env = registry::make(&args.env)?;
    let seed = env.seed(args.seed)[0];
    tracing::info!("Running {} episodes of {} (seed = {})", args.episodes, args.env, seed);

    let mut policy = RandomPolicy::new(env.action_space(), Some(seed));
    let mut records = Records::new(&args.env).with_stdout(args.log_interval, &["episode"]);

    for episode in 0..args.episodes {
        let mut observation = env.reset();
        let mut total_reward = 0.0;
        let mut length = 0;
        loop {
            let action = policy.select_action(&observation);
            let result = env.step(&action)?;
            total_reward += result.reward;
            length += 1;
            observation = result.observation;
            if result.done || length >= args.max_steps {
                break;
            }
        }
        records.submit([
            ("episode", episode as f64),
            ("return", total_reward),
            ("length", length as f64),
        ])?;
    }

    #[cfg(feature = "plot")]
    {
        if let (Some(path), Some(returns)) = (&args.plot, records.series("return")) {
            swingup::utils::plot_series(returns, path, &args.env, "Total Reward")
                .map_err(|e| anyhow::anyhow!("failed to plot returns: {e}"))?;
        }
    }

    Ok(())
}
