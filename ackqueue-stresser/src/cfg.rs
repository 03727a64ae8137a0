use clap::Parser;
use libackqueue::QueueCfg;
use libackqueue::DEFAULT_MAX_DELIVERY_TAG;
use serde::Deserialize;
use std::env::var;
use std::env::var_os;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

// We cannot simply rely on default value if omitted, as we need to differentiate between a set (but empty/default) value and an omitted value to know if they override/are overriden by defaults, env vars, CLI, etc.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
  /// Path to a YAML config file.
  #[arg(long)]
  config: Option<PathBuf>,

  /// Messages to push. Defaults to 100000.
  #[arg(long)]
  messages: Option<u64>,

  /// Concurrent producer tasks. Defaults to 4.
  #[arg(long)]
  producers: Option<u64>,

  /// Concurrent consumer tasks. Defaults to 64.
  #[arg(long)]
  consumers: Option<u64>,

  /// Percentage of deliveries that are nacked instead of acked. Defaults to 10.
  #[arg(long)]
  nack_percent: Option<u8>,

  /// Upper bound of the delivery tag range. Defaults to 100000.
  #[arg(long)]
  max_delivery_tag: Option<u64>,

  /// Seconds between progress reports. Defaults to 3.
  #[arg(long)]
  progress_interval_sec: Option<u64>,
}

#[derive(Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CfgFile {
  messages: Option<u64>,
  producers: Option<u64>,
  consumers: Option<u64>,
  nack_percent: Option<u8>,
  max_delivery_tag: Option<u64>,
  progress_interval_sec: Option<u64>,
}

pub(crate) struct Cfg {
  pub messages: u64,
  pub producers: u64,
  pub consumers: u64,
  pub nack_percent: u8,
  pub queue: QueueCfg,
  pub progress_interval: Duration,
}

pub(crate) fn env_parsed<T: FromStr>(name: &str) -> Option<T> {
  let raw = var(name).ok()?;
  let Ok(parsed) = raw.parse::<T>() else {
    panic!("invalid {name}");
  };
  Some(parsed)
}

fn env_path(name: &str) -> Option<PathBuf> {
  let raw = var_os(name)?;
  Some(PathBuf::from(raw))
}

// Precedence:
// - Lowest: config file.
// - Then: env vars.
// - Highest: CLI args.
pub(crate) fn load_cfg() -> Cfg {
  let cli = Cli::parse();

  let f = cli
    .config
    .or_else(|| env_path("ACKQUEUE_CONFIG"))
    .map(|cfg_path| {
      info!(path = format!("{:?}", cfg_path), "loading config file");
      let raw = std::fs::read_to_string(&cfg_path).expect("failed to read config file");
      let cfg: CfgFile = serde_yaml::from_str(&raw).expect("failed to parse config file");
      cfg
    })
    .unwrap_or_default();

  let cfg = Cfg {
    messages: cli
      .messages
      .or(env_parsed("ACKQUEUE_MESSAGES"))
      .or(f.messages)
      .unwrap_or(100_000),

    producers: cli
      .producers
      .or(env_parsed("ACKQUEUE_PRODUCERS"))
      .or(f.producers)
      .unwrap_or(4),

    consumers: cli
      .consumers
      .or(env_parsed("ACKQUEUE_CONSUMERS"))
      .or(f.consumers)
      .unwrap_or(64),

    nack_percent: cli
      .nack_percent
      .or(env_parsed("ACKQUEUE_NACK_PERCENT"))
      .or(f.nack_percent)
      .unwrap_or(10),

    queue: QueueCfg {
      max_delivery_tag: cli
        .max_delivery_tag
        .or(env_parsed("ACKQUEUE_MAX_DELIVERY_TAG"))
        .or(f.max_delivery_tag)
        .unwrap_or(DEFAULT_MAX_DELIVERY_TAG),
    },

    progress_interval: Duration::from_secs(
      cli
        .progress_interval_sec
        .or(env_parsed("ACKQUEUE_PROGRESS_INTERVAL_SEC"))
        .or(f.progress_interval_sec)
        .unwrap_or(3),
    ),
  };
  assert!(cfg.nack_percent < 100, "nack_percent must be below 100");
  assert!(cfg.producers > 0, "at least one producer is required");
  assert!(cfg.consumers > 0, "at least one consumer is required");
  cfg
}
