mod cfg;
mod panic;

use crate::cfg::env_parsed;
use crate::cfg::load_cfg;
use crate::panic::set_up_panic_hook;
use dashmap::DashMap;
use itertools::Itertools;
use libackqueue::op::result::OpError;
use libackqueue::AckQueue;
use rand::thread_rng;
use rand::Rng;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::spawn;
use tokio::task::yield_now;
use tokio::time::sleep;
use tokio::time::Instant;
use tracing::info;

#[derive(Default)]
struct TaskProgress {
  push: AtomicU64,
  get: AtomicU64,
  empty: AtomicU64,
  ack: AtomicU64,
  nack: AtomicU64,
}

#[tokio::main]
async fn main() {
  if env_parsed::<bool>("ACKQUEUE_LOG_JSON").unwrap_or(false) {
    tracing_subscriber::fmt().json().init();
  } else {
    tracing_subscriber::fmt::init();
  };
  set_up_panic_hook();

  let cfg = load_cfg();
  let queue = AckQueue::<u64>::with_cfg(cfg.queue).expect("invalid queue config");
  info!(
    messages = cfg.messages,
    producers = cfg.producers,
    consumers = cfg.consumers,
    nack_percent = cfg.nack_percent,
    max_delivery_tag = cfg.queue.max_delivery_tag,
    "starting"
  );

  let started = Instant::now();
  let progress = Arc::new(TaskProgress::default());
  let complete = Arc::new(AtomicBool::new(cfg.messages == 0));
  // Message ID to the delivery count it was acked on.
  let acked = Arc::new(DashMap::<u64, u32>::new());

  // Background loop to regularly print out progress.
  spawn({
    let complete = complete.clone();
    let progress = progress.clone();
    let queue = queue.clone();
    let interval = cfg.progress_interval;
    async move {
      while !complete.load(Ordering::Relaxed) {
        sleep(interval).await;
        info!(
          push = progress.push.load(Ordering::Relaxed),
          get = progress.get.load(Ordering::Relaxed),
          empty = progress.empty.load(Ordering::Relaxed),
          ack = progress.ack.load(Ordering::Relaxed),
          nack = progress.nack.load(Ordering::Relaxed),
          queue_len = queue.len(),
          in_flight = queue.in_flight_len(),
          "progress"
        );
      }
    }
  });

  let producers = (0..cfg.producers)
    .map(|p| {
      let progress = progress.clone();
      let queue = queue.clone();
      let step = usize::try_from(cfg.producers).unwrap();
      let messages = cfg.messages;
      spawn(async move {
        for (i, id) in (p..messages).step_by(step).enumerate() {
          queue.push(id);
          progress.push.fetch_add(1, Ordering::Relaxed);
          if i % 1024 == 1023 {
            yield_now().await;
          };
        }
      })
    })
    .collect_vec();

  let consumers = (0..cfg.consumers)
    .map(|_| {
      let acked = acked.clone();
      let complete = complete.clone();
      let progress = progress.clone();
      let queue = queue.clone();
      let messages = cfg.messages;
      let nack_percent = cfg.nack_percent;
      spawn(async move {
        while !complete.load(Ordering::Relaxed) {
          let d = match queue.get() {
            Ok(d) => d,
            Err(OpError::EmptyQueue | OpError::TagsExhausted) => {
              progress.empty.fetch_add(1, Ordering::Relaxed);
              // Keep this small so that total execution time is accurate.
              sleep(Duration::from_millis(1)).await;
              continue;
            }
            Err(err) => panic!("unexpected get error: {err}"),
          };
          progress.get.fetch_add(1, Ordering::Relaxed);
          let id = *d.body;
          assert!(id < messages, "delivered unknown message {id}");
          assert!(
            !acked.contains_key(&id),
            "message {id} delivered after it was acked"
          );

          if thread_rng().gen_range(0..100) < nack_percent {
            queue.nack(d.tag);
            progress.nack.fetch_add(1, Ordering::Relaxed);
            continue;
          };

          assert!(
            acked.insert(id, d.delivery_count).is_none(),
            "message {id} acked twice"
          );
          queue.ack(d.tag);
          if progress.ack.fetch_add(1, Ordering::Relaxed) + 1 == messages {
            complete.store(true, Ordering::Relaxed);
          };
          yield_now().await;
        }
      })
    })
    .collect_vec();

  for t in producers.into_iter().chain(consumers) {
    t.await.unwrap();
  }

  assert_eq!(u64::try_from(acked.len()).unwrap(), cfg.messages);
  assert!(queue.is_empty(), "queue still has {} messages", queue.len());
  assert_eq!(queue.in_flight_len(), 0);

  let redelivered = acked.iter().filter(|e| *e.value() > 1).count();
  let max_deliveries = acked.iter().map(|e| *e.value()).max().unwrap_or(0);
  info!(
    elapsed_ms = started.elapsed().as_millis() as u64,
    redelivered,
    max_deliveries,
    metrics = serde_json::to_string(&queue.metrics().snapshot()).unwrap(),
    "all done"
  );
}
