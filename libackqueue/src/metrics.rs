use serde::Deserialize;
use serde::Serialize;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

#[derive(Default)]
pub struct Metrics {
  /// Total number of get requests that failed due to no ready message being available.
  pub(crate) empty_get_counter: AtomicU64,
  /// Total number of get requests that failed because every delivery tag was outstanding.
  pub(crate) exhausted_get_counter: AtomicU64,
  /// Amount of in-flight messages currently in the queue.
  pub(crate) in_flight_gauge: AtomicU64,
  /// Amount of messages currently in the queue. They may be ready or in flight.
  pub(crate) message_gauge: AtomicU64,
  /// Total number of acks for a delivery tag that was not outstanding.
  pub(crate) missing_ack_counter: AtomicU64,
  /// Total number of nacks for a delivery tag that was not outstanding.
  pub(crate) missing_nack_counter: AtomicU64,
  /// Total number of acks that removed a message.
  pub(crate) successful_ack_counter: AtomicU64,
  /// Total number of get requests that delivered a message.
  pub(crate) successful_get_counter: AtomicU64,
  /// Total number of nacks that made a message ready again.
  pub(crate) successful_nack_counter: AtomicU64,
  /// Total number of messages pushed.
  pub(crate) successful_push_counter: AtomicU64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
  pub empty_get_counter: u64,
  pub exhausted_get_counter: u64,
  pub in_flight_gauge: u64,
  pub message_gauge: u64,
  pub missing_ack_counter: u64,
  pub missing_nack_counter: u64,
  pub successful_ack_counter: u64,
  pub successful_get_counter: u64,
  pub successful_nack_counter: u64,
  pub successful_push_counter: u64,
}

impl Metrics {
  pub(crate) fn incr(counter: &AtomicU64) {
    counter.fetch_add(1, Ordering::Relaxed);
  }

  // Gauges are written while the queue lock is held, so they never run ahead of the state they describe.
  pub(crate) fn set_gauges(&self, messages: usize, in_flight: usize) {
    self
      .message_gauge
      .store(messages.try_into().unwrap(), Ordering::Relaxed);
    self
      .in_flight_gauge
      .store(in_flight.try_into().unwrap(), Ordering::Relaxed);
  }

  pub fn empty_get_counter(&self) -> u64 {
    self.empty_get_counter.load(Ordering::Relaxed)
  }

  pub fn exhausted_get_counter(&self) -> u64 {
    self.exhausted_get_counter.load(Ordering::Relaxed)
  }

  pub fn in_flight_gauge(&self) -> u64 {
    self.in_flight_gauge.load(Ordering::Relaxed)
  }

  pub fn message_gauge(&self) -> u64 {
    self.message_gauge.load(Ordering::Relaxed)
  }

  pub fn missing_ack_counter(&self) -> u64 {
    self.missing_ack_counter.load(Ordering::Relaxed)
  }

  pub fn missing_nack_counter(&self) -> u64 {
    self.missing_nack_counter.load(Ordering::Relaxed)
  }

  pub fn successful_ack_counter(&self) -> u64 {
    self.successful_ack_counter.load(Ordering::Relaxed)
  }

  pub fn successful_get_counter(&self) -> u64 {
    self.successful_get_counter.load(Ordering::Relaxed)
  }

  pub fn successful_nack_counter(&self) -> u64 {
    self.successful_nack_counter.load(Ordering::Relaxed)
  }

  pub fn successful_push_counter(&self) -> u64 {
    self.successful_push_counter.load(Ordering::Relaxed)
  }

  pub fn snapshot(&self) -> MetricsSnapshot {
    MetricsSnapshot {
      empty_get_counter: self.empty_get_counter(),
      exhausted_get_counter: self.exhausted_get_counter(),
      in_flight_gauge: self.in_flight_gauge(),
      message_gauge: self.message_gauge(),
      missing_ack_counter: self.missing_ack_counter(),
      missing_nack_counter: self.missing_nack_counter(),
      successful_ack_counter: self.successful_ack_counter(),
      successful_get_counter: self.successful_get_counter(),
      successful_nack_counter: self.successful_nack_counter(),
      successful_push_counter: self.successful_push_counter(),
    }
  }
}
