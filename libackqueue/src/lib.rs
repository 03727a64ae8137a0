mod ctx;
mod items;
pub mod metrics;
pub mod op;
pub mod tags;

use ctx::Ctx;
use ctx::State;
use items::Items;
use metrics::Metrics;
use op::ack::op_ack;
use op::get::op_get;
use op::get::Delivery;
use op::nack::op_nack;
use op::push::op_push;
use op::reset::op_reset;
use op::result::OpResult;
use parking_lot::Mutex;
use serde::Deserialize;
use serde::Serialize;
use std::sync::Arc;
use tags::DeliveryTag;
use tags::DeliveryTags;

pub const DEFAULT_MAX_DELIVERY_TAG: DeliveryTag = 100_000;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueCfg {
  /// Delivery tags rotate through `1..=max_delivery_tag`. This also bounds how many messages can be in flight at once.
  pub max_delivery_tag: DeliveryTag,
}

impl Default for QueueCfg {
  fn default() -> Self {
    Self {
      max_delivery_tag: DEFAULT_MAX_DELIVERY_TAG,
    }
  }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum CfgError {
  #[error("max_delivery_tag must be at least 1")]
  ZeroDeliveryTagRange,
}

impl QueueCfg {
  pub fn validate(&self) -> Result<(), CfgError> {
    if self.max_delivery_tag == 0 {
      return Err(CfgError::ZeroDeliveryTagRange);
    };
    Ok(())
  }
}

/// In-process queue with at-least-once delivery.
///
/// Messages are delivered in push order. A delivered message stays in the queue, in flight, until its delivery tag is acked; a nack makes it ready again at its original position. Acks and nacks for tags that aren't outstanding are no-ops, so retrying them is always safe.
///
/// Cloning is cheap and every clone refers to the same queue.
pub struct AckQueue<T> {
  ctx: Arc<Ctx<T>>,
}

impl<T> Clone for AckQueue<T> {
  fn clone(&self) -> Self {
    Self {
      ctx: self.ctx.clone(),
    }
  }
}

impl<T> Default for AckQueue<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> AckQueue<T> {
  pub fn new() -> Self {
    Self::build(QueueCfg::default())
  }

  pub fn with_cfg(cfg: QueueCfg) -> Result<Self, CfgError> {
    cfg.validate()?;
    Ok(Self::build(cfg))
  }

  fn build(cfg: QueueCfg) -> Self {
    let ctx = Arc::new(Ctx {
      metrics: Arc::new(Metrics::default()),
      state: Mutex::new(State {
        items: Items::new(),
        tags: DeliveryTags::new(cfg.max_delivery_tag),
      }),
    });
    Self { ctx }
  }

  /// Drops every message, ready or in flight, and restarts delivery tags from 1. Tags issued before the reset become unknown.
  pub fn reset(&self) {
    op_reset(&self.ctx)
  }

  pub fn push(&self, body: T) {
    op_push(&self.ctx, body)
  }

  /// Delivers the earliest ready message. Fails with [`op::result::OpError::EmptyQueue`] when nothing is ready, which is an expected outcome when polling.
  pub fn get(&self) -> OpResult<Delivery<T>> {
    op_get(&self.ctx)
  }

  /// Removes the message delivered under `tag`. Always returns `true`; unknown tags are ignored.
  pub fn ack(&self, tag: DeliveryTag) -> bool {
    op_ack(&self.ctx, tag)
  }

  /// Returns the message delivered under `tag` to the ready state at its original position. Always returns `true`; unknown tags are ignored.
  pub fn nack(&self, tag: DeliveryTag) -> bool {
    op_nack(&self.ctx, tag)
  }

  /// Number of messages not yet acked, whether ready or in flight.
  pub fn len(&self) -> usize {
    self.ctx.state.lock().items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn in_flight_len(&self) -> usize {
    self.ctx.state.lock().tags.len()
  }

  pub fn metrics(&self) -> Arc<Metrics> {
    self.ctx.metrics.clone()
  }
}
