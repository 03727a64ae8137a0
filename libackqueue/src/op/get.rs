use super::result::OpError;
use super::result::OpResult;
use crate::ctx::Ctx;
use crate::metrics::Metrics;
use crate::tags::DeliveryTag;
use std::sync::Arc;
use tracing::warn;

/// A message handed out for processing. It stays in the queue until its tag is acked.
#[derive(Debug)]
pub struct Delivery<T> {
  pub body: Arc<T>,
  pub tag: DeliveryTag,
  /// How many times this message has been handed out, including this delivery.
  pub delivery_count: u32,
}

impl<T> Delivery<T> {
  pub fn redelivered(&self) -> bool {
    self.delivery_count > 1
  }
}

pub(crate) fn op_get<T>(ctx: &Ctx<T>) -> OpResult<Delivery<T>> {
  let mut state = ctx.state.lock();

  let Some(id) = state.items.first_ready() else {
    drop(state);
    Metrics::incr(&ctx.metrics.empty_get_counter);
    return Err(OpError::EmptyQueue);
  };

  // Issue the tag before flipping the status so that an exhausted range leaves the message ready.
  let Some(tag) = state.tags.issue(id) else {
    let in_flight = state.tags.len();
    drop(state);
    warn!(in_flight, "cannot deliver message, all delivery tags are outstanding");
    Metrics::incr(&ctx.metrics.exhausted_get_counter);
    return Err(OpError::TagsExhausted);
  };

  let item = state.items.mark_in_flight(id);
  let delivery = Delivery {
    body: item.body.clone(),
    tag,
    delivery_count: item.delivery_count,
  };
  state.sync_gauges(&ctx.metrics);
  drop(state);

  Metrics::incr(&ctx.metrics.successful_get_counter);
  Ok(delivery)
}
