use crate::ctx::Ctx;
use crate::metrics::Metrics;
use crate::tags::DeliveryTag;
use tracing::trace;

pub(crate) fn op_ack<T>(ctx: &Ctx<T>, tag: DeliveryTag) -> bool {
  let removed = {
    let mut state = ctx.state.lock();
    match state.tags.take(tag) {
      Some(id) => {
        let item = state.items.remove(id);
        state.sync_gauges(&ctx.metrics);
        Some(item)
      }
      None => None,
    }
  };
  // The body is dropped here, outside the lock, in case dropping `T` is expensive.
  match removed {
    Some(_item) => Metrics::incr(&ctx.metrics.successful_ack_counter),
    None => {
      trace!(tag, "ack for delivery tag that is not outstanding");
      Metrics::incr(&ctx.metrics.missing_ack_counter);
    }
  };
  true
}
