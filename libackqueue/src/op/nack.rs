use crate::ctx::Ctx;
use crate::metrics::Metrics;
use crate::tags::DeliveryTag;
use tracing::trace;

pub(crate) fn op_nack<T>(ctx: &Ctx<T>, tag: DeliveryTag) -> bool {
  let found = {
    let mut state = ctx.state.lock();
    match state.tags.take(tag) {
      Some(id) => {
        // The message keeps its place in the list, so it's redelivered ahead of anything pushed after it.
        state.items.mark_ready(id);
        state.sync_gauges(&ctx.metrics);
        true
      }
      None => false,
    }
  };
  if found {
    Metrics::incr(&ctx.metrics.successful_nack_counter);
  } else {
    trace!(tag, "nack for delivery tag that is not outstanding");
    Metrics::incr(&ctx.metrics.missing_nack_counter);
  };
  true
}
