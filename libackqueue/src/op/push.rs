use crate::ctx::Ctx;
use crate::metrics::Metrics;
use std::sync::Arc;

pub(crate) fn op_push<T>(ctx: &Ctx<T>, body: T) {
  // Allocate outside the critical section.
  let body = Arc::new(body);
  {
    let mut state = ctx.state.lock();
    state.items.push_back(body);
    state.sync_gauges(&ctx.metrics);
  };
  Metrics::incr(&ctx.metrics.successful_push_counter);
}
