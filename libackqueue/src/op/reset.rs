use crate::ctx::Ctx;
use tracing::debug;

pub(crate) fn op_reset<T>(ctx: &Ctx<T>) {
  let mut state = ctx.state.lock();
  let dropped = state.items.len();
  let in_flight = state.tags.len();
  state.items.clear();
  state.tags.clear();
  state.sync_gauges(&ctx.metrics);
  drop(state);
  debug!(dropped, in_flight, "queue reset");
}
