use crate::items::Items;
use crate::metrics::Metrics;
use crate::tags::DeliveryTags;
use parking_lot::Mutex;
use std::sync::Arc;

pub(crate) struct State<T> {
  pub items: Items<T>,
  pub tags: DeliveryTags,
}

impl<T> State<T> {
  pub fn sync_gauges(&self, metrics: &Metrics) {
    metrics.set_gauges(self.items.len(), self.tags.len());
  }
}

// A single lock covers both the list and the tag table, as every operation that touches one must atomically touch the other.
pub(crate) struct Ctx<T> {
  pub metrics: Arc<Metrics>,
  pub state: Mutex<State<T>>,
}
