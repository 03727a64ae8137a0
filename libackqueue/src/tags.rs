use crate::items::ItemId;
use ahash::AHashMap;
use tracing::debug;
use tracing::trace;

/// Handle returned with every delivery, used to ack or nack that delivery.
pub type DeliveryTag = u64;

/// Outstanding delivery tags and the rotating allocator that issues them.
///
/// Tags cycle through `1..=max`. A tag still outstanding is never reissued: the allocator steps over it, and gives up only when every tag in the range is outstanding.
pub(crate) struct DeliveryTags {
  outstanding: AHashMap<DeliveryTag, ItemId>,
  last: DeliveryTag,
  max: DeliveryTag,
}

impl DeliveryTags {
  pub fn new(max: DeliveryTag) -> Self {
    assert!(max >= 1);
    DeliveryTags {
      outstanding: AHashMap::new(),
      last: 0,
      max,
    }
  }

  pub fn len(&self) -> usize {
    self.outstanding.len()
  }

  pub fn clear(&mut self) {
    self.outstanding.clear();
    self.last = 0;
  }

  pub fn is_exhausted(&self) -> bool {
    self.outstanding.len() as u64 >= self.max
  }

  /// Issues the next free tag for `id`. Returns `None` if the range is exhausted.
  pub fn issue(&mut self, id: ItemId) -> Option<DeliveryTag> {
    if self.is_exhausted() {
      return None;
    };
    loop {
      self.last = if self.last >= self.max {
        debug!(max = self.max, "delivery tags wrapped around");
        1
      } else {
        self.last + 1
      };
      if self.outstanding.contains_key(&self.last) {
        trace!(tag = self.last, "skipping delivery tag still outstanding");
        continue;
      };
      let None = self.outstanding.insert(self.last, id) else {
        unreachable!();
      };
      return Some(self.last);
    }
  }

  pub fn take(&mut self, tag: DeliveryTag) -> Option<ItemId> {
    self.outstanding.remove(&tag)
  }
}

#[cfg(test)]
mod tests {
  use super::DeliveryTags;

  #[test]
  fn test_tags_start_at_one_and_increase() {
    let mut tags = DeliveryTags::new(100);
    assert_eq!(tags.issue(10), Some(1));
    assert_eq!(tags.issue(11), Some(2));
    assert_eq!(tags.issue(12), Some(3));
    assert_eq!(tags.len(), 3);
    assert_eq!(tags.take(2), Some(11));
    assert_eq!(tags.take(2), None);
    assert_eq!(tags.len(), 2);
  }

  #[test]
  fn test_tags_wrap_around() {
    let mut tags = DeliveryTags::new(3);
    for id in 0..3 {
      let tag = tags.issue(id).unwrap();
      tags.take(tag).unwrap();
    }
    assert_eq!(tags.issue(7), Some(1));
  }

  #[test]
  fn test_outstanding_tags_are_skipped() {
    let mut tags = DeliveryTags::new(4);
    assert_eq!(tags.issue(0), Some(1));
    assert_eq!(tags.issue(1), Some(2));
    assert_eq!(tags.issue(2), Some(3));
    assert_eq!(tags.issue(3), Some(4));
    assert_eq!(tags.take(3), Some(2));
    assert_eq!(tags.take(4), Some(3));
    // Tags 1 and 2 are still held, so after wrapping the allocator must land on 3.
    assert_eq!(tags.issue(5), Some(3));
    assert_eq!(tags.issue(6), Some(4));
    assert_eq!(tags.take(1), Some(0));
    assert_eq!(tags.issue(8), Some(1));
  }

  #[test]
  fn test_exhausted_range() {
    let mut tags = DeliveryTags::new(2);
    assert_eq!(tags.issue(0), Some(1));
    assert_eq!(tags.issue(1), Some(2));
    assert!(tags.is_exhausted());
    assert_eq!(tags.issue(2), None);
    tags.take(1).unwrap();
    assert_eq!(tags.issue(2), Some(1));
  }

  #[test]
  fn test_clear_resets_allocator() {
    let mut tags = DeliveryTags::new(10);
    tags.issue(0);
    tags.issue(1);
    tags.clear();
    assert_eq!(tags.len(), 0);
    assert_eq!(tags.issue(0), Some(1));
  }
}
