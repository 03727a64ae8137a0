use std::sync::Arc;

/// Stable index of an item's slot in the arena. Only meaningful while the item is linked.
pub(crate) type ItemId = usize;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Status {
  Ready,
  InFlight,
}

pub(crate) struct Item<T> {
  pub body: Arc<T>,
  pub status: Status,
  pub delivery_count: u32,
  prev: Option<ItemId>,
  next: Option<ItemId>,
}

enum Slot<T> {
  Occupied(Item<T>),
  Vacant { next_vacant: Option<ItemId> },
}

/// Doubly-linked list of items stored in an arena. Unlinked slots are kept on a free list and reused by later pushes, so the arena only grows to the peak number of linked items.
pub(crate) struct Items<T> {
  slots: Vec<Slot<T>>,
  first_vacant: Option<ItemId>,
  head: Option<ItemId>,
  tail: Option<ItemId>,
  len: usize,
  // Tracked so that a retrieval against a fully in-flight list doesn't need to scan it.
  ready: usize,
}

impl<T> Items<T> {
  pub fn new() -> Self {
    Items {
      slots: Vec::new(),
      first_vacant: None,
      head: None,
      tail: None,
      len: 0,
      ready: 0,
    }
  }

  pub fn len(&self) -> usize {
    self.len
  }

  #[cfg(test)]
  pub fn ready_len(&self) -> usize {
    self.ready
  }

  pub fn clear(&mut self) {
    self.slots.clear();
    self.first_vacant = None;
    self.head = None;
    self.tail = None;
    self.len = 0;
    self.ready = 0;
  }

  fn item(&self, id: ItemId) -> &Item<T> {
    match &self.slots[id] {
      Slot::Occupied(item) => item,
      Slot::Vacant { .. } => panic!("item does not exist"),
    }
  }

  fn item_mut(&mut self, id: ItemId) -> &mut Item<T> {
    match &mut self.slots[id] {
      Slot::Occupied(item) => item,
      Slot::Vacant { .. } => panic!("item does not exist"),
    }
  }

  #[cfg(test)]
  pub fn get(&self, id: ItemId) -> &Item<T> {
    self.item(id)
  }

  pub fn push_back(&mut self, body: Arc<T>) -> ItemId {
    let item = Item {
      body,
      status: Status::Ready,
      delivery_count: 0,
      prev: self.tail,
      next: None,
    };
    let id = match self.first_vacant {
      Some(id) => {
        let Slot::Vacant { next_vacant } = self.slots[id] else {
          panic!("vacant slot is occupied");
        };
        self.first_vacant = next_vacant;
        self.slots[id] = Slot::Occupied(item);
        id
      }
      None => {
        self.slots.push(Slot::Occupied(item));
        self.slots.len() - 1
      }
    };
    match self.tail {
      Some(tail) => self.item_mut(tail).next = Some(id),
      None => self.head = Some(id),
    };
    self.tail = Some(id);
    self.len += 1;
    self.ready += 1;
    id
  }

  /// Scans from the head for the first item that is ready.
  pub fn first_ready(&self) -> Option<ItemId> {
    if self.ready == 0 {
      return None;
    };
    let mut cur = self.head;
    while let Some(id) = cur {
      let item = self.item(id);
      if item.status == Status::Ready {
        return Some(id);
      };
      cur = item.next;
    }
    None
  }

  pub fn mark_in_flight(&mut self, id: ItemId) -> &Item<T> {
    let item = self.item_mut(id);
    assert_eq!(item.status, Status::Ready, "item is already in flight");
    item.status = Status::InFlight;
    item.delivery_count = item.delivery_count.saturating_add(1);
    self.ready -= 1;
    self.item(id)
  }

  pub fn mark_ready(&mut self, id: ItemId) {
    let item = self.item_mut(id);
    assert_eq!(item.status, Status::InFlight, "item is not in flight");
    item.status = Status::Ready;
    self.ready += 1;
  }

  /// Unlinks the item and releases its slot. The caller must not use `id` afterwards.
  pub fn remove(&mut self, id: ItemId) -> Item<T> {
    let (prev, next) = {
      let item = self.item(id);
      (item.prev, item.next)
    };
    match prev {
      Some(prev) => self.item_mut(prev).next = next,
      None => self.head = next,
    };
    match next {
      Some(next) => self.item_mut(next).prev = prev,
      None => self.tail = prev,
    };
    let Slot::Occupied(item) = std::mem::replace(&mut self.slots[id], Slot::Vacant {
      next_vacant: self.first_vacant,
    }) else {
      unreachable!();
    };
    self.first_vacant = Some(id);
    self.len -= 1;
    if item.status == Status::Ready {
      self.ready -= 1;
    };
    item
  }

  #[cfg(test)]
  pub fn ids_in_order(&self) -> Vec<ItemId> {
    let mut out = Vec::new();
    let mut cur = self.head;
    while let Some(id) = cur {
      out.push(id);
      cur = self.item(id).next;
    }
    out
  }
}

#[cfg(test)]
mod tests {
  use super::Items;
  use super::Status;
  use std::sync::Arc;

  fn bodies(items: &Items<&'static str>) -> Vec<&'static str> {
    items
      .ids_in_order()
      .into_iter()
      .map(|id| *items.get(id).body)
      .collect()
  }

  #[test]
  fn test_push_links_in_order() {
    let mut items = Items::new();
    for b in ["a", "b", "c"] {
      items.push_back(Arc::new(b));
    }
    assert_eq!(items.len(), 3);
    assert_eq!(items.ready_len(), 3);
    assert_eq!(bodies(&items), vec!["a", "b", "c"]);
  }

  #[test]
  fn test_remove_head_middle_tail() {
    let mut items = Items::new();
    let a = items.push_back(Arc::new("a"));
    let b = items.push_back(Arc::new("b"));
    let c = items.push_back(Arc::new("c"));
    let d = items.push_back(Arc::new("d"));

    items.remove(b);
    assert_eq!(bodies(&items), vec!["a", "c", "d"]);
    items.remove(a);
    assert_eq!(bodies(&items), vec!["c", "d"]);
    items.remove(d);
    assert_eq!(bodies(&items), vec!["c"]);
    items.remove(c);
    assert!(bodies(&items).is_empty());
    assert_eq!(items.len(), 0);
    assert_eq!(items.ready_len(), 0);

    // The list must be usable again after draining.
    items.push_back(Arc::new("e"));
    assert_eq!(bodies(&items), vec!["e"]);
  }

  #[test]
  fn test_vacant_slots_are_reused() {
    let mut items = Items::new();
    let a = items.push_back(Arc::new("a"));
    let b = items.push_back(Arc::new("b"));
    items.remove(a);
    items.remove(b);
    let c = items.push_back(Arc::new("c"));
    let d = items.push_back(Arc::new("d"));
    assert_eq!(c, b);
    assert_eq!(d, a);
    let e = items.push_back(Arc::new("e"));
    assert_eq!(e, 2);
    assert_eq!(bodies(&items), vec!["c", "d", "e"]);
  }

  #[test]
  fn test_first_ready_skips_in_flight() {
    let mut items = Items::new();
    let a = items.push_back(Arc::new("a"));
    let b = items.push_back(Arc::new("b"));
    assert_eq!(items.first_ready(), Some(a));

    items.mark_in_flight(a);
    assert_eq!(items.first_ready(), Some(b));
    items.mark_in_flight(b);
    assert_eq!(items.first_ready(), None);
    assert_eq!(items.ready_len(), 0);

    items.mark_ready(a);
    assert_eq!(items.first_ready(), Some(a));
    assert_eq!(items.get(a).status, Status::Ready);
    assert_eq!(items.get(b).status, Status::InFlight);
  }

  #[test]
  fn test_delivery_count_increments_per_flight() {
    let mut items = Items::new();
    let a = items.push_back(Arc::new("a"));
    assert_eq!(items.mark_in_flight(a).delivery_count, 1);
    items.mark_ready(a);
    assert_eq!(items.mark_in_flight(a).delivery_count, 2);
  }

  #[test]
  #[should_panic(expected = "item is already in flight")]
  fn test_double_mark_in_flight_panics() {
    let mut items = Items::new();
    let a = items.push_back(Arc::new("a"));
    items.mark_in_flight(a);
    items.mark_in_flight(a);
  }
}
