#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, thiserror::Error)]
pub enum OpError {
  /// No message is ready: the queue is empty or every message is in flight. Callers should try again later.
  #[error("empty queue")]
  EmptyQueue,
  /// Reserved for a registry of named queues. Nothing in this crate returns it.
  #[error("no queue")]
  NoQueue,
  /// A message is ready, but every delivery tag in the configured range is outstanding.
  #[error("all delivery tags are outstanding")]
  TagsExhausted,
}

pub type OpResult<T> = Result<T, OpError>;
