pub mod ack;
pub mod get;
pub mod nack;
pub mod push;
pub mod reset;
pub mod result;
