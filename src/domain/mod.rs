mod chunker;
mod error;
mod subscriber;
mod subscriber_email;

pub use chunker::{Chunker, DEFAULT_CHUNK_LENGTH};
pub use error::SubscriberError;
pub use subscriber::{Fields, Subscriber};
pub use subscriber_email::SubscriberEmail;
