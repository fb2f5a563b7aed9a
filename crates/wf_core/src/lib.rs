pub mod error;
pub mod feed;
pub mod slug;
pub mod store;
pub mod types;

pub use error::{Error, Result};
pub use feed::Record;
pub use store::{FeedSource, FeedStore};
pub use types::{Article, BlockKind, ContentBlock, Video};
