mod feed;
mod game;
mod manifest;
pub(crate) mod storage;

pub use feed::{FeedShape, RawPayload};
pub use game::{Game, SectionKey, Sections, Update};
pub use manifest::Manifest;
pub use storage::{Storage, StorageKeys};
