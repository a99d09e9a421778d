mod clients;
mod storage;

pub use clients::feed::{FeedClient, FeedSource};
pub use storage::fs_store::FileSystemStore;
