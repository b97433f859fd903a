mod file;
pub mod keys;
mod library;
mod likes;
mod share;
mod store;

pub use file::FileCacheStore;
pub use library::LibraryManager;
pub use likes::LikeIndex;
pub use share::{DEFAULT_LIMIT, ShareIndex};
pub use store::{
    CacheStore, Entry, MemoryCacheStore, get_json, get_json_entry, set_json, set_json_if_absent,
};
