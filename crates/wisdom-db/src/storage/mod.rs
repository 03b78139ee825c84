//! Avatar object storage adapters

mod local;

pub use local::LocalAvatarStorage;
