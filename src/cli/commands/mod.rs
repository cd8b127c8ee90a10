//! CLI command implementations

pub mod cache;
pub mod config;
pub mod review;
pub mod serve;
pub mod status;

pub use cache::execute as cache;
pub use config::execute as config;
pub use review::execute as review;
pub use serve::execute as serve;
pub use status::execute as status;
