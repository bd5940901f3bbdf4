pub mod archive;
pub mod download;
pub mod error;
pub mod http;
pub mod install;
pub mod package;
pub mod platform;
pub mod runtime;

pub use error::ShimError;
