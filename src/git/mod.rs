//! Source-control operations through the external git binary.

mod gateway;

pub use gateway::{GitGateway, SourceControl};
