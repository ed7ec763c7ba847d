pub mod args;
pub mod bench;
pub mod error;
pub mod render;
pub mod response;
pub mod settings;
