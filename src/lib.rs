pub mod api;
pub mod common;
pub mod configs;
pub mod server;
pub mod transport;
pub mod widgets;
