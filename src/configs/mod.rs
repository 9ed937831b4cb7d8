pub mod base;
pub mod discord;
pub mod github;
pub mod logging;
pub mod server;
pub mod spotify;
pub mod widgets;

pub use base::*;
pub use discord::*;
pub use github::*;
pub use logging::*;
pub use server::*;
pub use spotify::*;
pub use widgets::*;
