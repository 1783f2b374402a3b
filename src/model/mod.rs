pub mod board;
pub mod card;
pub mod config;
pub mod list;

pub use board::*;
pub use card::*;
pub use config::*;
pub use list::*;
