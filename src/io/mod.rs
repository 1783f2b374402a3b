pub mod adapter;
pub mod codec;
pub mod config_io;
pub mod store;
pub mod worker;
