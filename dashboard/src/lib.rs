pub mod detector;
pub mod overlay;
pub mod server;
pub mod storage;
pub mod utils;
pub mod web;
