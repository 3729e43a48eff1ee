pub mod post_processor;
pub mod server;
