pub mod detection;
pub mod utils;
