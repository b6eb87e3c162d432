pub mod data_loader;
pub mod error;
pub mod extract;
pub mod frame_fetcher;
