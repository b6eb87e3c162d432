pub mod daily;
pub mod hourly;
pub mod store;
