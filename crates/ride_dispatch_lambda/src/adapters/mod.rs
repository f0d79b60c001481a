pub mod dynamodb;
pub mod memory;
pub mod ride_store;
