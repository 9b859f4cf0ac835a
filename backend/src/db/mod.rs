pub mod dynamodb_repository;
#[cfg(test)]
pub mod memory;
pub mod model;
