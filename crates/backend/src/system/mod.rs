pub mod middleware;
pub mod tracing;
pub mod users;
