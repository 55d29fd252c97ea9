//! HTTP API handlers for ada-mock

pub mod health;
pub mod realtime;
pub mod upload;

pub use health::health_routes;
pub use realtime::realtime_routes;
pub use upload::upload_routes;
