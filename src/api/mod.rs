// Poller API integration module

pub mod client;
pub mod models;

pub use client::{HttpServiceApi, ServiceApi};
pub use models::{NewService, ServiceRecord};

#[cfg(test)]
pub use client::MockServiceApi;
