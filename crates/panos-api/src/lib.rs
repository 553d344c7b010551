// panos-api: Async Rust client for the PAN-OS / Panorama XML API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;
pub mod xml;

pub use client::XmlApiClient;
pub use error::Error;
pub use models::{Job, JobResult, JobStatus, SystemInfo};
pub use xml::XmlElement;
