pub mod client;
pub mod tags;

pub use client::{ClientConfig, ClientError, DeliveryStats, HttpIngestionClient};
pub use tags::{TAG_ENV_PREFIX, TagError, TagRules};
