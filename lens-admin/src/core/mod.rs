pub mod config;
pub mod rest_client;
pub mod topology;

pub use config::TopologyConfig;
pub use rest_client::RestTopologyClient;
pub use topology::TopologySource;
