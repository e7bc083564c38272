pub mod config;
pub mod logging;

pub mod digest;
pub mod pipeline;
pub mod release;
pub mod sidecar;
pub mod summary;
pub mod virustotal;
