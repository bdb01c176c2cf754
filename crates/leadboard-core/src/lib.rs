pub mod bucket;
pub mod config;
pub mod de;
pub mod error;
pub mod period;
pub mod reports;
pub mod rpc;
pub mod series;
