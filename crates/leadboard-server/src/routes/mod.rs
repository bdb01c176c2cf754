pub mod clients;
pub mod composite;
pub mod export;
pub mod google_ads;
pub mod health;
pub mod lead_quality;
pub mod leads;
pub mod line_charts;
pub mod ppl;
pub mod query;
pub mod summary;
