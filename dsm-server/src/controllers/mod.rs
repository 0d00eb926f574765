pub mod connectors;
pub mod providers;
