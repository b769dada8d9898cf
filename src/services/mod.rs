pub mod aggregator;
pub mod categories;
pub mod classifier;
pub mod drilldown;
pub mod ledger_loader;
pub mod overview;
pub mod voice;
