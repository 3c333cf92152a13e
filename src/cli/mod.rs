pub mod currencies;
pub mod detail;
pub mod prices;
pub mod setup;
pub mod ui;
