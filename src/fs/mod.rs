pub mod listing;
pub mod name;
