pub mod journal;
pub mod logger;
