// src/services/mod.rs
pub mod business_date;
pub mod clock;
pub mod jquants;
pub mod screening;
pub mod token_cache;
