pub mod config;
pub mod forecast;
pub mod product;
pub mod quote;
