pub mod auth;
pub mod company;
pub mod customers;
pub mod customize;
pub mod payments;
pub mod settings;
