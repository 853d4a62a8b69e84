pub mod auth;
pub mod cart;
pub mod gateway;
pub mod health;
pub mod order;
pub mod product;
pub mod user;
