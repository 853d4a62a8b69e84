pub mod circuit_breaker;
pub mod token_service;
