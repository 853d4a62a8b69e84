pub mod http_product_client;
pub mod http_token_validator;
