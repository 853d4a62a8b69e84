use commerce_backend::{run_gateway, run_order_service, run_product_service, run_user_service};

#[tokio::main]
async fn main() {
    let service = std::env::args().nth(1).unwrap_or_else(|| "gateway".to_string());

    match service.as_str() {
        "gateway" => run_gateway().await,
        "user-service" => run_user_service().await,
        "product-service" => run_product_service().await,
        "order-service" => run_order_service().await,
        other => {
            eprintln!(
                "Unknown service '{}'. Expected one of: gateway, user-service, product-service, order-service",
                other
            );
            std::process::exit(1);
        }
    }
}
