use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    cart::CartLine,
    colors::Color,
    dto::{
        cart::{AddToCartRequest, CartView, CheckoutLineResult, CheckoutResponse},
        inventory::{AddStockRequest, DistributeStockRequest},
        logs::LogList,
        products::{CreateProductRequest, ProductList, ProductStats},
    },
    models::{Channel, LogEntry, Product},
    response::{ApiResponse, Meta},
    routes::{cart, health, inventory, logs, params, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::stats,
        products::get_product,
        products::create_product,
        inventory::distribute_stock,
        inventory::add_stock,
        cart::view_cart,
        cart::add_to_cart,
        cart::remove_from_cart,
        cart::checkout,
        logs::list_logs,
    ),
    components(
        schemas(
            Product,
            LogEntry,
            Channel,
            Color,
            CartLine,
            CreateProductRequest,
            ProductList,
            ProductStats,
            DistributeStockRequest,
            AddStockRequest,
            AddToCartRequest,
            CartView,
            CheckoutLineResult,
            CheckoutResponse,
            LogList,
            params::ProductQuery,
            params::LogListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<ProductStats>,
            ApiResponse<CartView>,
            ApiResponse<CheckoutResponse>,
            ApiResponse<LogList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product catalog and stats"),
        (name = "Inventory", description = "Warehouse stock distribution"),
        (name = "Cart", description = "Session cart and checkout"),
        (name = "Logs", description = "Activity log"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
