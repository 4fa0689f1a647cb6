pub mod cart_service;
pub mod inventory_service;
pub mod log_service;
pub mod product_service;
