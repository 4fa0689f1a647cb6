pub mod cart;
pub mod inventory;
pub mod logs;
pub mod products;
