pub mod activity_logs;
pub mod products;

pub use activity_logs::Entity as ActivityLogs;
pub use products::Entity as Products;
