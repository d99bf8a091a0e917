pub mod health;
pub mod routes;

pub use health::HealthService;
pub use routes::configure_routes;
