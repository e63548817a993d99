pub mod handlers;
pub mod middleware;
pub mod rankings;
pub mod routes;
pub mod subscriptions;
pub mod watcher;

pub use routes::create_router;
