pub mod food_handlers;
pub mod health_handlers;
