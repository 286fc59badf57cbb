pub mod food_repository;
pub mod food_service;
pub mod object_store;
