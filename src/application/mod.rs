// Application layer - Generators, aggregation and use cases
pub mod catalog;
pub mod chat_backend;
pub mod chat_service;
pub mod client_state_service;
pub mod curation_service;
pub mod data_context;
pub mod fleet_generator;
pub mod fleet_service;
pub mod keyword_chat;
pub mod live_simulator;
pub mod operations_generator;
pub mod seeded;
pub mod streaming_service;
