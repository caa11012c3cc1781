// Domain layer - Fleet, operations and view models
pub mod chat;
pub mod client_state;
pub mod curation;
pub mod facility;
pub mod fleet;
pub mod live;
pub mod operations;
pub mod robot;
