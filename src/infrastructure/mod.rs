// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod http_response;
pub mod logging;
pub mod ndjson_stream;
pub mod openai_backend;
