pub mod catalog;
pub mod config;
pub mod export;
pub mod extract;
pub mod gemini;
pub mod imaging;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod routes;
pub mod seo;
