pub mod database;
pub mod health;
pub mod llm;
pub mod sse;
