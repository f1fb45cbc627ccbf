pub mod chat;
pub mod crawl;
