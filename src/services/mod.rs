pub mod aggregator;
pub mod config;
pub mod extract;
pub mod http;
pub mod ocr;
pub mod pipeline;
pub mod screen_capture;
pub mod search;
pub mod source_resolver;
