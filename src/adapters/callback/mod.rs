//! Final-output callback adapters.

mod http_sink;

pub use http_sink::HttpCallbackSink;
