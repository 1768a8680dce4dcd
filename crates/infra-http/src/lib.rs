// linkwatch Infrastructure - HTTP Adapters
// Implements: Prober

pub mod http_prober;

pub use http_prober::HttpProber;
