// Adapters layer: concrete implementations of the domain ports (http, search, storage).

pub mod html;
pub mod http;
pub mod search;
pub mod storage;
