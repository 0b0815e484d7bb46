//! Open Library search API: request construction, response mapping and the
//! blocking HTTP client.

pub mod client;
pub mod model;
pub mod request;
