mod base;
mod request;
mod response;

pub use request::build_request;
pub use response::build_response;
