mod message;
mod multipart;
mod request;
mod response;

pub use request::parse_request;
pub use response::parse_response;
