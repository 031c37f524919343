mod builder;
mod codec;
mod error;
mod grammar;
mod model;
mod parser;
mod util;
mod validate;

pub use builder::{build_request, build_response};
pub use codec::{build, build_json, message_from_json, parse};
pub use error::{HttpZError, HttpZErrorKind};
pub use grammar::{EOL, EOL2X, METHODS};
pub use model::{
    Body, BodyPayload, BuildOptions, Cookie, DispositionType, Header, Message, MultipartPart,
    Param, ParseOptions, Request, Response,
};
pub use parser::{parse_request, parse_response};
