use tracing::debug;

use crate::builder::{build_request, build_response};
use crate::grammar::{
    EOL, REQUEST_START_LINE_FORMAT, REQUEST_START_ROW_SHAPE, RESPONSE_START_LINE_FORMAT,
    RESPONSE_START_ROW_SHAPE,
};
use crate::parser::{parse_request, parse_response};
use crate::validate::validate_array;
use crate::{BuildOptions, HttpZError, Message, ParseOptions, Request, Response};

/// Parses a raw HTTP message, detecting request or response from its first line.
pub fn parse(raw: &str, options: ParseOptions) -> Result<Message, HttpZError> {
    let first_row = raw.split(EOL).next().unwrap_or_default();

    if RESPONSE_START_ROW_SHAPE.is_match(first_row) {
        debug!("parsing response");
        parse_response(raw).map(Message::Response)
    } else if REQUEST_START_ROW_SHAPE.is_match(first_row) {
        debug!("parsing request");
        parse_request(raw, options).map(Message::Request)
    } else {
        debug!(first_row, "rejecting message with unknown start-line");
        Err(HttpZError::format(format!(
            "Unknown message format, expected start-line: \
             {REQUEST_START_LINE_FORMAT} | {RESPONSE_START_LINE_FORMAT}"
        ))
        .with_details(first_row))
    }
}

/// Serializes a message model back into its raw form.
pub fn build(message: &Message, options: BuildOptions) -> Result<String, HttpZError> {
    match message {
        Message::Request(request) => {
            debug!("building request");
            build_request(request, options)
        }
        Message::Response(response) => {
            debug!("building response");
            build_response(response, options)
        }
    }
}

/// Builds from an untyped JSON model: a `method` field marks a request and a
/// `statusCode` field marks a response.
pub fn build_json(value: &serde_json::Value, options: BuildOptions) -> Result<String, HttpZError> {
    let message = message_from_json(value)?;
    build(&message, options)
}

pub fn message_from_json(value: &serde_json::Value) -> Result<Message, HttpZError> {
    if !value.is_object() {
        return Err(HttpZError::validation("model must be an object").with_details(value.to_string()));
    }
    for field in ["headers", "cookies", "queryParams"] {
        validate_array(value, field)?;
    }

    let shape_error =
        |err: serde_json::Error| HttpZError::validation("model has an invalid shape").with_details(err.to_string());

    if value.get("method").is_some() {
        serde_json::from_value::<Request>(value.clone())
            .map(Message::Request)
            .map_err(shape_error)
    } else if value.get("statusCode").is_some() {
        serde_json::from_value::<Response>(value.clone())
            .map(Message::Response)
            .map_err(shape_error)
    } else {
        Err(HttpZError::validation(
            "model must contain either method or statusCode",
        ))
    }
}
