use tracing::trace;

use crate::grammar::{EOL, PROTOCOL_VERSION};
use crate::util::{generate_form_params, pretty_header_name};
use crate::validate::{LINE_BREAKS, validate_no_chars, validate_not_empty_string, validate_required};
use crate::{Body, BodyPayload, Header, HttpZError, MultipartPart, Param};

pub fn validate_protocol_version(protocol_version: &str) -> Result<(), HttpZError> {
    validate_not_empty_string(protocol_version, "protocolVersion")?;
    if !PROTOCOL_VERSION.is_match(protocol_version) {
        return Err(
            HttpZError::validation("protocolVersion must look like HTTP/1.1")
                .with_details(protocol_version),
        );
    }
    Ok(())
}

pub fn header_is(header: &Header, name: &str) -> bool {
    header.name.trim().eq_ignore_ascii_case(name)
}

pub fn generate_header_row(index: usize, header: &Header) -> Result<String, HttpZError> {
    let at_index = |err: HttpZError| err.with_details(format!("header index: {index}"));
    validate_not_empty_string(&header.name, "header name").map_err(at_index)?;
    validate_no_chars(&header.name, &['\r', '\n', ':'], "header name").map_err(at_index)?;
    validate_no_chars(&header.value, LINE_BREAKS, "header value").map_err(at_index)?;

    Ok(format!("{}: {}{EOL}", pretty_header_name(&header.name), header.value))
}

/// Emits `Name: value` rows for every header whose name is not in `skip`.
pub fn generate_header_rows(headers: &[Header], skip: &[&str]) -> Result<String, HttpZError> {
    let mut rows = String::new();
    for (index, header) in headers.iter().enumerate() {
        if skip.iter().any(|name| header_is(header, name)) {
            continue;
        }
        rows.push_str(&generate_header_row(index, header)?);
    }
    Ok(rows)
}

pub fn generate_body(body: Option<&Body>) -> Result<String, HttpZError> {
    let Some(body) = body else {
        return Ok(String::new());
    };

    match &body.payload {
        BodyPayload::Multipart { boundary, parts } => {
            trace!(boundary = %boundary, parts = parts.len(), "building multipart body");
            generate_multipart_body(boundary, parts)
        }
        BodyPayload::UrlEncoded { params } => {
            trace!(params = params.len(), "building url-encoded body");
            validate_params(params)?;
            Ok(generate_form_params(params))
        }
        BodyPayload::Text { text } => Ok(text.clone()),
    }
}

fn validate_params(params: &[Param]) -> Result<(), HttpZError> {
    for (index, param) in params.iter().enumerate() {
        validate_not_empty_string(&param.name, "param name")
            .map_err(|err| err.with_details(format!("param index: {index}")))?;
    }
    Ok(())
}

const QUOTED_ATTRIBUTE_BREAKS: &[char] = &['\r', '\n', '"'];

fn generate_multipart_body(boundary: &str, parts: &[MultipartPart]) -> Result<String, HttpZError> {
    validate_not_empty_string(boundary, "boundary")?;
    validate_no_chars(boundary, LINE_BREAKS, "boundary")?;

    let delimiter = format!("--{boundary}");
    let mut body = String::new();
    for (index, part) in parts.iter().enumerate() {
        let at_index = |err: HttpZError| err.with_details(format!("part index: {index}"));
        if part.value.contains(&delimiter) {
            return Err(at_index(HttpZError::validation(format!(
                "part value must not contain {delimiter}"
            ))));
        }
        body.push_str(&delimiter);
        body.push_str(EOL);
        body.push_str(&generate_part(part).map_err(at_index)?);
    }
    body.push_str("--");
    body.push_str(boundary);
    body.push_str("--");
    body.push_str(EOL);
    Ok(body)
}

fn generate_part(part: &MultipartPart) -> Result<String, HttpZError> {
    let disposition = part.kind.map_or("form-data", |kind| kind.as_str());
    let mut row = format!("Content-Disposition: {disposition}");

    match (&part.name, part.kind) {
        (Some(name), _) => {
            validate_not_empty_string(name, "part name")?;
            validate_no_chars(name, QUOTED_ATTRIBUTE_BREAKS, "part name")?;
            row.push_str(&format!("; name=\"{name}\""));
        }
        (None, None) => {
            validate_required(part.name.as_ref(), "part name")?;
        }
        (None, Some(_)) => {}
    }
    if let Some(file_name) = &part.file_name {
        validate_no_chars(file_name, QUOTED_ATTRIBUTE_BREAKS, "part fileName")?;
        row.push_str(&format!("; filename=\"{file_name}\""));
    }
    row.push_str(EOL);

    if let Some(content_type) = &part.content_type {
        validate_no_chars(content_type, LINE_BREAKS, "part contentType")?;
        row.push_str("Content-Type: ");
        row.push_str(content_type);
        row.push_str(EOL);
    }

    row.push_str(EOL);
    row.push_str(&part.value);
    row.push_str(EOL);
    Ok(row)
}
