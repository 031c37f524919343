use tracing::trace;

use crate::grammar::{BOUNDARY, ContentFamily, EOL, EOL2X, MESSAGE_FORMAT};
use crate::parser::multipart::parse_part;
use crate::util::{parse_form_params, pretty_header_name, split_by, unquote_value};
use crate::{Body, BodyPayload, Header, HttpZError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRows<'a> {
    pub start_row: &'a str,
    pub header_rows: Vec<&'a str>,
    pub body_rows: &'a str,
    pub headers_size: usize,
    pub body_size: usize,
}

pub fn split_message(raw: &str) -> Result<MessageRows<'_>, HttpZError> {
    let (header_block, body_rows) = split_by(raw, EOL2X)
        .ok_or_else(|| HttpZError::format(format!("Incorrect message format, {MESSAGE_FORMAT}")))?;

    let mut rows = header_block.split(EOL);
    let start_row = rows.next().unwrap_or_default();

    Ok(MessageRows {
        start_row,
        header_rows: rows.collect(),
        body_rows,
        headers_size: header_block.len() + EOL2X.len(),
        body_size: body_rows.len(),
    })
}

/// Whether the row is a `name:` header, ignoring case.
pub fn row_has_name(row: &str, name: &str) -> bool {
    split_by(row, ":").is_some_and(|(row_name, _)| row_name.trim().eq_ignore_ascii_case(name))
}

pub fn parse_header_row(row: &str) -> Result<Header, HttpZError> {
    let (name, value) = split_by(row, ":").ok_or_else(|| {
        HttpZError::format("Incorrect header row format, expected: Name: Value").with_details(row)
    })?;
    if name.trim().is_empty() {
        return Err(
            HttpZError::format("Incorrect header row format, expected: Name: Value")
                .with_details(row),
        );
    }
    Ok(Header {
        name: pretty_header_name(name),
        value: unquote_value(value.trim()).to_string(),
    })
}

pub fn parse_header_rows<'a>(
    rows: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<Header>, HttpZError> {
    rows.into_iter().map(parse_header_row).collect()
}

pub fn find_header<'h>(headers: &'h [Header], name: &str) -> Option<&'h Header> {
    headers
        .iter()
        .find(|header| header.name.eq_ignore_ascii_case(name))
}

pub fn normalize_content_type(value: &str) -> String {
    value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

pub fn parse_body(body_rows: &str, headers: &[Header]) -> Result<Option<Body>, HttpZError> {
    if body_rows.is_empty() {
        return Ok(None);
    }

    let content_type_header = find_header(headers, "Content-Type").map(|header| header.value.as_str());
    let content_type = content_type_header.map(normalize_content_type);
    let family = ContentFamily::from_content_type(content_type.as_deref());
    trace!(?family, ?content_type, "dispatching body");

    let payload = match family {
        ContentFamily::Multipart => {
            let boundary = extract_boundary(content_type_header.unwrap_or_default())?;
            let parts = parse_multipart_body(body_rows, &boundary)?;
            BodyPayload::Multipart { boundary, parts }
        }
        ContentFamily::UrlEncoded => BodyPayload::UrlEncoded {
            params: parse_form_params(body_rows, false)?,
        },
        ContentFamily::Text => BodyPayload::Text {
            text: body_rows.to_string(),
        },
    };

    Ok(Some(Body {
        content_type,
        payload,
    }))
}

fn extract_boundary(content_type: &str) -> Result<String, HttpZError> {
    let params = split_by(content_type, ";").map(|(_, params)| params).ok_or_else(|| {
        HttpZError::format("Incorrect Content-Type header value, boundary is missing")
            .with_details(content_type)
    })?;
    let boundary = BOUNDARY
        .captures(params)
        .and_then(|captures| captures.get(1))
        .map(|boundary| boundary.as_str().trim_matches('"').to_string())
        .filter(|boundary| !boundary.is_empty())
        .ok_or_else(|| {
            HttpZError::format("Incorrect boundary, expected: boundary=value").with_details(params)
        })?;
    Ok(boundary)
}

fn parse_multipart_body(
    body_rows: &str,
    boundary: &str,
) -> Result<Vec<crate::MultipartPart>, HttpZError> {
    let delimiter = format!("--{boundary}");
    let segments: Vec<&str> = body_rows.split(delimiter.as_str()).collect();
    let Some((closing, parts)) = segments.get(1..).and_then(<[&str]>::split_last) else {
        return Err(
            HttpZError::format(format!("Multipart body does not contain {delimiter}"))
                .with_details(body_rows),
        );
    };
    let terminated = closing
        .strip_prefix("--")
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(EOL));
    if !terminated {
        return Err(HttpZError::format(format!(
            "Incorrect multipart body, expected closing {delimiter}--"
        ))
        .with_details(*closing));
    }

    parts.iter().map(|segment| parse_part(segment)).collect()
}
