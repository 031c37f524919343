use tracing::debug;

use crate::grammar::{RESPONSE_START_LINE_FORMAT, RESPONSE_START_ROW};
use crate::parser::message::{parse_body, parse_header_rows, row_has_name, split_message};
use crate::util::split_by;
use crate::{Cookie, HttpZError, Response};

pub fn parse_response(raw: &str) -> Result<Response, HttpZError> {
    let rows = split_message(raw)?;

    let (protocol_version, status_code, status_message) = parse_start_row(rows.start_row)?;

    let (cookie_rows, header_rows): (Vec<&str>, Vec<&str>) = rows
        .header_rows
        .iter()
        .copied()
        .partition(|row| row_has_name(row, "set-cookie"));

    let headers = parse_header_rows(header_rows)?;
    let cookies = cookie_rows
        .into_iter()
        .map(parse_set_cookie_row)
        .collect::<Result<Vec<_>, _>>()?;
    let body = parse_body(rows.body_rows, &headers)?;

    debug!(status_code, headers = headers.len(), cookies = cookies.len(), "parsed response");

    Ok(Response {
        protocol_version,
        status_code,
        status_message,
        headers,
        cookies,
        body,
        headers_size: rows.headers_size,
        body_size: rows.body_size,
    })
}

fn parse_start_row(row: &str) -> Result<(String, u16, String), HttpZError> {
    let invalid = || {
        HttpZError::format(format!(
            "Incorrect start-line format, expected: {RESPONSE_START_LINE_FORMAT}"
        ))
        .with_details(row)
    };
    let captures = RESPONSE_START_ROW.captures(row).ok_or_else(invalid)?;
    let status_code = captures[2]
        .parse::<u16>()
        .ok()
        .filter(|code| *code > 0)
        .ok_or_else(invalid)?;
    let status_message = captures
        .get(3)
        .map(|message| {
            message
                .as_str()
                .split(' ')
                .filter(|word| !word.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();

    Ok((captures[1].to_ascii_uppercase(), status_code, status_message))
}

fn parse_set_cookie_row(row: &str) -> Result<Cookie, HttpZError> {
    let values = split_by(row, ":").map_or("", |(_, values)| values.trim());
    let mut segments = values.split(';').map(str::trim);
    let first = segments.next().unwrap_or_default();

    let (name, value) = match split_by(first, "=") {
        Some((name, value)) => (name.trim(), Some(value.trim().to_string())),
        None => (first, None),
    };
    if name.is_empty() {
        return Err(HttpZError::format(
            "Incorrect set-cookie pair format, expected: Name1=Value1; Attribute",
        )
        .with_details(values));
    }

    Ok(Cookie {
        name: name.to_string(),
        value,
        params: segments
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect(),
    })
}
