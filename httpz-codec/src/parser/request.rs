use tracing::debug;

use crate::grammar::{REQUEST_START_LINE_FORMAT, REQUEST_START_ROW};
use crate::parser::message::{parse_body, parse_header_rows, row_has_name, split_message};
use crate::util::{parse_host, parse_url, split_by};
use crate::validate::validate_not_empty_string;
use crate::{Cookie, HttpZError, ParseOptions, Request};

#[derive(Debug)]
struct StartRow {
    method: String,
    target: String,
    protocol_version: String,
}

pub fn parse_request(raw: &str, options: ParseOptions) -> Result<Request, HttpZError> {
    let rows = split_message(raw)?;

    let host_row = rows.header_rows.iter().find(|row| row_has_name(row, "host"));
    let host = parse_host_row(host_row.copied(), options)?;

    let start = parse_start_row(rows.start_row)?;
    let url = parse_url(&start.target, host.as_deref())?;

    let (cookie_rows, header_rows): (Vec<&str>, Vec<&str>) = rows
        .header_rows
        .iter()
        .copied()
        .partition(|row| row_has_name(row, "cookie"));

    let headers = parse_header_rows(header_rows)?;

    let mut cookies = Vec::new();
    for row in cookie_rows {
        cookies.extend(parse_cookie_row(row)?);
    }

    let body = parse_body(rows.body_rows, &headers)?;

    debug!(
        method = %start.method,
        path = %url.path,
        headers = headers.len(),
        "parsed request"
    );

    Ok(Request {
        method: start.method,
        protocol: url.protocol,
        protocol_version: start.protocol_version,
        host: url.host,
        path: url.path,
        query_params: url.params,
        headers,
        cookies,
        body,
        headers_size: rows.headers_size,
        body_size: rows.body_size,
    })
}

fn parse_host_row(row: Option<&str>, options: ParseOptions) -> Result<Option<String>, HttpZError> {
    let value = row
        .and_then(|row| split_by(row, ":"))
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty());

    if options.mandatory_host {
        validate_not_empty_string(value.unwrap_or_default(), "Host header value")?;
    }
    value.map(parse_host).transpose()
}

fn parse_start_row(row: &str) -> Result<StartRow, HttpZError> {
    let captures = REQUEST_START_ROW.captures(row).ok_or_else(|| {
        HttpZError::format(format!(
            "Incorrect start-line format, expected: {REQUEST_START_LINE_FORMAT}"
        ))
        .with_details(row)
    })?;

    Ok(StartRow {
        method: captures[1].to_ascii_uppercase(),
        target: captures[2].to_string(),
        protocol_version: captures[3].to_ascii_uppercase(),
    })
}

fn parse_cookie_row(row: &str) -> Result<Vec<Cookie>, HttpZError> {
    let values = split_by(row, ":").map_or("", |(_, values)| values.trim());
    if values.is_empty() {
        return Ok(Vec::new());
    }

    values
        .split(';')
        .map(|pair| {
            let pair = pair.trim();
            let (name, value) = split_by(pair, "=").unwrap_or((pair, ""));
            let name = name.trim();
            if name.is_empty() {
                return Err(HttpZError::format(
                    "Incorrect cookie pair format, expected: Name1=Value1; Name2=Value2",
                )
                .with_details(values));
            }
            Ok(Cookie::new(name, value.trim()))
        })
        .collect()
}
