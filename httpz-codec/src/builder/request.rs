use tracing::debug;

use crate::builder::base::{
    generate_body, generate_header_row, header_is, validate_protocol_version,
};
use crate::grammar::{EOL, is_known_method};
use crate::util::{empty_if_none, generate_path};
use crate::validate::{LINE_BREAKS, validate_no_chars, validate_not_empty_string};
use crate::{BuildOptions, Cookie, Header, HttpZError, Request};

pub fn build_request(request: &Request, options: BuildOptions) -> Result<String, HttpZError> {
    let start_row = generate_start_row(request)?;
    let host_row = generate_host_row(&request.host, options)?;
    let header_rows = generate_header_rows(&request.headers, &host_row)?;
    let cookie_row = generate_cookie_row(&request.cookies)?;
    let body = generate_body(request.body.as_ref())?;

    debug!(method = %request.method, path = %request.path, "built request");

    Ok(format!("{start_row}{header_rows}{cookie_row}{EOL}{body}"))
}

/// Emits the header rows with the Host row standing in for the first literal
/// Host entry, or leading them when there is none. Cookie entries are dropped
/// in favor of the cookie row.
fn generate_header_rows(headers: &[Header], host_row: &str) -> Result<String, HttpZError> {
    let host_index = headers.iter().position(|header| header_is(header, "Host"));
    let mut rows = String::new();
    if host_index.is_none() {
        rows.push_str(host_row);
    }
    for (index, header) in headers.iter().enumerate() {
        if host_index == Some(index) {
            rows.push_str(host_row);
        } else if !header_is(header, "Host") && !header_is(header, "Cookie") {
            rows.push_str(&generate_header_row(index, header)?);
        }
    }
    Ok(rows)
}

fn generate_start_row(request: &Request) -> Result<String, HttpZError> {
    validate_not_empty_string(&request.method, "method")?;
    if !is_known_method(&request.method) {
        return Err(HttpZError::validation("method must be a known HTTP method")
            .with_details(request.method.as_str()));
    }
    validate_protocol_version(&request.protocol_version)?;
    validate_not_empty_string(&request.path, "path")?;
    for (index, param) in request.query_params.iter().enumerate() {
        validate_not_empty_string(&param.name, "query param name")
            .map_err(|err| err.with_details(format!("query param index: {index}")))?;
    }

    Ok(format!(
        "{} {} {}{EOL}",
        request.method.to_ascii_uppercase(),
        generate_path(&request.path, &request.query_params),
        request.protocol_version.to_ascii_uppercase()
    ))
}

fn generate_host_row(host: &str, options: BuildOptions) -> Result<String, HttpZError> {
    if options.mandatory_host {
        validate_not_empty_string(host, "host")?;
    }
    if host.is_empty() {
        return Ok(String::new());
    }
    validate_no_chars(host, LINE_BREAKS, "host")?;
    Ok(format!("Host: {host}{EOL}"))
}

const COOKIE_NAME_BREAKS: &[char] = &['\r', '\n', ';', '='];
const COOKIE_VALUE_BREAKS: &[char] = &['\r', '\n', ';'];

fn generate_cookie_row(cookies: &[Cookie]) -> Result<String, HttpZError> {
    if cookies.is_empty() {
        return Ok(String::new());
    }

    let pairs = cookies
        .iter()
        .enumerate()
        .map(|(index, cookie)| {
            let at_index = |err: HttpZError| err.with_details(format!("cookie index: {index}"));
            validate_not_empty_string(&cookie.name, "cookie name").map_err(at_index)?;
            validate_no_chars(&cookie.name, COOKIE_NAME_BREAKS, "cookie name").map_err(at_index)?;
            validate_no_chars(
                empty_if_none(cookie.value.as_deref()),
                COOKIE_VALUE_BREAKS,
                "cookie value",
            )
            .map_err(at_index)?;
            Ok(format!(
                "{}={}",
                cookie.name,
                empty_if_none(cookie.value.as_deref())
            ))
        })
        .collect::<Result<Vec<_>, HttpZError>>()?;

    Ok(format!("Cookie: {}{EOL}", pairs.join("; ")))
}
