use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use url::Url;

use crate::grammar::QUOTED_VALUE;
use crate::{HttpZError, Param};

const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'%');

const PLACEHOLDER_ORIGIN: &str = "http://host.invalid";

/// Splits `input` around the first occurrence of `delimiter`.
pub fn split_by<'a>(input: &'a str, delimiter: &str) -> Option<(&'a str, &'a str)> {
    input
        .find(delimiter)
        .map(|index| (&input[..index], &input[index + delimiter.len()..]))
}

/// Rewrites a header name into Capitalized-Dash-Case.
pub fn pretty_header_name(name: &str) -> String {
    name.trim()
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

pub fn unquote_value(value: &str) -> &str {
    match QUOTED_VALUE.captures(value) {
        Some(captures) => captures.get(1).map_or(value, |inner| inner.as_str()),
        None => value,
    }
}

pub fn empty_if_none(value: Option<&str>) -> &str {
    value.unwrap_or_default()
}

pub fn percent_decode(input: &str) -> Result<String, HttpZError> {
    percent_decode_str(input)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|err| {
            HttpZError::format(format!("Invalid percent-encoding: {err}")).with_details(input)
        })
}

pub fn form_decode(input: &str) -> Result<String, HttpZError> {
    percent_decode(&input.replace('+', " "))
}

pub fn form_encode(input: &str) -> String {
    url::form_urlencoded::byte_serialize(input.as_bytes()).collect()
}

pub fn path_encode(input: &str) -> String {
    utf8_percent_encode(input, PATH).to_string()
}

/// Parses `name=value&...` pairs. `keep_bare_names` keeps pairs without `=`
/// as valueless params instead of coalescing them to an empty value.
pub fn parse_form_params(input: &str, keep_bare_names: bool) -> Result<Vec<Param>, HttpZError> {
    let mut params = Vec::new();
    for pair in input.split('&').filter(|pair| !pair.is_empty()) {
        let (raw_name, raw_value) = match split_by(pair, "=") {
            Some((name, value)) => (name, Some(value)),
            None => (pair, None),
        };
        if raw_name.is_empty() {
            return Err(
                HttpZError::format("Incorrect param format, expected: name=value").with_details(pair),
            );
        }
        let name = form_decode(raw_name)?;
        let value = match raw_value {
            Some(value) => Some(form_decode(value)?),
            None if keep_bare_names => None,
            None => Some(String::new()),
        };
        params.push(Param { name, value });
    }
    Ok(params)
}

pub fn generate_form_params(params: &[Param]) -> String {
    params
        .iter()
        .map(|param| match &param.value {
            Some(value) => format!("{}={}", form_encode(&param.name), form_encode(value)),
            None => form_encode(&param.name),
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    pub protocol: String,
    pub host: String,
    pub path: String,
    pub params: Vec<Param>,
}

fn with_scheme(origin: &str) -> String {
    let lower = origin.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        origin.to_string()
    } else {
        format!("http://{origin}")
    }
}

/// The port written in `source`'s authority, if any. `Url::port` hides a
/// port equal to the scheme default, so `:80` has to be read from the text.
fn explicit_port(source: &str) -> Option<&str> {
    let authority = split_by(source, "//").map_or(source, |(_, rest)| rest);
    let authority = authority
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host_port = authority.rsplit('@').next().unwrap_or_default();
    let host_port = split_by(host_port, "]").map_or(host_port, |(_, rest)| rest);
    split_by(host_port, ":")
        .map(|(_, port)| port)
        .filter(|port| !port.is_empty() && port.bytes().all(|byte| byte.is_ascii_digit()))
}

fn host_with_port(url: &Url, source: &str) -> Result<String, HttpZError> {
    let host = percent_decode(url.host_str().unwrap_or_default())?;
    let port = url
        .port()
        .or_else(|| explicit_port(source).and(url.port_or_known_default()));
    Ok(match port {
        Some(port) => format!("{host}:{port}"),
        None => host,
    })
}

/// Normalizes a Host header value into `host[:port]`. Anything past the
/// authority is rejected rather than cut off.
pub fn parse_host(value: &str) -> Result<String, HttpZError> {
    let source = with_scheme(value);
    let url = Url::parse(&source)
        .map_err(|err| HttpZError::format(format!("Invalid host: {err}")).with_details(value))?;
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err(
            HttpZError::format("Invalid host, expected: host[:port]").with_details(value),
        );
    }
    host_with_port(&url, &source)
}

/// Resolves a request-target against an optional origin. Without an origin
/// only absolute-form targets carry a host.
pub fn parse_url(target: &str, origin: Option<&str>) -> Result<ParsedUrl, HttpZError> {
    let invalid = |err: url::ParseError| {
        HttpZError::format(format!("Invalid request-target: {err}")).with_details(target)
    };
    let base = match origin {
        Some(origin) if !origin.is_empty() => Url::parse(&with_scheme(origin)).map_err(invalid)?,
        _ => Url::parse(PLACEHOLDER_ORIGIN).map_err(invalid)?,
    };
    let url = base.join(target).map_err(invalid)?;

    let absolute = target.starts_with("//") || Url::parse(target).is_ok();
    let host = if absolute {
        host_with_port(&url, target)?
    } else {
        match origin {
            Some(origin) if !origin.is_empty() => host_with_port(&url, &with_scheme(origin))?,
            _ => String::new(),
        }
    };

    Ok(ParsedUrl {
        protocol: url.scheme().to_ascii_uppercase(),
        host,
        path: percent_decode(url.path())?,
        params: parse_form_params(url.query().unwrap_or_default(), true)?,
    })
}

pub fn generate_path(path: &str, params: &[Param]) -> String {
    let path = path_encode(path);
    if params.is_empty() {
        path
    } else {
        format!("{path}?{}", generate_form_params(params))
    }
}
