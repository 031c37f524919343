use tracing::debug;

use crate::builder::base::{generate_body, generate_header_rows, validate_protocol_version};
use crate::grammar::EOL;
use crate::validate::{
    LINE_BREAKS, validate_no_chars, validate_not_empty_string, validate_positive_number,
};
use crate::{BuildOptions, Cookie, HttpZError, Response};

/// `_options` only carries the Host requirement, which responses have no row for.
pub fn build_response(response: &Response, _options: BuildOptions) -> Result<String, HttpZError> {
    let start_row = generate_start_row(response)?;
    let header_rows = generate_header_rows(&response.headers, &["Set-Cookie"])?;
    let cookie_rows = generate_set_cookie_rows(&response.cookies)?;
    let body = generate_body(response.body.as_ref())?;

    debug!(status_code = response.status_code, "built response");

    Ok(format!("{start_row}{header_rows}{cookie_rows}{EOL}{body}"))
}

fn generate_start_row(response: &Response) -> Result<String, HttpZError> {
    validate_protocol_version(&response.protocol_version)?;
    validate_positive_number(response.status_code, "statusCode")?;
    if response.status_code > 999 {
        return Err(HttpZError::validation("statusCode must have three digits")
            .with_details(response.status_code.to_string()));
    }

    let version = response.protocol_version.to_ascii_uppercase();
    let message = response.status_message.trim();
    validate_no_chars(message, LINE_BREAKS, "statusMessage")?;
    if message.is_empty() {
        Ok(format!("{version} {:03}{EOL}", response.status_code))
    } else {
        Ok(format!("{version} {:03} {message}{EOL}", response.status_code))
    }
}

fn generate_set_cookie_rows(cookies: &[Cookie]) -> Result<String, HttpZError> {
    let mut rows = String::new();
    for (index, cookie) in cookies.iter().enumerate() {
        let at_index = |err: HttpZError| err.with_details(format!("cookie index: {index}"));
        validate_not_empty_string(&cookie.name, "cookie name").map_err(at_index)?;
        validate_no_chars(&cookie.name, &['\r', '\n', ';', '='], "cookie name").map_err(at_index)?;
        if let Some(value) = &cookie.value {
            validate_no_chars(value, &['\r', '\n', ';'], "cookie value").map_err(at_index)?;
        }
        for param in &cookie.params {
            validate_no_chars(param, &['\r', '\n', ';'], "cookie param").map_err(at_index)?;
        }

        rows.push_str("Set-Cookie: ");
        rows.push_str(&cookie.name);
        if let Some(value) = &cookie.value {
            rows.push('=');
            rows.push_str(value);
        }
        for param in &cookie.params {
            rows.push_str("; ");
            rows.push_str(param);
        }
        rows.push_str(EOL);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status_code: u16, status_message: &str) -> Response {
        Response {
            protocol_version: "HTTP/1.1".to_string(),
            status_code,
            status_message: status_message.to_string(),
            headers: Vec::new(),
            cookies: Vec::new(),
            body: None,
            headers_size: 0,
            body_size: 0,
        }
    }

    #[test]
    fn start_row_omits_empty_message() {
        assert_eq!(generate_start_row(&response(204, "")).unwrap(), "HTTP/1.1 204\r\n");
        assert_eq!(
            generate_start_row(&response(404, "Not Found")).unwrap(),
            "HTTP/1.1 404 Not Found\r\n"
        );
    }

    #[test]
    fn zero_status_is_validation_error() {
        assert!(generate_start_row(&response(0, "x")).unwrap_err().is_validation());
        assert!(generate_start_row(&response(1000, "x")).unwrap_err().is_validation());
    }

    #[test]
    fn status_message_with_line_break_is_validation_error() {
        let err = generate_start_row(&response(200, "OK\r\nX-Injected: 1")).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn set_cookie_parts_reject_separators() {
        let mut cookie = Cookie::new("sid", "1");
        cookie.params = vec!["Path=/; Secure".to_string()];
        let err = generate_set_cookie_rows(&[Cookie::new("ok", "1"), cookie]).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.details.as_deref(), Some("cookie index: 1"));
        assert!(generate_set_cookie_rows(&[Cookie::new("sid", "a\nb")]).is_err());
    }

    #[test]
    fn set_cookie_rows_one_per_cookie() {
        let mut session = Cookie::new("sid", "1");
        session.params = vec!["Path=/".to_string(), "HttpOnly".to_string()];
        let flag = Cookie {
            name: "flag".to_string(),
            value: None,
            params: Vec::new(),
        };
        assert_eq!(
            generate_set_cookie_rows(&[session, flag]).unwrap(),
            "Set-Cookie: sid=1; Path=/; HttpOnly\r\nSet-Cookie: flag\r\n"
        );
    }
}
