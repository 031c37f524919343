use std::sync::LazyLock;

use regex::Regex;

pub const EOL: &str = "\r\n";
pub const EOL2X: &str = "\r\n\r\n";

pub const MESSAGE_FORMAT: &str = "expected start-line CRLF *(header CRLF) CRLF [body]";
pub const REQUEST_START_LINE_FORMAT: &str = "Method SP request-target SP HTTP-Version";
pub const RESPONSE_START_LINE_FORMAT: &str = "HTTP-Version SP status-code SP status-message";

pub const METHODS: &[&str] = &[
    "GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "OPTIONS", "CONNECT", "TRACE",
];

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static grammar pattern compiles")
}

pub static REQUEST_START_ROW: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)^(GET|HEAD|POST|PUT|PATCH|DELETE|OPTIONS|CONNECT|TRACE) (\S+) (HTTP/\d(?:\.\d)?)$")
});

pub static REQUEST_START_ROW_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)^[A-Za-z]+ \S+ HTTP/"));

pub static RESPONSE_START_ROW: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)^(HTTP/\d(?:\.\d)?) (\d{3})(?: (.*))?$"));

pub static RESPONSE_START_ROW_SHAPE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)^HTTP/"));

pub static PROTOCOL_VERSION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)^HTTP/\d(?:\.\d)?$"));

pub static QUOTED_VALUE: LazyLock<Regex> = LazyLock::new(|| compile(r#"^"([^"]*)"$"#));

pub static BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?i)(?:^|;)\s*boundary=("[^"]+"|[^;\s]+)"#));

pub static CONTENT_DISPOSITION: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)^content-disposition:\s*([^;\s]*)(.*)$"));

pub static CONTENT_TYPE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)^content-type:\s*(.*)$"));

pub static DISPOSITION_NAME: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?i);\s*name=(?:"([^"]*)"|([^;\s]+))"#));

pub static DISPOSITION_FILE_NAME: LazyLock<Regex> =
    LazyLock::new(|| compile(r#"(?i);\s*filename=(?:"([^"]*)"|([^;\s]+))"#));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFamily {
    Multipart,
    UrlEncoded,
    Text,
}

impl ContentFamily {
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type {
            Some(
                "multipart/form-data"
                | "multipart/alternative"
                | "multipart/mixed"
                | "multipart/related",
            ) => Self::Multipart,
            Some("application/x-www-form-urlencoded") => Self::UrlEncoded,
            _ => Self::Text,
        }
    }
}

pub fn is_known_method(method: &str) -> bool {
    METHODS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(method))
}
