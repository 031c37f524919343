use regex::Regex;

use crate::grammar::{
    CONTENT_DISPOSITION, CONTENT_TYPE, DISPOSITION_FILE_NAME, DISPOSITION_NAME, EOL,
};
use crate::{DispositionType, HttpZError, MultipartPart};

const DISPOSITION_FORMAT: &str =
    "Incorrect Content-Disposition, expected: Content-Disposition: form-data|inline|attachment";

/// Parses one `--boundary` delimited segment into a part.
pub fn parse_part(segment: &str) -> Result<MultipartPart, HttpZError> {
    let segment = segment.strip_prefix(EOL).unwrap_or(segment);
    let segment = segment.strip_suffix(EOL).unwrap_or(segment);

    let (disposition_row, mut rest) = match segment.find(EOL) {
        Some(index) => (&segment[..index], &segment[index + EOL.len()..]),
        None => (segment, ""),
    };

    let captures = CONTENT_DISPOSITION
        .captures(disposition_row)
        .ok_or_else(|| HttpZError::format(DISPOSITION_FORMAT).with_details(segment))?;
    let token = captures.get(1).map_or("", |token| token.as_str());
    let attributes = captures.get(2).map_or("", |attrs| attrs.as_str());
    let kind = match token.to_ascii_lowercase().as_str() {
        "form-data" => None,
        "inline" => Some(DispositionType::Inline),
        "attachment" => Some(DispositionType::Attachment),
        _ => return Err(HttpZError::format(DISPOSITION_FORMAT).with_details(disposition_row)),
    };

    let mut content_type = None;
    if let Some(index) = rest.find(EOL) {
        if let Some(captures) = CONTENT_TYPE.captures(&rest[..index]) {
            content_type = captures.get(1).map(|value| value.as_str().trim().to_string());
            rest = &rest[index + EOL.len()..];
        }
    }

    let value = rest.strip_prefix(EOL).ok_or_else(|| {
        HttpZError::format("Incorrect form-data parameter, expected: headers EOL EOL value")
            .with_details(segment)
    })?;

    let name = attribute(&DISPOSITION_NAME, attributes);
    if kind.is_none() && name.is_none() {
        return Err(
            HttpZError::format("Incorrect Content-Disposition, expected: name=\"value\"")
                .with_details(disposition_row),
        );
    }

    Ok(MultipartPart {
        kind,
        name,
        file_name: attribute(&DISPOSITION_FILE_NAME, attributes),
        content_type,
        value: value.to_string(),
    })
}

fn attribute(pattern: &Regex, attributes: &str) -> Option<String> {
    pattern.captures(attributes).and_then(|captures| {
        captures
            .get(1)
            .or_else(|| captures.get(2))
            .map(|value| value.as_str().to_string())
    })
}
