use chardetng::EncodingDetector;
use encoding_rs::Encoding;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBody {
    pub text: String,
    pub encoding_label: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("failed to decode bytes with {encoding}: {message}")]
    DecodeFailure { encoding: String, message: String },
}

/// Decode raw bytes into UTF-8 using: BOM -> Content-Type charset -> chardetng fallback.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> Result<DecodedBody, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return decode_with(bytes, encoding);
    }

    if let Some(label) = content_type.and_then(extract_charset) {
        if let Some(enc) = Encoding::for_label(label.as_bytes()) {
            return decode_with(bytes, enc);
        }
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let enc = detector.guess(None, true);
    decode_with(bytes, enc)
}

/// Returns the JSON payload of a JSONP response (`cb({...});`), or the input
/// unchanged when it is bare JSON. Leading `//` and `/* */` comments, as sent
/// by Google (`// API callback`) or as an anti-sniffing prefix (`/**/`), are
/// skipped.
pub fn strip_jsonp(text: &str) -> &str {
    let trimmed = skip_leading_comments(text);
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return trimmed;
    }
    let Some(open) = trimmed.find('(') else {
        return trimmed;
    };
    let callback = trimmed[..open].trim();
    let is_callback = !callback.is_empty()
        && callback
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.'));
    if !is_callback {
        return trimmed;
    }
    let body = trimmed.trim_end_matches(';').trim_end();
    match body.strip_suffix(')') {
        Some(inner) => inner[open + 1..].trim(),
        None => trimmed,
    }
}

fn skip_leading_comments(text: &str) -> &str {
    let mut rest = text.trim();
    loop {
        if let Some(line) = rest.strip_prefix("//") {
            rest = match line.find('\n') {
                Some(end) => line[end + 1..].trim_start(),
                None => "",
            };
        } else if let Some(block) = rest.strip_prefix("/*") {
            rest = match block.find("*/") {
                Some(end) => block[end + 2..].trim_start(),
                None => return rest,
            };
        } else {
            return rest;
        }
    }
}

fn extract_charset(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .filter_map(|part| {
            let part = part.trim();
            part.strip_prefix("charset=")
                .or_else(|| part.strip_prefix("Charset="))
                .or_else(|| part.strip_prefix("CHARSET="))
                .map(|v| v.trim_matches([' ', '"', '\''].as_ref()))
        })
        .next()
        .map(|s| s.to_string())
}

fn decode_with(bytes: &[u8], enc: &'static Encoding) -> Result<DecodedBody, DecodeError> {
    let (text, _, had_errors) = enc.decode(bytes);
    if had_errors {
        return Err(DecodeError::DecodeFailure {
            encoding: enc.name().to_string(),
            message: "decoding error".into(),
        });
    }
    Ok(DecodedBody {
        text: text.into_owned(),
        encoding_label: enc.name().to_string(),
    })
}
