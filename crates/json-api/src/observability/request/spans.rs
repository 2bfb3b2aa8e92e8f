//! HTTP span helpers.

use uuid::Uuid;

/// Shortest all-hex segment treated as an identifier.
const MIN_HEX_ID_LEN: usize = 16;

/// `"{method} {path}"` with identifier segments replaced by `{id}`.
pub(super) fn request_span_name(method: &str, path: &str) -> String {
    format!("{method} {}", normalise_path_for_span_name(path))
}

fn is_identifier(segment: &str) -> bool {
    Uuid::parse_str(segment).is_ok()
        || (segment.len() >= MIN_HEX_ID_LEN && segment.chars().all(|c| c.is_ascii_hexdigit()))
}

fn normalise_path_for_span_name(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut normalised = String::from("/");

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            normalised.push('/');
        }

        if is_identifier(segment) {
            normalised.push_str("{id}");
        } else {
            normalised.push_str(segment);
        }
    }

    normalised
}
