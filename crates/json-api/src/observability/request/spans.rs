//! HTTP span helpers.

use uuid::Uuid;

#[derive(Debug, Clone)]
pub(super) struct RequestSpanName {
    pub(super) otel_path: String,
    pub(super) otel_span_name: String,
}

pub(super) fn request_span_name(method: &str, path: &str) -> RequestSpanName {
    let otel_path = normalise_path_for_span_name(path);
    let otel_span_name = format!("{method} {otel_path}");

    RequestSpanName {
        otel_path,
        otel_span_name,
    }
}

/// Route template for `path`: identifiers and coupon codes become placeholders
/// so metric labels stay bounded.
fn normalise_path_for_span_name(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut previous = "";
    let segments: Vec<&str> = path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| {
            let template = segment_template(previous, segment);
            previous = segment;
            template
        })
        .collect();

    format!("/{}", segments.join("/"))
}

fn segment_template<'a>(previous: &str, segment: &'a str) -> &'a str {
    if Uuid::parse_str(segment).is_ok() {
        return "{uuid}";
    }

    // `/coupons/validate` is a fixed route; anything else under coupons is a code.
    if previous == "coupons" && segment != "validate" {
        return "{code}";
    }

    segment
}
