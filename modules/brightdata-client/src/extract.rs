//! Pure content extraction from raw provider records.
//!
//! Provider payload shapes vary by platform and over time, so records are
//! treated as loosely-typed JSON and only the fields each platform's
//! extractor reads are validated. Extraction is total: malformed input
//! degrades to the raw payload rendered as text with every optional field
//! absent, never an error.

use serde_json::{Map, Value};

use crate::types::{ExtractedContent, Platform};

/// Extract normalized content from one raw provider record.
pub fn extract(raw: &Value, platform: Platform) -> ExtractedContent {
    match platform {
        Platform::X => extract_x(raw),
        Platform::LinkedIn => extract_linkedin(raw),
        Platform::Unknown => ExtractedContent::default(),
    }
}

fn extract_x(raw: &Value) -> ExtractedContent {
    let Some(obj) = raw.as_object() else {
        return raw_fallback(raw);
    };

    let content = first_non_empty(obj, &["description", "text", "content"])
        .unwrap_or_else(|| raw.to_string());

    let preview_image_url = first_array_string(obj, "photos");

    // Only fall back to video when there is no photo.
    let preview_video_url = if preview_image_url.is_none() {
        first_video_url(obj)
    } else {
        None
    };

    ExtractedContent {
        content,
        preview_image_url,
        preview_video_url,
        social_profile_name: string_field(obj, "user_posted"),
    }
}

fn extract_linkedin(raw: &Value) -> ExtractedContent {
    let Some(obj) = raw.as_object() else {
        return raw_fallback(raw);
    };

    let content = first_non_empty(obj, &["post_text", "text", "title", "headline"])
        .unwrap_or_else(|| raw.to_string());

    ExtractedContent {
        content,
        preview_image_url: first_array_string(obj, "images"),
        preview_video_url: None,
        social_profile_name: string_field(obj, "user_id"),
    }
}

/// Non-object record: render it as text, nothing else to read.
fn raw_fallback(raw: &Value) -> ExtractedContent {
    let content = match raw.as_str() {
        Some(s) => s.to_string(),
        None => raw.to_string(),
    };
    ExtractedContent {
        content,
        ..ExtractedContent::default()
    }
}

/// First key whose value is a non-empty string.
fn first_non_empty(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        obj.get(*key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from)
    })
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(String::from)
}

/// First element of an array-of-strings field, e.g. `photos` or `images`.
fn first_array_string(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)?
        .as_array()?
        .first()?
        .as_str()
        .map(String::from)
}

/// The first entry of `videos` is either a bare URL string or an object
/// carrying `video_url`. An object without `video_url` yields nothing.
fn first_video_url(obj: &Map<String, Value>) -> Option<String> {
    match obj.get("videos")?.as_array()?.first()? {
        Value::String(url) => Some(url.clone()),
        Value::Object(video) => video
            .get("video_url")
            .and_then(Value::as_str)
            .map(String::from),
        _ => None,
    }
}
