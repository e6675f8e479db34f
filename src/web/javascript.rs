//! Legacy popup callback payloads.
//!
//! The upload form is posted from a popup window; the answer is a script that
//! hands a JSON value back to a named function of the opener and closes the popup.

/// `{ "key" : value }` with `value` inserted as is
pub fn simple_json_pair(key: &str, value: &str) -> String {
    format!("{{ \"{}\" : {} }}", key, value)
}

/// `{ "key" : "value" }` with `value` encoded as a JSON string
pub fn escaped_simple_json_pair(key: &str, value: &str) -> String {
    simple_json_pair(key, &json_string(value))
}

/// JSON string literal that is also safe inside an inline `<script>` element
pub fn json_string(value: &str) -> String {
    let quoted = serde_json::Value::String(value.to_string()).to_string();
    quoted.replace("</", "<\\/")
}

pub fn callback_script(callback: &str, json: &str) -> String {
    format!(
        "<script type='text/javascript'>window.opener.focus(); window.opener.{}({}); window.close();</script>",
        callback, json
    )
}
