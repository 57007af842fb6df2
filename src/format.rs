//! The formatting engine: one [`LogRecord`] plus [`FormatOptions`] in, one
//! display line (or nothing) out.

use crate::error::FormatError;
use crate::level;
use crate::options::{FormatOptions, Verdict, DEFAULT_MSG_KEY};
use crate::record::LogRecord;
use crate::style;
use chrono::{DateTime, Local, TimeZone};
use serde_json::{Map, Value};

/// Keys that are rendered elsewhere on the line (or deliberately hidden) and
/// therefore never appear in the auxiliary block.
pub const STANDARD_KEYS: [&str; 10] = [
    "level",
    "time",
    "pid",
    "hostname",
    "msg",
    "message",
    "req",
    "res",
    "responseTime",
    "v",
];

/// Placeholder for missing pieces of the HTTP summary.
const MISSING: &str = "-";

/// Format one record for display.
///
/// Returns `Ok(None)` when the configured filter vetoes the record. The
/// returned line always ends with `\n`.
pub fn format(record: LogRecord, options: &FormatOptions) -> Result<Option<String>, FormatError> {
    let record = match &options.filter {
        Some(filter) => match filter.apply(record).map_err(FormatError::Filter)? {
            Verdict::Keep(record) => record,
            Verdict::Suppress => return Ok(None),
        },
        None => record,
    };

    style::force_styling();
    let mut parts: Vec<String> = Vec::with_capacity(5);

    if !options.hide_letters {
        let level = level::lookup(record.level());
        parts.push(level.prefix(!options.hide_icons).to_string());
    }

    if !options.hide_timestamp {
        let stamp = render_time(record.time(), options.hide_ms);
        parts.push(style::dim(&stamp).to_string());
    }

    parts.push(record.message(&options.msg_key).map(display_value).unwrap_or_default());

    if options.show_objects {
        let extra = auxiliary_fields(&record, &options.msg_key);
        if !extra.is_empty() {
            let json = serde_json::to_string(&Value::Object(extra))?;
            parts.push(style::gray(&json).to_string());
        }
    }

    if !options.hide_web {
        if let Some(summary) = web_summary(&record) {
            parts.push(style::dim(&summary).to_string());
        }
    }

    let mut line = parts.join(" ");
    line.push('\n');

    if options.hide_colors {
        line = style::strip_styles(&line);
    }
    Ok(Some(line))
}

/// Render `time` as local `HH:MM:SS[.mmm]`.
///
/// Accepts epoch milliseconds (fractions truncated) or an RFC 3339 string.
/// Anything else renders the current time.
pub fn render_time(time: Option<&Value>, hide_ms: bool) -> String {
    let pattern = if hide_ms { "%H:%M:%S" } else { "%H:%M:%S%.3f" };
    let when = time.and_then(to_local_time).unwrap_or_else(Local::now);
    when.format(pattern).to_string()
}

fn to_local_time(time: &Value) -> Option<DateTime<Local>> {
    match time {
        Value::Number(n) => {
            let ms = n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))?;
            Local.timestamp_millis_opt(ms).earliest()
        }
        Value::String(s) => DateTime::parse_from_rfc3339(s).ok().map(|t| t.with_timezone(&Local)),
        _ => None,
    }
}

/// Text for a value shown inline: strings verbatim, everything else as
/// compact JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Every field outside [`STANDARD_KEYS`] and `msg_key`, in record order,
/// with level words removed from an array-valued `tags`.
pub fn auxiliary_fields(record: &LogRecord, msg_key: &str) -> Map<String, Value> {
    let excluded = |key: &str| {
        STANDARD_KEYS.contains(&key) || (msg_key != DEFAULT_MSG_KEY && key == msg_key)
    };

    let mut extra: Map<String, Value> = record
        .iter()
        .filter(|(key, _)| !excluded(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let filtered_tags = match extra.get("tags") {
        Some(Value::Array(tags)) => Some(
            tags.iter()
                .filter(|tag| !tag.as_str().is_some_and(level::is_level_word))
                .cloned()
                .collect::<Vec<Value>>(),
        ),
        _ => None,
    };

    if let Some(tags) = filtered_tags {
        if tags.is_empty() {
            extra.shift_remove("tags");
        } else if let Some(slot) = extra.get_mut("tags") {
            *slot = Value::Array(tags);
        }
    }

    extra
}

/// `METHOD url (status[/Nms])` when both `req` and `res` are present.
pub fn web_summary(record: &LogRecord) -> Option<String> {
    let req = record.req()?;
    let res = record.res()?;

    let field = |parent: &Value, key: &str| {
        parent
            .get(key)
            .filter(|v| !v.is_null())
            .map(display_value)
            .unwrap_or_else(|| MISSING.to_string())
    };

    let mut summary = format!(
        "{} {} ({}",
        field(req, "method"),
        field(req, "url"),
        field(res, "statusCode")
    );
    if let Some(elapsed) = record.response_time() {
        summary.push('/');
        summary.push_str(&grouped_number(elapsed));
        summary.push_str("ms");
    }
    summary.push(')');
    Some(summary)
}

/// Render a number with `,` thousands separators and at most three
/// fraction digits. Non-numeric values fall back to [`display_value`].
pub fn grouped_number(value: &Value) -> String {
    let Value::Number(n) = value else {
        return display_value(value);
    };
    if let Some(i) = n.as_i64() {
        return group_integer(i < 0, &i.unsigned_abs().to_string());
    }
    if let Some(u) = n.as_u64() {
        return group_integer(false, &u.to_string());
    }
    let Some(f) = n.as_f64().filter(|f| f.is_finite()) else {
        return n.to_string();
    };

    let fixed = format!("{:.3}", f.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');
    let negative = f < 0.0 && (int_part != "0" || !frac_part.is_empty());

    let mut out = group_integer(negative, int_part);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

fn group_integer(negative: bool, digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}
