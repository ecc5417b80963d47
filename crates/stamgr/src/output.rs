//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde_json::Value;
use stamgr_api::Record;
use tabled::{Table, Tabled, settings::Style};

use crate::cli::OutputFormat;

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of records in the chosen format.
///
/// - `table`: converts each record with `to_row` and builds a pretty table
/// - `json` / `json-compact` / `yaml`: serializes the records untouched
/// - `plain`: calls `id_fn` on each record to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a command result for the structured formats only. Table and plain
/// output have nothing to show beyond the success line, so they yield `None`.
pub fn render_structured<T>(format: &OutputFormat, data: &T) -> Option<String>
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Json => Some(render_json(data, false)),
        OutputFormat::JsonCompact => Some(render_json(data, true)),
        OutputFormat::Yaml => Some(render_yaml(data)),
        OutputFormat::Table | OutputFormat::Plain => None,
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Print a success line to stderr; green when stderr is a terminal.
pub fn print_success(message: &str, quiet: bool) {
    if quiet {
        return;
    }
    if io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none() {
        eprintln!("{} {message}", "✓".green().bold());
    } else {
        eprintln!("{message}");
    }
}

// ── Record field access ──────────────────────────────────────────────

/// Display a record field: strings as-is, scalars via `Display`, missing or
/// null fields as `-`.
pub fn field(record: &Record, key: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) => "-".into(),
        Some(Value::String(s)) if s.is_empty() => "-".into(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Display a boolean-ish record field as yes/no.
pub fn flag(record: &Record, key: &str) -> String {
    let set = record.get(key).and_then(Value::as_bool).unwrap_or(false);
    if set { "yes" } else { "no" }.into()
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_default()
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[derive(Tabled)]
    struct MacRow {
        #[tabled(rename = "MAC")]
        mac: String,
    }

    #[test]
    fn field_formats_scalars_and_gaps() {
        let r = record(json!({"mac": "aa:bb", "rx": 12, "name": "", "ip": null}));
        assert_eq!(field(&r, "mac"), "aa:bb");
        assert_eq!(field(&r, "rx"), "12");
        assert_eq!(field(&r, "name"), "-");
        assert_eq!(field(&r, "ip"), "-");
        assert_eq!(field(&r, "missing"), "-");
    }

    #[test]
    fn flag_treats_absent_as_no() {
        let r = record(json!({"blocked": true, "is_guest": false}));
        assert_eq!(flag(&r, "blocked"), "yes");
        assert_eq!(flag(&r, "is_guest"), "no");
        assert_eq!(flag(&r, "authorized"), "no");
    }

    #[test]
    fn plain_emits_one_id_per_line() {
        let data = vec![
            record(json!({"mac": "aa:aa"})),
            record(json!({"mac": "bb:bb"})),
        ];
        let out = render_list(
            &OutputFormat::Plain,
            &data,
            |r| MacRow { mac: field(r, "mac") },
            |r| field(r, "mac"),
        );
        assert_eq!(out, "aa:aa\nbb:bb");
    }

    #[test]
    fn json_serializes_records_untouched() {
        let data = vec![record(json!({"mac": "aa:aa", "extra": [1, 2]}))];
        let out = render_list(
            &OutputFormat::JsonCompact,
            &data,
            |r| MacRow { mac: field(r, "mac") },
            |r| field(r, "mac"),
        );
        let parsed: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, json!([{"mac": "aa:aa", "extra": [1, 2]}]));
    }

    #[test]
    fn structured_only_for_serde_formats() {
        let data = Some(vec![record(json!({"mac": "aa:aa"}))]);
        assert!(render_structured(&OutputFormat::Table, &data).is_none());
        assert!(render_structured(&OutputFormat::Plain, &data).is_none());
        assert_eq!(
            render_structured(&OutputFormat::JsonCompact, &data).as_deref(),
            Some(r#"[{"mac":"aa:aa"}]"#)
        );
        assert_eq!(
            render_structured(&OutputFormat::JsonCompact, &None::<Vec<Record>>).as_deref(),
            Some("null")
        );
    }

    #[test]
    fn table_has_header() {
        let data = vec![record(json!({"mac": "aa:aa"}))];
        let out = render_list(
            &OutputFormat::Table,
            &data,
            |r| MacRow { mac: field(r, "mac") },
            |r| field(r, "mac"),
        );
        assert!(out.contains("MAC"));
        assert!(out.contains("aa:aa"));
    }
}
