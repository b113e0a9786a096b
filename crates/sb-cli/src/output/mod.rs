use std::io::IsTerminal;

use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;

pub mod table;

/// Columns shown first when present; the rest follow alphabetically.
const LEADING_COLUMNS: [&str; 4] = ["id", "name", "company", "status"];

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
        OutputFormat::Csv => render_csv(value),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    match serde_json::to_value(value)? {
        Value::Array(items) => Ok(render_array_table(&items)),
        // Pages and search results carry their rows under one array field.
        Value::Object(map) if listing_rows(&map).is_some() => {
            Ok(listing_rows(&map).map_or_else(String::new, render_array_table))
        }
        Value::Object(map) => {
            let mut entries = map.into_iter().collect::<Vec<_>>();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let rows = entries
                .into_iter()
                .map(|(key, value)| vec![key, value_to_cell(&value)])
                .collect::<Vec<_>>();
            Ok(table::render_entity_table(&["key", "value"], &rows, options()))
        }
        scalar => {
            let rows = vec![vec![value_to_cell(&scalar)]];
            Ok(table::render_entity_table(&["value"], &rows, options()))
        }
    }
}

/// Listings become one record per row; a single object becomes one record.
fn render_csv<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let value = serde_json::to_value(value)?;
    let rows = match &value {
        Value::Array(items) => items.clone(),
        Value::Object(map) => listing_rows(map).map_or_else(|| vec![value.clone()], <[Value]>::to_vec),
        scalar => vec![serde_json::json!({ "value": scalar })],
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    if rows.iter().all(Value::is_object) {
        let headers = column_order(&rows);
        if headers.is_empty() {
            return Ok(String::new());
        }
        writer.write_record(&headers)?;
        for map in rows.iter().filter_map(Value::as_object) {
            writer.write_record(
                headers
                    .iter()
                    .map(|header| map.get(header).map_or_else(String::new, csv_field)),
            )?;
        }
    } else {
        writer.write_record(["value"])?;
        for item in &rows {
            writer.write_record([csv_field(item)])?;
        }
    }

    let bytes = writer.into_inner().map_err(|err| anyhow::anyhow!("csv flush failed: {err}"))?;
    let rendered = String::from_utf8(bytes)?;
    Ok(rendered.trim_end_matches('\n').to_string())
}

/// Null is an empty field in CSV rather than the table's dash.
fn csv_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => value_to_cell(other),
    }
}

fn listing_rows(map: &serde_json::Map<String, Value>) -> Option<&[Value]> {
    ["items", "sites"]
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_array))
        .map(Vec::as_slice)
}

fn options() -> table::TableOptions {
    table::TableOptions {
        max_width: terminal_width(),
        color: std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

fn terminal_width() -> Option<usize> {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|width| *width >= 40)
}

fn render_array_table(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    if !items.iter().all(Value::is_object) {
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return table::render_entity_table(&["value"], &rows, options());
    }

    let headers = column_order(items);
    if headers.is_empty() {
        return String::from("(no columns)");
    }

    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(header).map_or_else(|| String::from("-"), value_to_cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    table::render_entity_table(&header_refs, &rows, options())
}

/// Union of keys across rows, leading columns first and the rest alphabetical.
fn column_order(items: &[Value]) -> Vec<String> {
    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    headers.sort_by_key(|header| {
        let rank = LEADING_COLUMNS
            .iter()
            .position(|leading| *leading == header.as_str())
            .unwrap_or(LEADING_COLUMNS.len());
        (rank, header.clone())
    });
    headers
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;
    use serde_json::json;

    use super::render;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Example {
        id: &'static str,
        version: u32,
    }

    #[test]
    fn json_render_is_valid_json() {
        let value = Example { id: "SITE-1", version: 7 };
        let out = render(&value, OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["id"], "SITE-1");
        assert_eq!(parsed["version"], 7);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let value = Example { id: "SITE-1", version: 7 };
        let out = render(&value, OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn table_render_for_object_is_key_value() {
        let value = Example { id: "SITE-1", version: 7 };
        let out = render(&value, OutputFormat::Table).expect("table render should work");
        assert!(out.lines().next().is_some_and(|line| line.contains("key")));
        assert!(out.contains("SITE-1"));
    }

    #[test]
    fn page_renders_its_items_with_id_first() {
        let page = json!({
            "items": [
                {"version": 2, "name": "Riverside", "id": "SITE-1", "manager_id": null},
                {"version": 1, "name": "Hilltop", "id": "SITE-2", "manager_id": "PRS-1"},
            ],
            "total": 2,
        });
        let out = render(&page, OutputFormat::Table).expect("table render should work");
        let header = out.lines().next().expect("header line");
        assert!(header.starts_with("id"));
        assert!(header.find("name") < header.find("version"));
        assert!(out.contains("Hilltop"));
        assert!(!out.contains("total"));
    }

    #[test]
    fn empty_listing_says_so() {
        let out = render(&json!({"sites": []}), OutputFormat::Table).expect("render");
        assert_eq!(out, "(no rows)");
    }

    #[test]
    fn csv_listing_has_header_and_one_record_per_row() {
        let page = json!({
            "items": [
                {"version": 2, "name": "Riverside, East", "id": "SITE-1", "manager_id": null},
                {"version": 1, "name": "현장 \"A\"", "id": "SITE-2", "manager_id": "PRS-1"},
            ],
            "total": 2,
        });
        let out = render(&page, OutputFormat::Csv).expect("csv render should work");
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "id,name,manager_id,version");
        assert_eq!(lines[1], "SITE-1,\"Riverside, East\",,2");
        assert_eq!(lines[2], "SITE-2,\"현장 \"\"A\"\"\",PRS-1,1");
        assert!(!out.contains("total"));
    }

    #[test]
    fn csv_single_object_is_one_record() {
        let value = Example { id: "SITE-1", version: 7 };
        let out = render(&value, OutputFormat::Csv).expect("csv render should work");
        assert_eq!(out, "id,version\nSITE-1,7");
    }

    #[test]
    fn csv_empty_listing_is_empty() {
        let out = render(&json!({"sites": []}), OutputFormat::Csv).expect("render");
        assert_eq!(out, "");
    }
}
