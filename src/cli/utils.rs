use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data) = data {
                response["data"] = data;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output rows as a JSON array or as aligned text lines
pub fn output_rows(
    output_format: OutputFormat,
    collection_name: &str,
    rows: &[(String, Value)],
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let items: Vec<&Value> = rows.iter().map(|(_, value)| value).collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ collection_name: items }))?
            );
        }
        OutputFormat::Text => {
            if rows.is_empty() {
                println!("No {} found", collection_name);
            }
            for (line, _) in rows {
                println!("{}", line);
            }
        }
    }
    Ok(())
}
