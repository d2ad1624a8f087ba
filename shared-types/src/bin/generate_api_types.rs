use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let mut types = Vec::new();

    // Filter panel types
    types.push(clean_type(Comparator::export_to_string()?));
    types.push(clean_type(DateRange::export_to_string()?));
    types.push(clean_type(AmountRange::export_to_string()?));
    types.push(clean_type(FilterParams::export_to_string()?));
    types.push(clean_type(FilterEdit::export_to_string()?));

    // Filter API types
    types.push(clean_type(BuildFilterRequest::export_to_string()?));
    types.push(clean_type(ExtractFilterRequest::export_to_string()?));
    types.push(clean_type(EditFilterRequest::export_to_string()?));
    types.push(clean_type(ReplaceFilterRequest::export_to_string()?));
    types.push(clean_type(FilterStateResponse::export_to_string()?));
    types.push(clean_type(ErrorResponse::export_to_string()?));

    // Settings types
    types.push(clean_type(SettingsResponse::export_to_string()?));
    types.push(clean_type(UpdateCurrencyRequest::export_to_string()?));

    let output_dir = Path::new("../gui/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    // All types share one file, so cross-type imports are dropped
    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_type_drops_imports_and_banner() {
        let raw = "// This file was generated by [ts-rs]. Do not edit.\r\n\
                   import type { AmountRange } from \"./AmountRange\";\r\n\
                   \r\n\
                   export type Slot = { base_range: AmountRange | null, };\r\n";

        assert_eq!(
            clean_type(raw.to_string()),
            "export type Slot = { base_range: AmountRange | null, };\n"
        );
    }

    #[test]
    fn test_exported_types_reference_each_other_by_name() {
        let output = clean_type(FilterStateResponse::export_to_string().unwrap());
        assert!(!output.contains("import type"));
        assert!(output.contains("AmountRange"));
    }
}
