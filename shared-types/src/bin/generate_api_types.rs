use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let mut types = Vec::new();

    // Letter types
    types.push(clean_type(LetterType::export_to_string()?));
    types.push(clean_type(Language::export_to_string()?));
    types.push(clean_type(ToneDetected::export_to_string()?));
    types.push(clean_type(UrgencyLevel::export_to_string()?));
    types.push(clean_type(ContactInfo::export_to_string()?));
    types.push(clean_type(StructuredData::export_to_string()?));
    types.push(clean_type(LetterMetadata::export_to_string()?));
    types.push(clean_type(GenerateLetterResponse::export_to_string()?));

    // Layout types
    types.push(clean_type(LayoutOutcome::export_to_string()?));
    types.push(clean_type(LayoutReport::export_to_string()?));
    types.push(clean_type(NormalizeLetterRequest::export_to_string()?));
    types.push(clean_type(NormalizeLetterResponse::export_to_string()?));

    // Common types
    types.push(clean_type(ErrorResponse::export_to_string()?));
    types.push(clean_type(HealthResponse::export_to_string()?));

    let output_dir = Path::new("../catat-frontend/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    // Check if the type definition includes imports (like StructuredData which imports ContactInfo)
    let lines: Vec<&str> = type_def.lines().collect();
    let has_import = lines
        .iter()
        .any(|line| line.trim().starts_with("import type"));

    let filtered: Vec<&str> = lines
        .iter()
        .filter(|line| {
            let trimmed = line.trim();
            // Keep import lines if they're part of a type definition (StructuredData imports ContactInfo)
            if trimmed.starts_with("import type") {
                return has_import;
            }
            // Filter out the generated comment line
            !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .cloned()
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
