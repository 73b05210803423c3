//! Import and export command handlers.

use std::path::PathBuf;
use std::sync::Arc;

use magic_keywords::config::KeywordsConfig;
use magic_keywords::io::{
    ExportOptions, ExportService, Format, ImportResult, ImportService, ValidationMode,
};
use magic_keywords::{Error, KeywordService, Result};

use super::ImportArgs;

/// Maximum number of warnings printed after an import.
const MAX_LISTED: usize = 10;

/// Executes the import command.
pub fn cmd_import(
    keywords: Arc<KeywordService>,
    config: &KeywordsConfig,
    args: ImportArgs,
) -> Result<()> {
    let mut options = config.import_options().with_dry_run(args.dry_run);
    if let Some(f) = args.format {
        options = options.with_format(f.parse::<Format>()?);
    }
    if args.replace {
        options = options.with_merge(false);
    }
    if args.overwrite {
        options = options.with_overwrite(true);
    }
    if args.strict {
        options = options.with_validation(ValidationMode::Strict);
    }

    let import_service = ImportService::new(keywords);
    let result = if args.file.as_os_str() == "-" {
        let text = std::io::read_to_string(std::io::stdin())
            .map_err(|e| Error::operation("read_stdin", e))?;
        import_service.import_text(&text, None, &options)?
    } else {
        import_service.import_file(&args.file, &options)?
    };

    print_import_summary(&result, args.dry_run);
    Ok(())
}

fn print_import_summary(result: &ImportResult, dry_run: bool) {
    if dry_run {
        println!("Dry run completed (no changes made):");
    } else {
        println!("Import completed:");
    }

    println!("  Imported:         {}", result.success);
    println!("  Skipped (dupe):   {}", result.skipped);
    println!("  Failed:           {}", result.failed);
    println!("  Total processed:  {}", result.total());

    print_capped("Warnings", &result.warnings);

    if !result.errors.is_empty() {
        println!();
        println!("Errors ({}):", result.errors.len());
        for error in &result.errors {
            println!("  - {error}");
        }
    }
}

fn print_capped(heading: &str, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    println!();
    println!("{heading} ({}):", lines.len());
    for line in lines.iter().take(MAX_LISTED) {
        println!("  - {line}");
    }
    if lines.len() > MAX_LISTED {
        println!("  ... and {} more", lines.len() - MAX_LISTED);
    }
}

/// Executes the export command.
///
/// Writes to stdout unless an output path is given. A directory output
/// receives a dated default file name.
pub fn cmd_export(
    keywords: Arc<KeywordService>,
    format: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let format = match (&format, &output) {
        (Some(f), _) => f.parse::<Format>()?,
        (None, Some(path)) if !path.is_dir() => Format::from_path(path)?,
        (None, _) => Format::Json,
    };

    let export_service = ExportService::new(keywords);
    let options = ExportOptions::default().with_format(format);

    let Some(output) = output else {
        let (text, _) = export_service.export_with(&options)?;
        print!("{text}");
        return Ok(());
    };

    let path = if output.is_dir() {
        let today = chrono::Local::now().date_naive();
        output.join(ExportService::default_filename(format, today))
    } else {
        output
    };

    let result = export_service.export_to_file(&path, &options)?;
    eprintln!(
        "Exported {} keyword(s) as {} to {}",
        result.exported,
        format,
        path.display()
    );
    Ok(())
}
