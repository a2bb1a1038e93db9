//! `docchat doctor`: diagnose the workspace without calling the API.

use docchat_config::{
    WorkspacePaths, load_settings, load_suggested_prompts, load_system_prompt, resolve_api_key,
};
use docchat_documents::load_document_context;

pub fn run(paths: &WorkspacePaths) -> docchat_core::Result<()> {
    println!("docchat doctor: Workspace Diagnostics");
    println!("=====================================\n");
    println!("  Root: {}\n", paths.root().display());

    let mut issues = 0;

    let settings = load_settings(&paths.settings_file());
    if settings.is_clean() {
        println!("  ✅ Settings valid ({})", paths.settings_file().display());
    } else {
        for warning in &settings.warnings {
            println!("  ⚠️  {warning}");
        }
        issues += 1;
    }
    let s = &settings.value;
    println!(
        "     bot_name={:?} model={} temperature={} enable_logging={}",
        s.bot_name, s.model, s.temperature, s.enable_logging
    );
    match s.max_context_chars {
        Some(max) => println!("     max_context_chars={max}"),
        None => println!("     max_context_chars=unlimited"),
    }

    let prompt = load_system_prompt(&paths.system_prompt_file());
    if prompt.is_clean() {
        println!("  ✅ System prompt loaded ({} chars)", prompt.value.chars().count());
    } else {
        for warning in &prompt.warnings {
            println!("  ⚠️  {warning}");
        }
        issues += 1;
    }

    let suggestions = load_suggested_prompts(&paths.suggested_prompts_file()).value;
    println!(
        "  ✅ {} suggested prompt(s), {} shown",
        suggestions.all().len(),
        suggestions.for_display().len()
    );

    let documents = load_document_context(&paths.documents_dir());
    if documents.warnings().is_empty() {
        println!(
            "  ✅ {} document(s) loaded (~{} tokens)",
            documents.loaded_files().len(),
            documents.estimated_tokens()
        );
    } else {
        println!("  ⚠️  {} document(s) loaded", documents.loaded_files().len());
        for warning in documents.warnings() {
            println!("     {warning}");
        }
        issues += 1;
    }
    for file in documents.loaded_files() {
        println!("     - {file}");
    }

    match resolve_api_key(paths) {
        Ok(_) => println!("  ✅ API key configured"),
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
        }
    }

    if s.enable_logging {
        println!("  Logging to {}", paths.log_file().display());
    }

    println!();
    if issues == 0 {
        println!("  All checks passed!");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
