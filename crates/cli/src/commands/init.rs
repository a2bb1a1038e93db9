//! `docchat init`: first-time setup.

use std::path::{Path, PathBuf};

use docchat_config::{DEFAULT_SYSTEM_PROMPT, Settings, SuggestedPrompts, WorkspacePaths};

pub fn run(paths: &WorkspacePaths) -> docchat_core::Result<()> {
    println!("docchat: First-Time Setup");
    println!("=========================\n");

    for (path, created) in init_workspace(paths)? {
        if created {
            println!("  ✅ Created {}", path.display());
        } else {
            println!("  Exists, left untouched: {}", path.display());
        }
    }

    println!("\n  Next steps:");
    println!("    1. Put .txt, .pdf or .docx files in {}", paths.documents_dir().display());
    println!(
        "    2. Add GOOGLE_API_KEY = \"...\" to {}",
        paths.secrets_file().display()
    );
    println!("    3. Run `docchat chat`\n");
    Ok(())
}

/// Create the starter files and directories. Existing files are never
/// overwritten. Returns each path with whether it was created.
pub fn init_workspace(paths: &WorkspacePaths) -> docchat_core::Result<Vec<(PathBuf, bool)>> {
    std::fs::create_dir_all(paths.config_dir())?;

    let suggestions = SuggestedPrompts::default().all().join("\n") + "\n";
    let files = [
        (paths.settings_file(), Settings::default().to_json_pretty()? + "\n"),
        (paths.system_prompt_file(), format!("{DEFAULT_SYSTEM_PROMPT}\n")),
        (paths.suggested_prompts_file(), suggestions),
    ];

    let mut report = Vec::with_capacity(files.len() + 1);
    for (path, content) in files {
        let created = write_if_missing(&path, &content)?;
        report.push((path, created));
    }

    let documents = paths.documents_dir();
    let created = !documents.exists();
    std::fs::create_dir_all(&documents)?;
    report.push((documents, created));

    Ok(report)
}

fn write_if_missing(path: &Path, content: &str) -> std::io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    std::fs::write(path, content)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docchat_config::{load_settings, load_suggested_prompts, load_system_prompt};

    #[test]
    fn init_writes_loadable_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = WorkspacePaths::new(tmp.path());

        let report = init_workspace(&paths).unwrap();
        assert_eq!(report.len(), 4);
        assert!(report.iter().all(|(_, created)| *created));

        let settings = load_settings(&paths.settings_file());
        assert!(settings.is_clean(), "{:?}", settings.warnings);
        assert_eq!(settings.value, Settings::default());
        assert_eq!(load_system_prompt(&paths.system_prompt_file()).value, DEFAULT_SYSTEM_PROMPT);
        assert_eq!(
            load_suggested_prompts(&paths.suggested_prompts_file()).value,
            SuggestedPrompts::default()
        );
        assert!(paths.documents_dir().is_dir());
    }

    #[test]
    fn init_never_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = WorkspacePaths::new(tmp.path());
        std::fs::create_dir_all(paths.config_dir()).unwrap();
        std::fs::write(paths.system_prompt_file(), "My own prompt.").unwrap();

        let report = init_workspace(&paths).unwrap();
        let prompt_entry = report
            .iter()
            .find(|(p, _)| *p == paths.system_prompt_file())
            .unwrap();
        assert!(!prompt_entry.1);
        assert_eq!(
            std::fs::read_to_string(paths.system_prompt_file()).unwrap(),
            "My own prompt."
        );

        let again = init_workspace(&paths).unwrap();
        assert!(again.iter().all(|(_, created)| !*created));
    }

    #[test]
    fn unwritable_root_surfaces_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("not-a-dir");
        std::fs::write(&root, "file").unwrap();

        let err = init_workspace(&WorkspacePaths::new(&root)).unwrap_err();
        assert!(matches!(err, docchat_core::Error::Io(_)));
    }
}
