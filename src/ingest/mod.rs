// Export ingestion: files on disk → RawMessage list
//
// Every selected file is read and parsed in its own task; the batch is
// joined as a whole before anything downstream runs. A read error or a
// panicked task fails the batch. A file that doesn't parse is logged
// and contributes nothing.

pub mod html;
pub mod json;
pub mod text;
pub mod timestamp;

use crate::derive::TimeBasis;
use crate::model::RawMessage;
use anyhow::{bail, Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tokio::task::JoinSet;
use walkdir::WalkDir;

/// HTML pages must live under a `messages/` directory and name themselves `message…`
static HTML_EXPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)messages/.*message.*\.html$").expect("export path pattern is valid")
});

/// Which reader a batch goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Html,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

/// Expand directories into the files beneath them, sorted by name
pub fn discover(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry =
                    entry.with_context(|| format!("Failed to walk {}", path.display()))?;
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
        } else if path.exists() {
            files.push(path.clone());
        } else {
            bail!("No such file or directory: {}", path.display());
        }
    }
    Ok(files)
}

fn extension_is(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

/// Decide the batch format; mixing HTML and JSON is refused
pub fn detect_format(files: &[PathBuf]) -> Result<ExportFormat> {
    let has_html = files.iter().any(|f| extension_is(f, "html"));
    let has_json = files.iter().any(|f| extension_is(f, "json"));
    match (has_html, has_json) {
        (true, true) => bail!("Select either HTML files or JSON files, not both"),
        (false, true) => Ok(ExportFormat::Json),
        (true, false) => Ok(ExportFormat::Html),
        (false, false) => bail!("No message export files (.html or .json) found"),
    }
}

/// Whether a file takes part in a batch of the given format
pub fn is_export_file(path: &Path, format: ExportFormat) -> bool {
    match format {
        ExportFormat::Json => extension_is(path, "json"),
        ExportFormat::Html => {
            let normalized = path.to_string_lossy().replace('\\', "/");
            HTML_EXPORT_RE.is_match(&normalized)
        }
    }
}

/// Read and parse one file
async fn read_export(path: PathBuf, format: ExportFormat, basis: TimeBasis) -> Result<Vec<RawMessage>> {
    let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let messages = match format {
        ExportFormat::Html => html::parse(&content, basis),
        ExportFormat::Json => match json::parse(&content) {
            Ok(messages) => messages,
            Err(e) => {
                tracing::warn!("Skipping {}: {:#}", path.display(), e);
                Vec::new()
            }
        },
    };

    if messages.is_empty() {
        tracing::info!("No messages in {}", path.display());
    } else {
        tracing::debug!("{} messages from {}", messages.len(), path.display());
    }
    Ok(messages)
}

/// Load every export under `paths` as one batch
///
/// Messages keep file order (the order `discover` returns), regardless of
/// which read finishes first.
pub async fn load_paths(paths: &[PathBuf], basis: TimeBasis) -> Result<Vec<RawMessage>> {
    let files = discover(paths)?;
    let format = detect_format(&files)?;
    let files: Vec<PathBuf> = files
        .into_iter()
        .filter(|f| is_export_file(f, format))
        .collect();
    if files.is_empty() {
        bail!(
            "No {} message files found (HTML pages must sit under a messages/ folder)",
            format.as_str()
        );
    }

    tracing::info!("Reading {} {} file(s)", files.len(), format.as_str());

    let mut tasks = JoinSet::new();
    for (i, path) in files.into_iter().enumerate() {
        tasks.spawn(async move { (i, read_export(path, format, basis).await) });
    }

    let mut per_file: Vec<(usize, Vec<RawMessage>)> = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (i, result) = joined.context("Ingestion task panicked")?;
        per_file.push((i, result?));
    }
    per_file.sort_by_key(|(i, _)| *i);

    let messages: Vec<RawMessage> = per_file.into_iter().flat_map(|(_, m)| m).collect();
    tracing::info!("Ingested {} messages", messages.len());
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PAGE: &str = r#"<h1>Trip</h1><h2>Participants: Ana, Ben</h2>
<section class="_a6-g"><h2>Ana</h2><div class="_2ph_ _a6-p"><div>see you</div></div>
<footer><div class="_a72d">2022-10-25 10:03:52</div></footer></section>"#;

    fn thread_json(name: &str, sender: &str) -> String {
        serde_json::json!({
            "threadName": name,
            "participants": ["Ana", "Ben"],
            "messages": [{"senderName": sender, "timestamp": 1666692232000i64, "text": "hi"}]
        })
        .to_string()
    }

    #[test]
    fn test_detect_format() {
        let html = vec![PathBuf::from("a/messages/x/message_1.html")];
        let json = vec![PathBuf::from("a/b.json")];
        assert_eq!(detect_format(&html).unwrap(), ExportFormat::Html);
        assert_eq!(detect_format(&json).unwrap(), ExportFormat::Json);

        let mixed = vec![html[0].clone(), json[0].clone()];
        assert!(detect_format(&mixed).is_err());
        assert!(detect_format(&[PathBuf::from("notes.txt")]).is_err());
    }

    #[test]
    fn test_html_path_rule() {
        let ok = Path::new("export/messages/inbox/ana_123/message_1.html");
        let stray = Path::new("export/index.html");
        assert!(is_export_file(ok, ExportFormat::Html));
        assert!(!is_export_file(stray, ExportFormat::Html));
        assert!(!is_export_file(ok, ExportFormat::Json));
    }

    #[tokio::test]
    async fn test_load_json_directory_in_file_order() {
        let dir = TempDir::new().unwrap();
        let inbox = dir.path().join("inbox");
        fs::create_dir_all(&inbox).unwrap();
        fs::write(inbox.join("a.json"), thread_json("First", "Ana")).unwrap();
        fs::write(inbox.join("b.json"), thread_json("Second", "Ben")).unwrap();
        fs::write(inbox.join("c.json"), "{broken").unwrap();
        fs::write(inbox.join("readme.md"), "ignored").unwrap();

        let messages = load_paths(&[dir.path().to_path_buf()], TimeBasis::Utc)
            .await
            .unwrap();
        let threads: Vec<_> = messages.iter().map(|m| m.thread.as_str()).collect();
        assert_eq!(threads, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn test_load_html_export() {
        let dir = TempDir::new().unwrap();
        let thread_dir = dir.path().join("messages").join("inbox").join("trip_1");
        fs::create_dir_all(&thread_dir).unwrap();
        fs::write(thread_dir.join("message_1.html"), PAGE).unwrap();
        // Outside messages/, so not part of the export
        fs::write(dir.path().join("index.html"), PAGE).unwrap();

        let messages = load_paths(&[dir.path().to_path_buf()], TimeBasis::Utc)
            .await
            .unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].thread, "Trip");
        assert_eq!(messages[0].nb_participants, 2);
        assert_eq!(messages[0].timestamp, 1_666_692_232.0);
    }

    #[tokio::test]
    async fn test_mixed_batch_is_refused() {
        let dir = TempDir::new().unwrap();
        let thread_dir = dir.path().join("messages");
        fs::create_dir_all(&thread_dir).unwrap();
        fs::write(thread_dir.join("message_1.html"), PAGE).unwrap();
        fs::write(dir.path().join("t.json"), thread_json("T", "Ana")).unwrap();

        let err = load_paths(&[dir.path().to_path_buf()], TimeBasis::Utc)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not both"));
    }

    #[tokio::test]
    async fn test_missing_path_fails_batch() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(load_paths(&[missing], TimeBasis::Utc).await.is_err());
    }

    #[tokio::test]
    async fn test_html_outside_messages_folder() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), PAGE).unwrap();
        let err = load_paths(&[dir.path().to_path_buf()], TimeBasis::Utc)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("messages/"));
    }
}
