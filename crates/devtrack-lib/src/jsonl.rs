//! JSONL file I/O for the document store.
//!
//! Each line is one record tagged with its collection:
//! `{"kind":"project",...}` or `{"kind":"issue",...}`.

use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DevTrackError, Result};
use crate::model::{Issue, Project};

#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Record {
    Project(Project),
    Issue(Issue),
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum RecordRef<'a> {
    Project(&'a Project),
    Issue(&'a Issue),
}

/// Records loaded from a JSONL file, in file order.
#[derive(Debug, Default)]
pub struct LoadedData {
    pub projects: Vec<Project>,
    pub issues: Vec<Issue>,
}

/// Load records from a JSONL file.
///
/// # Errors
///
/// Returns `FileNotFound` if the file is missing, `Io` if it cannot be
/// read, or `JsonlParse` if any line is invalid.
pub fn load(path: &Path) -> Result<LoadedData> {
    let file = fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            DevTrackError::FileNotFound(path.to_path_buf())
        } else {
            DevTrackError::Io(e)
        }
    })?;
    let reader = BufReader::new(file);

    let mut loaded = LoadedData::default();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let record: Record =
            serde_json::from_str(trimmed).map_err(|e| DevTrackError::JsonlParse {
                line: line_num + 1,
                reason: e.to_string(),
            })?;
        match record {
            Record::Project(project) => loaded.projects.push(project),
            Record::Issue(issue) => loaded.issues.push(issue),
        }
    }

    Ok(loaded)
}

/// Save all records with an atomic write.
///
/// Projects are written before issues. Uses write-to-temp + rename.
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns `Io` if the file cannot be written.
pub fn save(path: &Path, projects: &[Project], issues: &[Issue]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("jsonl.tmp");
    let mut writer = BufWriter::new(fs::File::create(&tmp_path)?);

    for project in projects {
        serde_json::to_writer(&mut writer, &RecordRef::Project(project))?;
        writer.write_all(b"\n")?;
    }
    for issue in issues {
        serde_json::to_writer(&mut writer, &RecordRef::Issue(issue))?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    drop(writer);

    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IssueId, Priority, ProjectId, Status, UserId};
    use chrono::Utc;

    fn sample() -> (Project, Issue) {
        let now = Utc::now();
        let project = Project {
            id: ProjectId::new("prj-abcd"),
            name: "Tracker".into(),
            key: "TRK".into(),
            description: Some("Main board".into()),
            owner: UserId::new("olga"),
            members: [UserId::new("mike")].into_iter().collect(),
            created_at: now,
            updated_at: now,
            version: 3,
        };
        let issue = Issue {
            id: IssueId::new("trk-1a2b"),
            title: "Login fails".into(),
            description: None,
            status: Status::InProgress,
            priority: Priority::High,
            project: project.id.clone(),
            reporter: UserId::new("olga"),
            assignees: vec![UserId::new("mike")],
            created_at: now,
            updated_at: now,
            version: 1,
        };
        (project, issue)
    }

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.jsonl");
        let (project, issue) = sample();

        save(&path, std::slice::from_ref(&project), std::slice::from_ref(&issue)).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.projects, vec![project]);
        assert_eq!(loaded.issues, vec![issue]);
        assert!(!path.with_extension("jsonl.tmp").exists());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("nested").join("dt.jsonl");
        let (project, issue) = sample();

        save(&path, &[project], &[issue]).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.projects.len(), 1);
        assert_eq!(loaded.issues.len(), 1);
    }

    #[test]
    fn test_lines_are_tagged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.jsonl");
        let (project, issue) = sample();
        save(&path, &[project], &[issue]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(r#"{"kind":"project""#));
        assert!(lines[1].starts_with(r#"{"kind":"issue""#));
        assert!(lines[1].contains(r#""status":"in_progress""#));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load(Path::new("/nonexistent/store.jsonl"));
        assert!(matches!(result, Err(DevTrackError::FileNotFound(_))));
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blanks.jsonl");
        let (project, _) = sample();
        let json = serde_json::to_string(&RecordRef::Project(&project)).unwrap();
        fs::write(&path, format!("\n{json}\n\n")).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.projects.len(), 1);
        assert!(loaded.issues.is_empty());
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.jsonl");
        fs::write(&path, "\n{\"kind\":\"widget\"}\n").unwrap();

        let result = load(&path);
        assert!(matches!(result, Err(DevTrackError::JsonlParse { line: 2, .. })));
    }
}
