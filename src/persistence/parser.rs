use super::serializer::{StoredDocument, FORMAT_VERSION};
use crate::domain::{AppModel, PageKind};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why the data file could not be turned into a model.
///
/// There are deliberately no retry semantics: a missing file means a new
/// user, everything else means the caller starts over with an empty model
/// and tells the user.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("data file is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("data file uses format {found}, this build reads up to {supported}")]
    UnsupportedFormat { found: u32, supported: u32 },
    #[error("restore source {path} does not exist")]
    MissingRestoreSource { path: PathBuf },
}

/// Parse a JSON document into a model. Empty content parses as a fresh
/// model; locked today-page items are normalized to unlocked.
pub fn parse_document(content: &str) -> Result<AppModel, PersistenceError> {
    if content.trim().is_empty() {
        return Ok(AppModel::new());
    }

    let document: StoredDocument = serde_json::from_str(content)?;
    if document.format == 0 || document.format > FORMAT_VERSION {
        return Err(PersistenceError::UnsupportedFormat {
            found: document.format,
            supported: FORMAT_VERSION,
        });
    }

    let today = document
        .model
        .today
        .into_iter()
        .map(|stored| stored.into_item(PageKind::Today))
        .collect();
    let tomorrow = document
        .model
        .tomorrow
        .into_iter()
        .map(|stored| stored.into_item(PageKind::Tomorrow))
        .collect();

    Ok(AppModel::from_parts(
        today,
        tomorrow,
        document.model.last_push_date,
    ))
}

/// Load the model from the data file. A missing file is a new user and
/// yields an empty model.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<AppModel, PersistenceError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(AppModel::new());
    }

    let content = std::fs::read_to_string(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&content)
}

/// Load a document to merge from. Unlike `load_model`, a missing source
/// is an error: restoring from a path that isn't there is a user mistake,
/// not a fresh start.
pub fn load_restore_source<P: AsRef<Path>>(path: P) -> Result<AppModel, PersistenceError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(PersistenceError::MissingRestoreSource {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Item, ItemColor};
    use crate::persistence::serializer::serialize_model;

    #[test]
    fn test_round_trip_through_text() {
        let mut locked = Item::new("locked".to_string());
        locked.is_locked = true;
        locked.color = ItemColor::Blue;
        let model = AppModel::from_parts(
            vec![Item::new("today item".to_string())],
            vec![locked],
            "20260805".to_string(),
        );

        let json = serialize_model(&model).unwrap();
        let parsed = parse_document(&json).unwrap();

        assert_eq!(parsed.last_push_date(), "20260805");
        assert_eq!(parsed.page(PageKind::Today).len(), 1);
        assert_eq!(parsed.page(PageKind::Tomorrow).len(), 1);

        let item = &parsed.page(PageKind::Tomorrow).items()[0];
        assert!(item.is_locked);
        assert_eq!(item.color, ItemColor::Blue);
        assert!(!parsed.is_dirty());
    }

    #[test]
    fn test_empty_content_is_fresh_model() {
        let model = parse_document("").unwrap();
        assert_eq!(model.item_count(), 0);
        assert_eq!(model.last_push_date(), "");
    }

    #[test]
    fn test_minimal_document_from_older_writer() {
        // No metadata, no ids, no timestamps, no colors
        let json = r#"{
            "format": 1,
            "model": {
                "last_push_date": "20120315",
                "today": [ { "text": "old item", "done": true } ],
                "tomorow": [ { "text": "held back", "locked": true } ]
            }
        }"#;

        let model = parse_document(json).unwrap();
        let today = &model.page(PageKind::Today).items()[0];
        assert!(today.is_completed);
        assert_eq!(today.color, ItemColor::None);

        let tomorrow = &model.page(PageKind::Tomorrow).items()[0];
        assert!(tomorrow.is_locked);
    }

    #[test]
    fn test_locked_today_items_normalized() {
        let json = r#"{
            "format": 1,
            "model": {
                "today": [ { "text": "stray lock", "locked": true } ],
                "tomorow": []
            }
        }"#;

        let model = parse_document(json).unwrap();
        assert!(!model.page(PageKind::Today).items()[0].is_locked);
    }

    #[test]
    fn test_garbage_is_corrupt() {
        let err = parse_document("{ not json").unwrap_err();
        assert!(matches!(err, PersistenceError::Corrupt(_)));
    }

    #[test]
    fn test_future_format_rejected() {
        let json = r#"{ "format": 99, "model": { "today": [], "tomorow": [] } }"#;
        let err = parse_document(json).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::UnsupportedFormat { found: 99, .. }
        ));
    }

    #[test]
    fn test_missing_format_rejected() {
        let json = r#"{ "model": { "today": [], "tomorow": [] } }"#;
        let err = parse_document(json).unwrap_err();
        assert!(matches!(err, PersistenceError::Corrupt(_)));
    }

    #[test]
    fn test_load_model_missing_file_is_new_user() {
        let temp_dir = tempfile::tempdir().unwrap();
        let model = load_model(temp_dir.path().join("absent.json")).unwrap();
        assert_eq!(model.item_count(), 0);
    }

    #[test]
    fn test_load_restore_source_missing_is_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = load_restore_source(temp_dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(
            err,
            PersistenceError::MissingRestoreSource { .. }
        ));
    }
}
