use crate::domain::{AppModel, Item, ItemColor, PageKind};
use anyhow::Result;
use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Data file format revision this build reads and writes
pub const FORMAT_VERSION: u32 = 1;

/// Monotonic writer version recorded in the document metadata
pub const WRITER_VER_CODE: u32 = 1;

/// Top-level shape of maniana.json
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredDocument {
    pub format: u32,
    #[serde(default)]
    pub metadata: StoredMetadata,
    pub model: StoredModel,
}

/// Writer provenance, for diagnosing files from other versions
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoredMetadata {
    #[serde(default)]
    pub writer_ver_code: u32,
    #[serde(default)]
    pub writer_ver_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoredModel {
    #[serde(default)]
    pub last_push_date: String,
    #[serde(default)]
    pub today: Vec<StoredItem>,
    // Historical misspelling on the wire; kept so old data files stay readable
    #[serde(rename = "tomorow", default)]
    pub tomorrow: Vec<StoredItem>,
}

/// One item on the wire. Everything except the text is defaulted so
/// documents from older writers still parse.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredItem {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub text: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub color: ItemColor,
    /// Epoch milliseconds
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub updated: Option<i64>,
}

impl StoredItem {
    /// Capture an in-memory item. Items on the today page are never
    /// persisted as locked.
    pub fn from_item(item: &Item, page: PageKind) -> Self {
        Self {
            id: Some(item.id),
            text: item.text.clone(),
            done: item.is_completed,
            locked: item.is_locked && page == PageKind::Tomorrow,
            color: item.color,
            created: Some(item.created.timestamp_millis()),
            updated: Some(item.updated.timestamp_millis()),
        }
    }

    /// Rebuild the in-memory item, filling defaulted fields
    pub fn into_item(self, page: PageKind) -> Item {
        let created = millis_to_local(self.created);
        let updated = self
            .updated
            .and_then(|ms| Local.timestamp_millis_opt(ms).single())
            .unwrap_or(created);
        Item {
            id: self.id.unwrap_or_else(Uuid::new_v4),
            text: self.text,
            is_completed: self.done,
            is_locked: self.locked && page == PageKind::Tomorrow,
            color: self.color,
            created,
            updated,
        }
    }
}

fn millis_to_local(millis: Option<i64>) -> DateTime<Local> {
    millis
        .and_then(|ms| Local.timestamp_millis_opt(ms).single())
        .unwrap_or_else(Local::now)
}

/// Build the wire document for a model
pub fn document_for(model: &AppModel) -> StoredDocument {
    let page_items = |kind: PageKind| {
        model
            .page(kind)
            .items()
            .iter()
            .map(|item| StoredItem::from_item(item, kind))
            .collect()
    };

    StoredDocument {
        format: FORMAT_VERSION,
        metadata: StoredMetadata {
            writer_ver_code: WRITER_VER_CODE,
            writer_ver_name: env!("CARGO_PKG_VERSION").to_string(),
        },
        model: StoredModel {
            last_push_date: model.last_push_date().to_string(),
            today: page_items(PageKind::Today),
            tomorrow: page_items(PageKind::Tomorrow),
        },
    }
}

/// Serialize a model to the JSON document text
pub fn serialize_model(model: &AppModel) -> Result<String> {
    let document = document_for(model);
    let json = serde_json::to_string_pretty(&document)?;
    Ok(json)
}

/// Write the model to its data file atomically
pub fn save_model<P: AsRef<Path>>(path: P, model: &AppModel) -> Result<()> {
    let json = serialize_model(model)?;
    super::files::atomic_write(path, &json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model() -> AppModel {
        let mut locked = Item::new("locked tomorrow".to_string());
        locked.is_locked = true;
        let mut done = Item::new("finished".to_string());
        done.is_completed = true;
        done.color = ItemColor::Green;

        AppModel::from_parts(
            vec![done],
            vec![locked, Item::new("plain".to_string())],
            "20260805".to_string(),
        )
    }

    #[test]
    fn test_document_shape() {
        let doc = document_for(&sample_model());
        assert_eq!(doc.format, FORMAT_VERSION);
        assert_eq!(doc.metadata.writer_ver_code, WRITER_VER_CODE);
        assert_eq!(doc.model.last_push_date, "20260805");
        assert_eq!(doc.model.today.len(), 1);
        assert_eq!(doc.model.tomorrow.len(), 2);
    }

    #[test]
    fn test_tomorrow_wire_key_spelling() {
        let json = serialize_model(&sample_model()).unwrap();
        assert!(json.contains("\"tomorow\""));
        assert!(!json.contains("\"tomorrow\""));
    }

    #[test]
    fn test_today_items_never_serialized_locked() {
        let mut item = Item::new("locked on today".to_string());
        item.is_locked = true;
        let model = AppModel::from_parts(vec![item], Vec::new(), String::new());

        let doc = document_for(&model);
        assert!(!doc.model.today[0].locked);
    }

    #[test]
    fn test_stored_item_round_trip() {
        let mut item = Item::new("round trip".to_string());
        item.is_completed = true;
        item.color = ItemColor::Red;

        let stored = StoredItem::from_item(&item, PageKind::Tomorrow);
        let back = stored.into_item(PageKind::Tomorrow);

        assert_eq!(back.id, item.id);
        assert_eq!(back.text, item.text);
        assert_eq!(back.is_completed, item.is_completed);
        assert_eq!(back.color, item.color);
        assert_eq!(
            back.created.timestamp_millis(),
            item.created.timestamp_millis()
        );
    }

    #[test]
    fn test_defaulted_fields_fill_in() {
        let stored = StoredItem {
            id: None,
            text: "bare".to_string(),
            done: false,
            locked: true,
            color: ItemColor::None,
            created: None,
            updated: None,
        };

        // Locked is dropped for items parsed onto the today page
        let item = stored.into_item(PageKind::Today);
        assert!(!item.is_locked);
        assert_eq!(item.created, item.updated);
    }

    #[test]
    fn test_save_model_writes_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("maniana.json");

        save_model(&path, &sample_model()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"format\": 1"));
        assert!(content.contains("locked tomorrow"));
    }

    #[test]
    fn test_empty_model_serializes() {
        let model = AppModel::new();
        let json = serialize_model(&model).unwrap();
        assert!(json.contains("\"today\": []"));
    }
}
