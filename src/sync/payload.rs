//! Wire representation of a vocabulary entry
//!
//! The backend stores list-valued fields as strings: example sentences as a
//! JSON-encoded array, synonyms/antonyms/tags comma-joined. That shape stays
//! confined to this adapter; the core model uses real vectors. Absent fields
//! are omitted on write and left untouched on merge (sparse merge).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::vocabulary::{normalize_word, MasteryLevel, SyncStatus, VocabularyEntry};

/// One entry as it travels over the REST protocol
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WirePayload {
    /// Remote primary key; present on fetched rows and create responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Local id, sent for traceability only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_id: Option<String>,
    pub word: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mastery_level: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ease_factor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition_cn: Option<String>,
    /// JSON-encoded array of example sentences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_sentences: Option<String>,
    /// Comma-joined
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<String>,
    /// Comma-joined
    #[serde(skip_serializing_if = "Option::is_none")]
    pub antonyms: Option<String>,
    /// Comma-joined
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Join a list field for the wire; empty lists are omitted entirely
fn join_list(items: &[String]) -> Option<String> {
    if items.is_empty() {
        None
    } else {
        Some(items.join(","))
    }
}

/// Split a comma-joined wire field back into a list
fn split_list(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Decode a JSON-encoded example array; a malformed blob degrades to a
/// single-item list rather than losing the text
fn decode_examples(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(examples) => examples,
        Err(_) => {
            log::warn!("Sync: example_sentences is not a JSON array, keeping verbatim");
            vec![raw.to_string()]
        }
    }
}

impl WirePayload {
    /// Serialize a local entry for push
    pub fn from_entry(entry: &VocabularyEntry) -> Self {
        Self {
            id: None,
            local_id: Some(entry.id.to_string()),
            word: entry.word.clone(),
            mastery_level: Some(entry.mastery_level.as_index()),
            ease_factor: Some(entry.ease_factor as f64),
            interval: Some(entry.interval as i64),
            review_count: Some(entry.review_count as i64),
            correct_count: Some(entry.correct_count as i64),
            is_favorite: Some(entry.is_favorite),
            is_archived: Some(entry.is_archived),
            phonetic: entry.phonetic.clone(),
            part_of_speech: entry.part_of_speech.clone(),
            definition_en: entry.definition_en.clone(),
            definition_cn: entry.definition_cn.clone(),
            example_sentences: if entry.examples.is_empty() {
                None
            } else {
                serde_json::to_string(&entry.examples).ok()
            },
            synonyms: join_list(&entry.synonyms),
            antonyms: join_list(&entry.antonyms),
            tags: join_list(&entry.tags),
            category: entry.category.clone(),
            user_context: entry.user_context.clone(),
            last_reviewed_at: entry.last_reviewed_at,
            next_review_at: entry.next_review_at,
            updated_at: Some(entry.updated_at),
        }
    }

    /// Overwrite only the fields present in this payload (sparse merge).
    ///
    /// Sync bookkeeping (`backend_id`, `sync_status`, `updated_at`) is the
    /// engine's responsibility, not the merge's.
    pub fn merge_into(&self, entry: &mut VocabularyEntry) {
        if let Some(level) = self.mastery_level {
            entry.mastery_level = MasteryLevel::from_index(level);
        }
        if let Some(ef) = self.ease_factor {
            entry.ease_factor = ef as f32;
        }
        if let Some(interval) = self.interval {
            entry.interval = interval as i32;
        }
        if let Some(count) = self.review_count {
            entry.review_count = count as i32;
        }
        if let Some(count) = self.correct_count {
            entry.correct_count = count as i32;
        }
        if let Some(fav) = self.is_favorite {
            entry.is_favorite = fav;
        }
        if let Some(archived) = self.is_archived {
            entry.is_archived = archived;
        }
        if let Some(ref phonetic) = self.phonetic {
            entry.phonetic = Some(phonetic.clone());
        }
        if let Some(ref pos) = self.part_of_speech {
            entry.part_of_speech = Some(pos.clone());
        }
        if let Some(ref def) = self.definition_en {
            entry.definition_en = Some(def.clone());
        }
        if let Some(ref def) = self.definition_cn {
            entry.definition_cn = Some(def.clone());
        }
        if let Some(ref raw) = self.example_sentences {
            entry.examples = decode_examples(raw);
        }
        if let Some(ref joined) = self.synonyms {
            entry.synonyms = split_list(joined);
        }
        if let Some(ref joined) = self.antonyms {
            entry.antonyms = split_list(joined);
        }
        if let Some(ref joined) = self.tags {
            entry.tags = split_list(joined);
        }
        if let Some(ref category) = self.category {
            entry.category = Some(category.clone());
        }
        if let Some(ref context) = self.user_context {
            entry.user_context = Some(context.clone());
        }
        if let Some(at) = self.last_reviewed_at {
            entry.last_reviewed_at = Some(at);
        }
        if let Some(at) = self.next_review_at {
            entry.next_review_at = Some(at);
        }
    }

    /// Construct a fresh local entry from a remote row never seen before
    pub fn into_new_entry(&self) -> VocabularyEntry {
        let mut entry = VocabularyEntry::new(&normalize_word(&self.word));
        self.merge_into(&mut entry);
        entry.backend_id = self.id.clone();
        entry.sync_status = SyncStatus::Synced;
        if let Some(at) = self.updated_at {
            entry.updated_at = at;
        }
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_fields_round_trip() {
        let mut entry = VocabularyEntry::new("gregarious");
        entry.synonyms = vec!["sociable".into(), "outgoing".into()];
        entry.tags = vec!["adjective".into()];
        entry.examples = vec!["A gregarious host.".into(), "Quite gregarious, really.".into()];

        let payload = WirePayload::from_entry(&entry);
        assert_eq!(payload.synonyms.as_deref(), Some("sociable,outgoing"));
        assert_eq!(payload.tags.as_deref(), Some("adjective"));
        assert!(payload.antonyms.is_none());
        assert_eq!(
            payload.example_sentences.as_deref(),
            Some(r#"["A gregarious host.","Quite gregarious, really."]"#)
        );

        let rebuilt = payload.into_new_entry();
        assert_eq!(rebuilt.synonyms, entry.synonyms);
        assert_eq!(rebuilt.tags, entry.tags);
        assert_eq!(rebuilt.examples, entry.examples);
        assert!(rebuilt.antonyms.is_empty());
    }

    #[test]
    fn test_split_list_trims_and_drops_empties() {
        assert_eq!(split_list("a, b ,,c"), vec!["a", "b", "c"]);
        assert!(split_list("  ").is_empty());
    }

    #[test]
    fn test_malformed_examples_kept_verbatim() {
        assert_eq!(decode_examples("not json"), vec!["not json"]);
    }

    #[test]
    fn test_sparse_merge_leaves_absent_fields_untouched() {
        let mut entry = VocabularyEntry::new("halcyon");
        entry.phonetic = Some("/ˈhælsiən/".into());
        entry.definition_en = Some("calm, peaceful".into());

        let payload = WirePayload {
            word: "halcyon".into(),
            definition_cn: Some("宁静的".into()),
            ..Default::default()
        };
        payload.merge_into(&mut entry);

        // present field applied, absent fields untouched
        assert_eq!(entry.definition_cn.as_deref(), Some("宁静的"));
        assert_eq!(entry.phonetic.as_deref(), Some("/ˈhælsiən/"));
        assert_eq!(entry.definition_en.as_deref(), Some("calm, peaceful"));
    }

    #[test]
    fn test_wire_field_names_are_snake_case() {
        let mut entry = VocabularyEntry::new("word");
        entry.part_of_speech = Some("noun".into());
        entry.user_context = Some("from a podcast".into());
        let json = serde_json::to_value(WirePayload::from_entry(&entry)).unwrap();

        assert!(json.get("part_of_speech").is_some());
        assert!(json.get("user_context").is_some());
        assert!(json.get("mastery_level").is_some());
        assert!(json.get("ease_factor").is_some());
        assert!(json.get("local_id").is_some());
        // never serialized when absent
        assert!(json.get("phonetic").is_none());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_into_new_entry_takes_remote_identity() {
        let payload = WirePayload {
            id: Some("remote-42".into()),
            word: " Sonder ".into(),
            interval: Some(3),
            mastery_level: Some(1),
            updated_at: Some(Utc::now()),
            ..Default::default()
        };
        let entry = payload.into_new_entry();
        assert_eq!(entry.word, "sonder");
        assert_eq!(entry.backend_id.as_deref(), Some("remote-42"));
        assert_eq!(entry.sync_status, SyncStatus::Synced);
        assert_eq!(entry.interval, 3);
        assert_eq!(entry.mastery_level, MasteryLevel::Learning);
    }
}
