use std::collections::HashMap;

use adlens_core::types::CreativeRecord;
use tracing::{debug, warn};

/// Lookup tables over the creative pool, built once per run.
#[derive(Debug)]
pub struct CreativeIndex<'a> {
    records: Vec<&'a CreativeRecord>,
    by_id: HashMap<&'a str, &'a CreativeRecord>,
    by_id_prefix: HashMap<String, &'a CreativeRecord>,
    by_name_prefix: Vec<(String, &'a CreativeRecord)>,
    id_prefix_len: usize,
    name_prefix_chars: usize,
}

impl<'a> CreativeIndex<'a> {
    pub fn build(pool: &'a [CreativeRecord], id_prefix_len: usize, name_prefix_chars: usize) -> Self {
        let mut records = Vec::with_capacity(pool.len());
        let mut by_id = HashMap::with_capacity(pool.len());
        let mut by_id_prefix: HashMap<String, &'a CreativeRecord> = HashMap::new();
        let mut by_name_prefix: Vec<(String, &'a CreativeRecord)> = Vec::new();
        let mut name_slots: HashMap<String, usize> = HashMap::new();
        let mut dropped = 0usize;

        for creative in pool {
            if creative.creative_id.is_empty() {
                dropped += 1;
                continue;
            }
            records.push(creative);
            by_id.insert(creative.creative_id.as_str(), creative);

            let prefix = id_prefix(&creative.creative_id, id_prefix_len);
            match by_id_prefix.get(&prefix) {
                Some(kept) if !is_richer(creative, kept) => {}
                _ => {
                    by_id_prefix.insert(prefix, creative);
                }
            }

            if !creative.creative_name.is_empty() {
                let key = name_prefix(&creative.creative_name, name_prefix_chars);
                match name_slots.get(&key) {
                    Some(&slot) => by_name_prefix[slot].1 = creative,
                    None => {
                        name_slots.insert(key.clone(), by_name_prefix.len());
                        by_name_prefix.push((key, creative));
                    }
                }
            }
        }

        if dropped > 0 {
            warn!(dropped, "creatives without an ad id cannot be matched, skipped");
        }
        debug!(
            creatives = records.len(),
            id_prefixes = by_id_prefix.len(),
            name_prefixes = by_name_prefix.len(),
            "creative index built"
        );

        Self {
            records,
            by_id,
            by_id_prefix,
            by_name_prefix,
            id_prefix_len,
            name_prefix_chars,
        }
    }

    pub fn get(&self, creative_id: &str) -> Option<&'a CreativeRecord> {
        self.by_id.get(creative_id).copied()
    }

    pub fn get_by_id_prefix(&self, id: &str) -> Option<&'a CreativeRecord> {
        self.by_id_prefix.get(&id_prefix(id, self.id_prefix_len)).copied()
    }

    /// Name-prefix entries in the order their keys were first seen.
    pub fn name_prefixes(&self) -> impl Iterator<Item = (&str, &'a CreativeRecord)> + '_ {
        self.by_name_prefix.iter().map(|(k, c)| (k.as_str(), *c))
    }

    /// Every indexed creative in pool order.
    pub fn records(&self) -> impl Iterator<Item = &'a CreativeRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn name_prefix_of(&self, name: &str) -> String {
        name_prefix(name, self.name_prefix_chars)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// First `len` characters of an id, or the whole id when shorter.
pub fn id_prefix(id: &str, len: usize) -> String {
    id.chars().take(len).collect()
}

/// `a_b_rest` becomes `a_b`; names without underscores are cut to `chars`.
pub fn name_prefix(name: &str, chars: usize) -> String {
    if name.contains('_') {
        name.split('_').take(2).collect::<Vec<_>>().join("_")
    } else {
        name.chars().take(chars).collect()
    }
}

fn is_richer(candidate: &CreativeRecord, kept: &CreativeRecord) -> bool {
    if candidate.has_body() && !kept.has_body() {
        return true;
    }
    candidate.has_media() && !kept.has_media()
}

#[cfg(test)]
mod tests {
    use super::*;
    use adlens_core::types::MediaItem;

    fn creative(id: &str, name: &str) -> CreativeRecord {
        CreativeRecord {
            creative_id: id.into(),
            creative_name: name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_name_prefix() {
        assert_eq!(name_prefix("LM_spring_carousel_v2", 20), "LM_spring");
        assert_eq!(name_prefix("trailing_", 20), "trailing_");
        assert_eq!(name_prefix("a very long ad name without underscores", 20), "a very long ad name ");
        assert_eq!(name_prefix("芳香磚組合", 3), "芳香磚");
    }

    #[test]
    fn test_id_prefix_short_id() {
        assert_eq!(id_prefix("12345", 12), "12345");
        assert_eq!(id_prefix("1234567890123456", 12), "123456789012");
    }

    #[test]
    fn test_prefix_collision_prefers_richer() {
        let bare = creative("123456789012_a", "bare");
        let mut with_body = creative("123456789012_b", "body");
        with_body.body_text = Some("copy".into());
        let mut second_body = creative("123456789012_c", "body again");
        second_body.body_text = Some("other copy".into());

        let pool = vec![bare.clone(), with_body.clone(), second_body];
        let index = CreativeIndex::build(&pool, 12, 20);
        let kept = index.get_by_id_prefix("123456789012_zzz").unwrap();
        assert_eq!(kept.creative_id, "123456789012_b");

        let mut with_media = creative("123456789012_d", "media");
        with_media.media_refs = vec![MediaItem::Url("https://cdn.example.com/x.jpg".into())];
        let pool = vec![bare, with_body, with_media];
        let index = CreativeIndex::build(&pool, 12, 20);
        let kept = index.get_by_id_prefix("123456789012").unwrap();
        assert_eq!(kept.creative_id, "123456789012_d");
    }

    #[test]
    fn test_prefix_collision_keeps_first_when_equal() {
        let pool = vec![creative("999999999999_a", "x"), creative("999999999999_b", "y")];
        let index = CreativeIndex::build(&pool, 12, 20);
        assert_eq!(
            index.get_by_id_prefix("999999999999").unwrap().creative_id,
            "999999999999_a"
        );
    }

    #[test]
    fn test_name_index_keeps_first_position_latest_record() {
        let pool = vec![
            creative("1", "LM_spring_a"),
            creative("2", "Other"),
            creative("3", "LM_spring_b"),
        ];
        let index = CreativeIndex::build(&pool, 12, 20);
        let entries: Vec<_> = index
            .name_prefixes()
            .map(|(k, c)| (k.to_string(), c.creative_id.clone()))
            .collect();
        assert_eq!(
            entries,
            vec![
                ("LM_spring".to_string(), "3".to_string()),
                ("Other".to_string(), "2".to_string())
            ]
        );
    }

    #[test]
    fn test_creatives_without_id_are_skipped() {
        let pool = vec![creative("", "orphan"), creative("1", "kept")];
        let index = CreativeIndex::build(&pool, 12, 20);
        assert_eq!(index.len(), 1);
        assert!(index.get("").is_none());
    }
}
