use adlens_core::types::{CreativeRecord, MediaItem};

/// Media URLs chosen for one creative.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedMedia {
    pub urls: Vec<String>,
    /// Usable URLs found before the cap was applied.
    pub found: usize,
}

/// Pick the media URLs for a matched creative, backed-up copies first.
///
/// Order of preference: backed-up carousel URLs, absolute carousel URLs from
/// the platform, then the single main image. The result is capped at `cap`.
pub fn resolve_media(creative: &CreativeRecord, cap: usize) -> ResolvedMedia {
    let mut urls: Vec<String> = creative
        .resolved_media_urls
        .iter()
        .filter_map(MediaItem::url)
        .map(String::from)
        .collect();

    if urls.is_empty() {
        urls = creative
            .media_refs
            .iter()
            .filter_map(MediaItem::url)
            .filter(|u| is_absolute_url(u))
            .map(String::from)
            .collect();
    }

    if urls.is_empty() {
        let main = creative
            .resolved_image_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .or_else(|| creative.fallback_image_url.as_deref().filter(|u| !u.is_empty()));
        if let Some(main) = main {
            urls.push(main.to_string());
        }
    }

    let found = urls.len();
    urls.truncate(cap);
    ResolvedMedia { urls, found }
}

pub fn is_absolute_url(candidate: &str) -> bool {
    url::Url::parse(candidate)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use adlens_core::types::MediaCard;

    fn card(url: &str) -> MediaItem {
        MediaItem::Card(MediaCard {
            image_url: Some(url.into()),
            description: None,
        })
    }

    #[test]
    fn test_backed_up_urls_win() {
        let creative = CreativeRecord {
            media_refs: vec![card("https://platform.example.com/1.jpg")],
            resolved_media_urls: vec![
                MediaItem::Url("https://storage.example.com/1.jpg".into()),
                card(""),
            ],
            ..Default::default()
        };
        let media = resolve_media(&creative, 7);
        assert_eq!(media.urls, vec!["https://storage.example.com/1.jpg"]);
    }

    #[test]
    fn test_relative_and_foreign_schemes_dropped() {
        let creative = CreativeRecord {
            media_refs: vec![
                card("/relative/path.jpg"),
                card("ftp://files.example.com/a.jpg"),
                MediaItem::Url("http://cdn.example.com/ok.jpg".into()),
            ],
            ..Default::default()
        };
        let media = resolve_media(&creative, 7);
        assert_eq!(media.urls, vec!["http://cdn.example.com/ok.jpg"]);
    }

    #[test]
    fn test_main_image_fallback() {
        let creative = CreativeRecord {
            fallback_image_url: Some("https://cdn.example.com/main.jpg".into()),
            ..Default::default()
        };
        assert_eq!(
            resolve_media(&creative, 7).urls,
            vec!["https://cdn.example.com/main.jpg"]
        );

        let backed_up = CreativeRecord {
            resolved_image_url: Some("https://storage.example.com/main.jpg".into()),
            ..creative
        };
        assert_eq!(
            resolve_media(&backed_up, 7).urls,
            vec!["https://storage.example.com/main.jpg"]
        );
    }

    #[test]
    fn test_cap_applied() {
        let creative = CreativeRecord {
            media_refs: (0..10)
                .map(|i| card(&format!("https://cdn.example.com/{i}.jpg")))
                .collect(),
            ..Default::default()
        };
        let media = resolve_media(&creative, 7);
        assert_eq!(media.urls.len(), 7);
        assert_eq!(media.found, 10);
        assert_eq!(media.urls[0], "https://cdn.example.com/0.jpg");
    }

    #[test]
    fn test_nothing_usable() {
        assert_eq!(resolve_media(&CreativeRecord::default(), 7), ResolvedMedia::default());
    }
}
