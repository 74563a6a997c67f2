//! Google Books volumes proxy.

use serde::Deserialize;

use crate::{clamp_limit, GatewayError, MetadataGateway, SearchHit, UNKNOWN_AUTHOR, UNTITLED};

const PROVIDER: &str = "google books";
const DEFAULT_MAX: u32 = 10;

#[derive(Debug, Deserialize)]
pub(crate) struct VolumesResponse {
    #[serde(default)]
    pub items: Vec<Volume>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Volume {
    pub id: Option<String>,
    #[serde(rename = "volumeInfo", default)]
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    #[serde(rename = "imageLinks")]
    pub image_links: Option<ImageLinks>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ImageLinks {
    pub thumbnail: Option<String>,
    #[serde(rename = "smallThumbnail")]
    pub small_thumbnail: Option<String>,
}

pub(crate) fn normalize(volume: Volume) -> SearchHit {
    let info = volume.volume_info;
    SearchHit {
        key: volume.id.unwrap_or_default(),
        title: info.title.unwrap_or_else(|| UNTITLED.to_owned()),
        author: match info.authors {
            Some(names) if !names.is_empty() => names.join(", "),
            _ => UNKNOWN_AUTHOR.to_owned(),
        },
        cover_url: info
            .image_links
            .and_then(|links| links.thumbnail.or(links.small_thumbnail))
            .unwrap_or_default(),
    }
}

impl MetadataGateway {
    /// Search Google Books volumes. An empty query short-circuits to an
    /// empty list.
    pub async fn search_google_books(
        &self,
        query: &str,
        max: Option<u32>,
    ) -> Result<Vec<SearchHit>, GatewayError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let max = clamp_limit(max, DEFAULT_MAX);

        let url = format!("{}/books/v1/volumes", self.google_books_base());
        let response = self
            .http()
            .get(&url)
            .query(&[("q", query), ("maxResults", &max.to_string())])
            .send()
            .await
            .map_err(|source| GatewayError::Transport { provider: PROVIDER, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::BadStatus {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        let body: VolumesResponse = response
            .json()
            .await
            .map_err(|source| GatewayError::Transport { provider: PROVIDER, source })?;

        Ok(body.items.into_iter().map(normalize).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_a_full_volume() {
        let volume: Volume = serde_json::from_value(serde_json::json!({
            "id": "abc123",
            "volumeInfo": {
                "title": "The Palace of Dreams",
                "authors": ["Ismail Kadare"],
                "imageLinks": {
                    "thumbnail": "http://books.google.com/thumb.jpg",
                    "smallThumbnail": "http://books.google.com/small.jpg"
                }
            }
        }))
        .unwrap();

        let hit = normalize(volume);
        assert_eq!(hit.key, "abc123");
        assert_eq!(hit.title, "The Palace of Dreams");
        assert_eq!(hit.author, "Ismail Kadare");
        assert_eq!(hit.cover_url, "http://books.google.com/thumb.jpg");
    }

    #[test]
    fn falls_back_to_small_thumbnail_then_empty() {
        let with_small = normalize(Volume {
            id: Some("x".into()),
            volume_info: VolumeInfo {
                image_links: Some(ImageLinks {
                    thumbnail: None,
                    small_thumbnail: Some("small.jpg".into()),
                }),
                ..VolumeInfo::default()
            },
        });
        assert_eq!(with_small.cover_url, "small.jpg");

        let bare = normalize(Volume::default());
        assert_eq!(bare.cover_url, "");
        assert_eq!(bare.title, "Untitled");
        assert_eq!(bare.author, "Unknown author");
    }

    #[test]
    fn items_field_may_be_absent_entirely() {
        let parsed: VolumesResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.items.is_empty());
    }

    #[tokio::test]
    async fn empty_query_is_an_empty_result_not_an_error() {
        let gateway = MetadataGateway::new();
        let hits = gateway.search_google_books("", None).await.unwrap();
        assert!(hits.is_empty());
    }
}
