//! Open Library search proxy.

use serde::Deserialize;

use crate::{clamp_limit, GatewayError, MetadataGateway, SearchHit, UNKNOWN_AUTHOR, UNTITLED};

const PROVIDER: &str = "openlibrary";
const DEFAULT_LIMIT: u32 = 12;

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub docs: Vec<Doc>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Doc {
    pub key: Option<String>,
    pub title: Option<String>,
    pub author_name: Option<Vec<String>>,
    pub cover_i: Option<i64>,
}

pub(crate) fn normalize(doc: Doc) -> SearchHit {
    SearchHit {
        key: doc.key.unwrap_or_default(),
        title: doc.title.unwrap_or_else(|| UNTITLED.to_owned()),
        author: match doc.author_name {
            Some(names) if !names.is_empty() => names.join(", "),
            _ => UNKNOWN_AUTHOR.to_owned(),
        },
        cover_url: doc
            .cover_i
            .map(|id| format!("https://covers.openlibrary.org/b/id/{id}-M.jpg"))
            .unwrap_or_default(),
    }
}

impl MetadataGateway {
    /// Search Open Library. An empty query short-circuits to an empty list.
    pub async fn search_open_library(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> Result<Vec<SearchHit>, GatewayError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let limit = clamp_limit(limit, DEFAULT_LIMIT);

        let url = format!("{}/search.json", self.open_library_base());
        let response = self
            .http()
            .get(&url)
            .query(&[
                ("q", query),
                ("limit", &limit.to_string()),
                ("fields", "key,title,author_name,cover_i"),
            ])
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

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|source| GatewayError::Transport { provider: PROVIDER, source })?;

        Ok(body.docs.into_iter().map(normalize).collect())
    }
}
