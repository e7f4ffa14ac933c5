//! Turning a [`SourceDescriptor`] into the full text of its source.

use crate::domain::errors::{SourceError, StoreError};
use crate::domain::model::SourceDescriptor;
use crate::infra::http::RemoteFetcher;
use crate::infra::store::LocalStore;

/// Dispatches local locations to a [`LocalStore`] and remote ones to a [`RemoteFetcher`].
#[derive(Debug, Clone)]
pub struct SourceResolver<S, F> {
    store: S,
    fetcher: F,
}

impl<S, F> SourceResolver<S, F>
where
    S: LocalStore,
    F: RemoteFetcher,
{
    pub fn new(store: S, fetcher: F) -> Self {
        Self { store, fetcher }
    }

    /// Read or fetch the complete content behind `descriptor`.
    pub async fn resolve(&self, descriptor: &SourceDescriptor) -> Result<String, SourceError> {
        match descriptor {
            SourceDescriptor::Local(path) => self.read_local(path).await,
            SourceDescriptor::Remote(url) => self.fetch_remote(url).await,
        }
    }

    async fn read_local(&self, path: &str) -> Result<String, SourceError> {
        tracing::debug!(%path, "resolving local source");
        self.store.read(path).await.map_err(|err| match err {
            StoreError::NotFound | StoreError::NotAFile => SourceError::NotFound {
                path: path.to_owned(),
            },
            StoreError::Io(source) => SourceError::Unreadable {
                path: path.to_owned(),
                source,
            },
        })
    }

    async fn fetch_remote(&self, url: &str) -> Result<String, SourceError> {
        let response = self
            .fetcher
            .get(url)
            .await
            .map_err(|source| SourceError::FetchFailed {
                url: url.to_owned(),
                source,
            })?;

        if !response.is_success() {
            return Err(SourceError::Status {
                url: url.to_owned(),
                status: response.status,
            });
        }
        Ok(response.text)
    }
}
