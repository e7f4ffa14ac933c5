//! The embed pipeline: resolve, parse, extract, title.

use crate::app::extract::extract;
use crate::app::range;
use crate::app::resolve::SourceResolver;
use crate::domain::errors::EmbedError;
use crate::domain::model::{Embed, EmbedRequest, LineSet, SourceDescriptor};
use crate::infra::http::RemoteFetcher;
use crate::infra::store::LocalStore;

/// Runs embed requests against a [`SourceResolver`].
///
/// Requests share nothing but the resolver's collaborators, so one assembler can serve many
/// requests concurrently.
#[derive(Debug, Clone)]
pub struct EmbedAssembler<S, F> {
    resolver: SourceResolver<S, F>,
}

impl<S, F> EmbedAssembler<S, F>
where
    S: LocalStore,
    F: RemoteFetcher,
{
    pub fn new(resolver: SourceResolver<S, F>) -> Self {
        Self { resolver }
    }

    /// Produce the excerpt and title for a single request.
    ///
    /// The source is resolved before the range is parsed, so a request that is wrong on both
    /// counts reports the source failure.
    pub async fn assemble(&self, request: &EmbedRequest) -> Result<Embed, EmbedError> {
        let location = request
            .location
            .as_deref()
            .map(str::trim)
            .filter(|location| !location.is_empty())
            .ok_or(EmbedError::MissingSource)?;

        let descriptor = SourceDescriptor::classify(location);
        let content = self.resolver.resolve(&descriptor).await?;

        let lines = match request.lines.as_deref() {
            Some(spec) => range::parse(spec).map_err(|source| EmbedError::InvalidSpec {
                spec: spec.to_owned(),
                source,
            })?,
            None => LineSet::default(),
        };
        tracing::trace!(%location, lines = %lines, "extracting");

        let title = request
            .title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(location)
            .to_owned();

        Ok(Embed {
            text: extract(&content, &lines),
            title,
            language: request.language.clone(),
        })
    }
}
