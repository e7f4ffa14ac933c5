pub mod app;
pub mod domain;
pub mod infra;

use anyhow::Result;

use crate::app::assemble::EmbedAssembler;
use crate::app::render::{DocumentRenderer, RenderOptions};
use crate::app::resolve::SourceResolver;
use crate::infra::config::Config;
use crate::infra::http::HttpFetcher;
use crate::infra::store::FsStore;

/// Assembler wired to the filesystem store and HTTP fetcher described by `config`.
pub fn assembler_from_config(config: &Config) -> Result<EmbedAssembler<FsStore, HttpFetcher>> {
    let store = FsStore::new(config.embed.root());
    let fetcher = HttpFetcher::from_config(&config.http)?;
    Ok(EmbedAssembler::new(SourceResolver::new(store, fetcher)))
}

/// Document renderer wired from `config`.
pub fn renderer_from_config(config: &Config) -> Result<DocumentRenderer<FsStore, HttpFetcher>> {
    DocumentRenderer::new(
        assembler_from_config(config)?,
        RenderOptions::from_config(config),
    )
}
