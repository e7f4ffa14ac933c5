//! Rendering markdown documents with `embed-<lang>` fences expanded.

use std::collections::HashSet;
use std::fs;
use std::ops::Range;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use futures::future::join_all;
use minijinja::Environment;
use once_cell::sync::Lazy;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use serde::Serialize;

use crate::app::assemble::EmbedAssembler;
use crate::app::meta;
use crate::domain::model::Embed;
use crate::infra::config::{Config, Title};
use crate::infra::http::RemoteFetcher;
use crate::infra::store::LocalStore;

/// Info-string prefix marking a fence as an embed request.
pub const EMBED_PREFIX: &str = "embed-";

static TITLE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)TITLE:\s*"([^"]*)""#).expect("valid title regex"));

/// Runtime options controlling how embeds are rendered.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub languages: HashSet<String>,
    pub template: String,
    pub title: Title,
}

impl RenderOptions {
    /// Build options from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            languages: config.embed.languages().into_iter().collect(),
            template: config.embed.template(),
            title: config.title.clone(),
        }
    }
}

/// A fenced code block located in the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fence {
    span: Range<usize>,
    info: String,
    body: String,
}

/// What to do with one fence.
#[derive(Debug)]
enum Action<'a> {
    Embed { fence: &'a Fence, language: String },
    Caption { fence: &'a Fence, title: String },
}

/// Expands embed fences in markdown using an [`EmbedAssembler`].
pub struct DocumentRenderer<S, F> {
    assembler: EmbedAssembler<S, F>,
    options: RenderOptions,
    env: Environment<'static>,
}

impl<S, F> DocumentRenderer<S, F>
where
    S: LocalStore,
    F: RemoteFetcher,
{
    /// Create a renderer, loading the configured template up front.
    pub fn new(assembler: EmbedAssembler<S, F>, options: RenderOptions) -> Result<Self> {
        let env = template_environment(&options.template)?;
        Ok(Self {
            assembler,
            options,
            env,
        })
    }

    /// Render `markdown`, replacing every embed fence with its excerpt or a diagnostic.
    ///
    /// Embeds are resolved concurrently and spliced back in document order. Failures of
    /// individual embeds become inline `ERROR:` messages; only template failures abort.
    pub async fn render(&self, markdown: &str) -> Result<String> {
        let fences = scan_fences(markdown);
        let actions: Vec<Action<'_>> = fences
            .iter()
            .filter_map(|fence| self.classify(fence))
            .collect();
        tracing::debug!(fences = fences.len(), actions = actions.len(), "scanned document");

        let rendered = join_all(actions.iter().map(|action| self.render_action(action))).await;

        let mut output = String::with_capacity(markdown.len());
        let mut cursor = 0;
        for (action, replacement) in actions.iter().zip(rendered) {
            let replacement = replacement?;
            match action {
                Action::Embed { fence, .. } => {
                    let prefix = continuation_prefix(markdown, fence.span.start);
                    output.push_str(&markdown[cursor..fence.span.start]);
                    output.push_str(&nest(replacement.trim_end_matches('\n'), &prefix));
                    if markdown[fence.span.clone()].ends_with('\n') {
                        output.push('\n');
                    }
                    cursor = fence.span.end;
                }
                Action::Caption { fence, .. } => {
                    let prefix = continuation_prefix(markdown, fence.span.start);
                    output.push_str(&markdown[cursor..fence.span.start]);
                    output.push_str(&nest(replacement.trim_end_matches('\n'), &prefix));
                    output.push('\n');
                    output.push_str(&prefix);
                    cursor = fence.span.start;
                }
            }
        }
        output.push_str(&markdown[cursor..]);
        Ok(output)
    }

    pub fn assembler(&self) -> &EmbedAssembler<S, F> {
        &self.assembler
    }

    /// Render a single assembled embed as a captioned code block.
    pub fn render_embed(&self, embed: &Embed) -> Result<String> {
        self.render_template(&BlockContext::block(embed, &self.options.title))
    }

    fn classify<'a>(&self, fence: &'a Fence) -> Option<Action<'a>> {
        let tag = fence.info.split_whitespace().next().unwrap_or_default();
        if let Some(language) = tag.strip_prefix(EMBED_PREFIX) {
            if self.options.languages.contains(language) {
                return Some(Action::Embed {
                    fence,
                    language: language.to_owned(),
                });
            }
            return None;
        }

        let title = TITLE_MARKER.captures(&fence.info)?.get(1)?.as_str();
        (!title.is_empty()).then(|| Action::Caption {
            fence,
            title: title.to_owned(),
        })
    }

    async fn render_action(&self, action: &Action<'_>) -> Result<String> {
        match action {
            Action::Embed { fence, language } => {
                let request = match meta::parse_request(&fence.body, language) {
                    Ok(request) => request,
                    Err(err) => return Ok(diagnostic(&err.to_string())),
                };
                match self.assembler.assemble(&request).await {
                    Ok(embed) => self.render_embed(&embed),
                    Err(err) => {
                        tracing::debug!(error = %err, "embed failed");
                        Ok(diagnostic(&err.to_string()))
                    }
                }
            }
            Action::Caption { title, .. } => {
                self.render_template(&BlockContext::caption(title, &self.options.title))
            }
        }
    }

    fn render_template(&self, context: &BlockContext) -> Result<String> {
        self.env
            .get_template(TEMPLATE_NAME)
            .map_err(|err| anyhow!("embed template unavailable: {err}"))?
            .render(context)
            .map_err(|err| anyhow!("failed to render embed template: {err}"))
    }
}

/// Locate every fenced code block along with its byte span in `markdown`.
fn scan_fences(markdown: &str) -> Vec<Fence> {
    let mut fences = Vec::new();
    let mut current: Option<Fence> = None;

    for (event, span) in Parser::new_ext(markdown, Options::empty()).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                current = Some(Fence {
                    span,
                    info: info.to_string(),
                    body: String::new(),
                });
            }
            Event::Text(text) => {
                if let Some(fence) = current.as_mut() {
                    fence.body.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(mut fence) = current.take() {
                    fence.span.end = fence.span.end.max(span.end);
                    fences.push(fence);
                }
            }
            _ => {}
        }
    }

    fences
}

/// Container markers that must precede every further line of a block starting at `start`.
///
/// Blockquote markers are kept; list markers become spaces so that the lines stay inside the
/// item's content.
fn continuation_prefix(markdown: &str, start: usize) -> String {
    let line_start = markdown[..start].rfind('\n').map_or(0, |ix| ix + 1);
    markdown[line_start..start]
        .chars()
        .map(|ch| if ch == '>' || ch.is_whitespace() { ch } else { ' ' })
        .collect()
}

/// Prefix every line of `text` after the first with `prefix`.
fn nest(text: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return text.to_owned();
    }
    let mut nested = String::with_capacity(text.len());
    for (ix, line) in text.split('\n').enumerate() {
        if ix > 0 {
            nested.push('\n');
            if line.is_empty() {
                nested.push_str(prefix.trim_end());
            } else {
                nested.push_str(prefix);
            }
        }
        nested.push_str(line);
    }
    nested
}

/// Inline-code diagnostic shown in place of a failed embed.
fn diagnostic(message: &str) -> String {
    let text = format!("ERROR: {message}");
    match longest_backtick_run(&text) {
        0 => format!("`{text}`"),
        longest => {
            let delimiter = "`".repeat(longest + 1);
            format!("{delimiter} {text} {delimiter}")
        }
    }
}

/// Shortest backtick fence that cannot be closed by a run inside `text`.
fn fence_for(text: &str) -> String {
    "`".repeat(longest_backtick_run(text).max(2) + 1)
}

fn longest_backtick_run(text: &str) -> usize {
    text.split(|ch: char| ch != '`')
        .map(str::len)
        .max()
        .unwrap_or(0)
}

fn caption_style(title: &Title) -> String {
    let mut parts = Vec::new();
    let font_color = title.font_color();
    if !font_color.is_empty() {
        parts.push(format!("color: {font_color}"));
    }
    let background_color = title.background_color();
    if !background_color.is_empty() {
        parts.push(format!("background-color: {background_color}"));
    }
    html_escape::encode_double_quoted_attribute(&parts.join("; ")).into_owned()
}

#[derive(Serialize)]
struct BlockContext {
    block: bool,
    title: String,
    title_html: String,
    style: String,
    language: String,
    fence: String,
    text: String,
}

impl BlockContext {
    fn block(embed: &Embed, title: &Title) -> Self {
        Self {
            block: true,
            title: embed.title.clone(),
            title_html: html_escape::encode_text(&embed.title).into_owned(),
            style: caption_style(title),
            language: embed.language.clone(),
            fence: fence_for(&embed.text),
            text: embed.text.clone(),
        }
    }

    fn caption(text: &str, title: &Title) -> Self {
        Self {
            block: false,
            title: text.to_owned(),
            title_html: html_escape::encode_text(text).into_owned(),
            style: caption_style(title),
            language: String::new(),
            fence: String::new(),
            text: String::new(),
        }
    }
}

const TEMPLATE_NAME: &str = "embed";

fn template_environment(template: &str) -> Result<Environment<'static>> {
    let source = match template {
        "caption" => CAPTION_TEMPLATE.to_owned(),
        "plain" => PLAIN_TEMPLATE.to_owned(),
        path => {
            let template_path = Path::new(path);
            if !template_path.exists() {
                return Err(anyhow!(
                    "template '{}' not found (built-in or filesystem)",
                    path
                ));
            }
            fs::read_to_string(template_path).with_context(|| {
                format!(
                    "failed to load template from path {}",
                    template_path.display()
                )
            })?
        }
    };

    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template_owned(TEMPLATE_NAME, source)
        .map_err(|err| anyhow!("invalid template '{template}': {err}"))?;
    Ok(env)
}

const CAPTION_TEMPLATE: &str = r#"<pre class="embed-code-file"{% if style %} style="{{ style }}"{% endif %}>{{ title_html }}</pre>
{% if block %}

{{ fence }}{{ language }}
{{ text }}
{{ fence }}
{% endif %}
"#;

const PLAIN_TEMPLATE: &str = r#"**{{ title }}**
{% if block %}

{{ fence }}{{ language }}
{{ text }}
{{ fence }}
{% endif %}
"#;
