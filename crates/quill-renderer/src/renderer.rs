//! Markdown to HTML renderer.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd};

use crate::html::{self, AlertKind};
use crate::options::RenderOptions;
use crate::sanitize::{clean_block_html, is_safe_image, is_safe_link};
use crate::state::{CodeBlockState, HeadingState, ImageState, TableState, TocEntry, escape_html};

/// Result of rendering markdown.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderResult {
    /// Rendered HTML, free of executable content.
    pub html: String,
    /// Table of contents entries, one per heading.
    pub toc: Vec<TocEntry>,
    /// Spans that were degraded to literal text or stripped.
    pub warnings: Vec<String>,
}

/// Deterministic markdown renderer.
///
/// Rendering never fails: anything that cannot be rendered safely is shown as
/// literal text and reported in [`RenderResult::warnings`]. A renderer holds
/// no mutable state, so one instance can be shared across threads.
///
/// # Example
///
/// ```
/// use quill_renderer::{MarkdownRenderer, RenderOptions};
///
/// let renderer = MarkdownRenderer::new(RenderOptions::default());
/// let result = renderer.render("# Hello\n\n**Bold** text");
///
/// assert_eq!(
///     result.html,
///     r#"<h1 id="hello">Hello</h1><p><strong>Bold</strong> text</p>"#
/// );
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a renderer with the given options.
    #[must_use]
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Options this renderer was created with.
    #[must_use]
    pub fn options(&self) -> RenderOptions {
        self.options
    }

    /// Parser options: GitHub Flavored Markdown.
    ///
    /// Tables, strikethrough, task lists and GitHub alerts.
    #[must_use]
    pub fn parser_options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM
    }

    /// Render markdown text to HTML.
    #[must_use]
    pub fn render(&self, markdown: &str) -> RenderResult {
        let mut state = RenderState::new(self.options);
        for event in Parser::new_ext(markdown, Self::parser_options()) {
            state.process_event(event);
        }
        state.finish()
    }
}

/// Event-walking state for a single render call.
struct RenderState {
    options: RenderOptions,
    output: String,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
    pending_image: Option<(String, String)>,
    /// One entry per open link: whether an `<a>` tag was emitted for it.
    link_stack: Vec<bool>,
    /// Stack of alert kinds for nested blockquotes (regular blockquote uses None).
    alert_stack: Vec<Option<AlertKind>>,
    /// Raw HTML collected for the current HTML block.
    html_block: Option<String>,
    warnings: Vec<String>,
}

impl RenderState {
    fn new(options: RenderOptions) -> Self {
        Self {
            options,
            output: String::with_capacity(4096),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::default(),
            pending_image: None,
            link_stack: Vec::new(),
            alert_stack: Vec::new(),
            html_block: None,
            warnings: Vec::new(),
        }
    }

    fn finish(mut self) -> RenderResult {
        // Unterminated HTML block at end of input.
        if self.html_block.is_some() {
            self.end_html_block();
        }

        RenderResult {
            html: self.output,
            toc: self.heading.take_toc(),
            warnings: self.warnings,
        }
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Push markup to the heading buffer or output.
    ///
    /// Markup inside image alt text is dropped; alt text is plain.
    fn push_inline(&mut self, content: &str) {
        if self.image.is_active() {
            return;
        }
        if self.heading.is_active() {
            self.heading.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) => self.block_html(&html),
            Event::InlineHtml(html) => self.inline_html(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.push_inline("<br>"),
            Event::Rule => self.output.push_str("<hr>"),
            Event::TaskListMarker(checked) => html::task_list_marker(checked, &mut self.output),
            Event::InlineMath(math) | Event::DisplayMath(math) => self.text(&math),
            Event::FootnoteReference(name) => self.text(&format!("[^{name}]")),
        }
    }

    #[allow(clippy::too_many_lines)]
    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.output.push_str("<p>"),
            Tag::Heading { level, .. } => {
                // Opening tag is written in end_tag once the ID is known.
                self.heading.start_heading(heading_level_to_num(level));
            }
            Tag::BlockQuote(kind) => {
                if let Some(bq_kind) = kind {
                    let alert_kind = AlertKind::from(bq_kind);
                    self.alert_stack.push(Some(alert_kind));
                    html::alert_start(alert_kind, &mut self.output);
                } else {
                    self.alert_stack.push(None);
                    self.output.push_str("<blockquote>");
                }
            }
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(ref info) => {
                        info.split_whitespace().next().map(str::to_owned)
                    }
                    CodeBlockKind::Indented => None,
                };
                self.code.start(lang);
            }
            Tag::HtmlBlock => self.html_block = Some(String::new()),
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => {
                    let _ = write!(self.output, r#"<ol start="{n}">"#);
                }
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::FootnoteDefinition(_) | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let tag = if self.table.is_in_head() { "th" } else { "td" };
                let _ = write!(self.output, "<{tag}{align}>");
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<del>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => self.start_link(link_type, &dest_url, &title),
            Tag::Image {
                dest_url, title, ..
            } => {
                // Alt text is collected until the image closes.
                if self.image.start() {
                    self.pending_image = Some((dest_url.into_string(), title.into_string()));
                }
            }
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.output.push_str("</p>"),
            TagEnd::Heading(_) => {
                if let Some(heading) = self.heading.complete_heading() {
                    let _ = write!(
                        self.output,
                        r#"<h{level} id="{id}">{html}</h{level}>"#,
                        level = heading.level,
                        id = escape_html(&heading.id),
                        html = heading.html,
                    );
                }
            }
            TagEnd::BlockQuote(_) => match self.alert_stack.pop() {
                Some(Some(_)) => html::alert_end(&mut self.output),
                _ => self.output.push_str("</blockquote>"),
            },
            TagEnd::CodeBlock => {
                let (lang, content) = self.code.end();
                html::code_block(lang.as_deref(), &content, &mut self.output);
            }
            TagEnd::HtmlBlock => self.end_html_block(),
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::FootnoteDefinition | TagEnd::MetadataBlock(_) => {}
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</del>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => {
                if self.link_stack.pop() == Some(true) {
                    self.push_inline("</a>");
                }
            }
            TagEnd::Image => self.end_image(),
        }
    }

    fn start_link(&mut self, link_type: LinkType, dest_url: &str, title: &str) {
        let href = if link_type == LinkType::Email {
            format!("mailto:{dest_url}")
        } else {
            dest_url.to_owned()
        };

        if is_safe_link(&href) {
            let tag = html::link_start(&href, title, self.options.link_target);
            self.push_inline(&tag);
            self.link_stack.push(true);
        } else {
            self.warn(format!("unsafe link destination removed: {href}"));
            self.link_stack.push(false);
        }
    }

    fn end_image(&mut self) {
        let Some(alt) = self.image.end() else {
            return;
        };
        let Some((src, title)) = self.pending_image.take() else {
            return;
        };

        if is_safe_image(&src) {
            let mut tag = String::new();
            html::image(&src, &alt, &title, &mut tag);
            self.push_inline(&tag);
        } else {
            self.warn(format!("unsafe image source removed: {src}"));
            if self.heading.is_active() {
                self.heading.push_text(&alt);
            }
            self.push_inline(&escape_html(&alt));
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else if self.heading.is_active() {
            self.heading.push_text(text);
            self.heading.push_html(&escape_html(text));
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.is_active() {
            self.image.push_str(code);
            return;
        }
        if self.heading.is_active() {
            self.heading.push_text(code);
        }
        self.push_inline(&format!("<code>{}</code>", escape_html(code)));
    }

    fn block_html(&mut self, html: &str) {
        if let Some(buffer) = self.html_block.as_mut() {
            buffer.push_str(html);
        } else {
            self.inline_html(html);
        }
    }

    fn inline_html(&mut self, html: &str) {
        self.warn(format!("inline HTML rendered as text: {}", html.trim()));
        self.text(html);
    }

    fn end_html_block(&mut self) {
        let Some(raw) = self.html_block.take() else {
            return;
        };

        if self.options.allow_raw_markup {
            self.output.push_str(&clean_block_html(&raw));
        } else {
            self.warn("HTML block rendered as text".to_owned());
            let _ = write!(self.output, "<p>{}</p>", escape_html(raw.trim_end()));
        }
    }

    fn soft_break(&mut self) {
        if self.image.is_active() {
            self.image.push_str(" ");
        } else if self.heading.is_active() {
            self.heading.push_text(" ");
            self.heading.push_html("\n");
        } else {
            self.output.push('\n');
        }
    }
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::options::LinkTarget;

    fn render_html(markdown: &str) -> RenderResult {
        MarkdownRenderer::default().render(markdown)
    }

    fn render_with_raw_markup(markdown: &str) -> RenderResult {
        MarkdownRenderer::new(RenderOptions::default().with_raw_markup(true)).render(markdown)
    }

    #[test]
    fn test_empty_input() {
        let result = render_html("");
        assert_eq!(result.html, "");
        assert!(result.toc.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_basic_paragraph() {
        let result = render_html("Hello, world!");
        assert_eq!(result.html, "<p>Hello, world!</p>");
    }

    #[test]
    fn test_single_top_level_heading() {
        let result = render_html("# Title");
        assert_eq!(result.html, r#"<h1 id="title">Title</h1>"#);
        assert_eq!(result.html.matches("<h1").count(), 1);
    }

    #[test]
    fn test_heading_with_id_and_toc() {
        let result = render_html("## Section Title");
        assert_eq!(result.html, r#"<h2 id="section-title">Section Title</h2>"#);
        assert_eq!(
            result.toc,
            vec![TocEntry {
                level: 2,
                title: "Section Title".to_owned(),
                id: "section-title".to_owned(),
            }]
        );
    }

    #[test]
    fn test_heading_ids_unique_when_text_matches_suffix() {
        let result = render_html("# Setup\n\n# Setup\n\n# Setup 1");
        let ids: Vec<_> = result.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["setup", "setup-1", "setup-1-1"]);
        assert_eq!(result.html.matches(r#"id="setup-1""#).count(), 1);
    }

    #[test]
    fn test_heading_with_inline_formatting() {
        let result = render_html("## Using `fetch` *safely*");
        assert_eq!(
            result.html,
            r#"<h2 id="using-fetch-safely">Using <code>fetch</code> <em>safely</em></h2>"#
        );
        assert_eq!(result.toc[0].title, "Using fetch safely");
    }

    #[test]
    fn test_inline_code_is_literal() {
        let result = render_html("`inline code`");
        assert_eq!(result.html, "<p><code>inline code</code></p>");
    }

    #[test]
    fn test_inline_code_not_interpreted() {
        let result = render_html("`*not emphasis* <b>`");
        assert_eq!(
            result.html,
            "<p><code>*not emphasis* &lt;b&gt;</code></p>"
        );
    }

    #[test]
    fn test_emphasis_and_strong() {
        let result = render_html("*em* and **strong** and ~~gone~~");
        assert_eq!(
            result.html,
            "<p><em>em</em> and <strong>strong</strong> and <del>gone</del></p>"
        );
    }

    #[test]
    fn test_unordered_list() {
        let result = render_html("- one\n- two");
        assert_eq!(result.html, "<ul><li>one</li><li>two</li></ul>");
    }

    #[test]
    fn test_ordered_list_with_start() {
        let result = render_html("3. three\n4. four");
        assert_eq!(
            result.html,
            r#"<ol start="3"><li>three</li><li>four</li></ol>"#
        );
    }

    #[test]
    fn test_task_list() {
        let result = render_html("- [x] done\n- [ ] todo");
        assert!(result.html.contains("checked disabled"));
        assert_eq!(result.html.matches("<input").count(), 2);
    }

    #[test]
    fn test_fenced_code_block_is_verbatim() {
        let result = render_html("```rust\nlet x = *y*;\n# not a heading\n```");
        assert_eq!(
            result.html,
            "<pre><code class=\"language-rust\">let x = *y*;\n# not a heading\n</code></pre>"
        );
        assert!(result.toc.is_empty());
    }

    #[test]
    fn test_fence_info_uses_first_word() {
        let result = render_html("```python title=\"x\"\npass\n```");
        assert!(result.html.contains(r#"class="language-python""#));
    }

    #[test]
    fn test_indented_code_block() {
        let result = render_html("    <script>alert(1)</script>");
        assert!(result.html.starts_with("<pre><code>&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(result.html.ends_with("</code></pre>"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_code_block_escapes_html() {
        let result = render_html("```html\n<script>alert(1)</script>\n```");
        assert!(!result.html.contains("<script"));
        assert!(result.html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_blockquote() {
        let result = render_html("> Quoted");
        assert_eq!(result.html, "<blockquote><p>Quoted</p></blockquote>");
    }

    #[test]
    fn test_note_alert() {
        let result = render_html("> [!NOTE]\n> This is a **note**.");
        assert!(result.html.contains("markdown-alert-note"));
        assert!(result.html.contains("<strong>note</strong>"));
        assert!(!result.html.contains("<blockquote>"));
    }

    #[test]
    fn test_warning_alert() {
        let result = render_html("> [!WARNING]\n> Be careful!");
        assert!(result.html.contains("markdown-alert-warning"));
        assert!(result.html.ends_with("</div>"));
    }

    #[test]
    fn test_table_with_alignment() {
        let result = render_html("| a | b |\n|---|:-:|\n| 1 | 2 |");
        assert_eq!(
            result.html,
            concat!(
                "<table><thead><tr><th>a</th>",
                r#"<th style="text-align:center">b</th></tr></thead>"#,
                "<tbody><tr><td>1</td>",
                r#"<td style="text-align:center">2</td></tr></tbody></table>"#
            )
        );
    }

    #[test]
    fn test_link() {
        let result = render_html("[Docs](https://example.com \"Home\")");
        assert_eq!(
            result.html,
            r#"<p><a href="https://example.com" title="Home">Docs</a></p>"#
        );
    }

    #[test]
    fn test_link_new_context() {
        let renderer = MarkdownRenderer::new(
            RenderOptions::default().with_link_target(LinkTarget::NewContext),
        );
        let result = renderer.render("[Docs](/docs)");
        assert_eq!(
            result.html,
            r#"<p><a href="/docs" target="_blank" rel="noopener noreferrer">Docs</a></p>"#
        );
    }

    #[test]
    fn test_autolink_and_email() {
        let result = render_html("<https://example.com> <me@example.com>");
        assert!(result.html.contains(r#"<a href="https://example.com">"#));
        assert!(result.html.contains(r#"<a href="mailto:me@example.com">"#));
    }

    #[test]
    fn test_javascript_link_neutralized() {
        let result = render_html("[click](javascript:alert(1))");
        assert_eq!(result.html, "<p>click</p>");
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("unsafe link"));
    }

    #[test]
    fn test_javascript_link_variants_neutralized() {
        for markdown in [
            "[x](JAVASCRIPT:alert(1))",
            "[x](&#106;avascript:alert(1))",
            "[x](<java\tscript:alert(1)>)",
            "[x][ref]\n\n[ref]: javascript:alert(1)",
            "*[nested **deep**](javascript:alert(1))*",
        ] {
            let result = render_html(markdown);
            assert!(
                !result.html.to_ascii_lowercase().contains("javascript"),
                "{markdown} rendered as {}",
                result.html
            );
            assert!(!result.html.contains("<a"), "{markdown}");
        }
    }

    #[test]
    fn test_image() {
        let result = render_html("![A *cat*](cat.png \"Cat\")");
        assert_eq!(
            result.html,
            r#"<p><img src="cat.png" title="Cat" alt="A cat"></p>"#
        );
    }

    #[test]
    fn test_unsafe_image_falls_back_to_alt_text() {
        let result = render_html("![alt & text](javascript:alert(1))");
        assert_eq!(result.html, "<p>alt &amp; text</p>");
        assert!(result.warnings[0].contains("unsafe image"));
    }

    #[test]
    fn test_image_inside_link() {
        let result = render_html("[![logo](logo.png)](https://example.com)");
        assert_eq!(
            result.html,
            r#"<p><a href="https://example.com"><img src="logo.png" alt="logo"></a></p>"#
        );
    }

    #[test]
    fn test_script_block_is_not_executable() {
        let result = render_html("<script>alert(1)</script>");
        assert!(!result.html.contains("<script"));
        assert!(result.html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert_eq!(result.warnings, vec!["HTML block rendered as text".to_owned()]);
    }

    #[test]
    fn test_script_nested_in_blockquote_and_list() {
        let result = render_html("> - item\n>\n>   <script>alert(1)</script>");
        assert!(!result.html.contains("<script"));
    }

    #[test]
    fn test_inline_html_rendered_as_text() {
        let result = render_html("Hello <img src=x onerror=alert(1)> world");
        assert!(!result.html.contains("<img"));
        assert!(result.html.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_inline_html_stays_text_with_raw_markup() {
        let result = render_with_raw_markup("Hello <span onclick=\"x()\">world</span>");
        assert!(!result.html.contains("<span"));
    }

    #[test]
    fn test_raw_markup_block_passthrough_is_sanitized() {
        let result = render_with_raw_markup(
            "<div onclick=\"steal()\"><script>alert(1)</script><b>bold</b></div>",
        );
        assert!(result.html.contains("<div>"));
        assert!(result.html.contains("<b>bold</b>"));
        assert!(!result.html.contains("onclick"));
        assert!(!result.html.contains("<script"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_raw_markup_strips_javascript_urls() {
        let result = render_with_raw_markup("<p><a href=\"javascript:alert(1)\">x</a></p>");
        assert!(!result.html.contains("javascript:"));
    }

    #[test]
    fn test_unclosed_emphasis_degrades_to_text() {
        let result = render_html("**not closed");
        assert_eq!(result.html, "<p>**not closed</p>");
    }

    #[test]
    fn test_malformed_link_degrades_to_text() {
        let result = render_html("[broken](");
        assert_eq!(result.html, "<p>[broken](</p>");
    }

    #[test]
    fn test_rule_and_hard_break() {
        let result = render_html("a  \nb\n\n---");
        assert_eq!(result.html, "<p>a<br>b</p><hr>");
    }

    #[test]
    fn test_render_is_deterministic() {
        let markdown = "# A\n\n## A\n\n| x |\n|---|\n| y |\n\n[l](javascript:x) <b>";
        let renderer = MarkdownRenderer::default();

        let first = renderer.render(markdown);
        let second = renderer.render(markdown);

        assert_eq!(first, second);
    }

    #[test]
    fn test_renderer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MarkdownRenderer>();
    }
}
