//! Embedded media: `[img]` and `[youtube]`.
use tagmark_core::{Html, RenderOptions, UrlError, UrlPolicy, sanitize_url, unescape_html};
use tagmark_parser::{NodeRef, Tag, TagDefinition, TagFlags, ValidationContext, ValidationError};
use url::{Url, form_urlencoded};

const YOUTUBE_HOSTS: &[&str] = &["www.youtube.com", "youtube.com", "youtu.be"];
const YOUTUBE_SHORT_HOST: &str = "youtu.be";
const IFRAME_WIDTH: usize = 560;
const IFRAME_HEIGHT: usize = 315;

/// `[img]https://example.com/a.png[/img]` or `[img src=...]`.
///
/// Optional `alt`, `width` and `height`. The two sizes must be positive
/// integers and are dropped from the output otherwise.
#[derive(Debug)]
pub struct Image;

impl Image {
    fn source(node: NodeRef<'_>) -> Result<String, UrlError> {
        let policy = UrlPolicy::default().with_base(node.document().relative_url_base());
        match node.attribute("src").filter(|src| !src.trim().is_empty()) {
            Some(src) => sanitize_url(src, &policy),
            None => sanitize_url(node.content(), &policy),
        }
    }
}

fn dimension(node: NodeRef<'_>, attribute: &'static str) -> Result<Option<usize>, ValidationError> {
    let Some(value) = node.attribute(attribute).map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    match value.parse::<i64>() {
        Ok(number) => match usize::try_from(number) {
            Ok(number) if number > 0 => Ok(Some(number)),
            Ok(_) | Err(_) => Err(ValidationError::NotPositive {
                attribute,
                value: value.to_string(),
            }),
        },
        Err(_) => Err(ValidationError::NotANumber {
            attribute,
            value: value.to_string(),
        }),
    }
}

fn alt_text(node: NodeRef<'_>) -> String {
    node.attribute("alt").map(unescape_html).unwrap_or_default()
}

impl Tag for Image {
    fn definition(&self) -> &TagDefinition {
        const DEFINITION: TagDefinition = TagDefinition::new("img", TagFlags::inline().verbatim());
        &DEFINITION
    }

    fn validate(&self, ctx: &mut ValidationContext<'_>) {
        let node = ctx.node();
        if let Err(error) = Self::source(node) {
            ctx.report(error.into());
        }
        for attribute in ["width", "height"] {
            if let Err(error) = dimension(node, attribute) {
                ctx.report(error);
            }
        }
    }

    fn render_html(&self, node: NodeRef<'_>, _inner: Html, _options: &RenderOptions) -> Html {
        let Ok(src) = Self::source(node) else {
            return Html::escape(node.content());
        };
        let mut html = Html::from_static("<img");
        html.push_attr("src", &src);
        let alt = alt_text(node);
        if !alt.is_empty() {
            html.push_attr("alt", &alt);
        }
        if let Ok(Some(width)) = dimension(node, "width") {
            html.push_static(" width=\"");
            html.push_number(width);
            html.push_static("\"");
        }
        if let Ok(Some(height)) = dimension(node, "height") {
            html.push_static(" height=\"");
            html.push_number(height);
            html.push_static("\"");
        }
        html.push_static(" />");
        html
    }

    fn render_text(&self, node: NodeRef<'_>, _inner: String, _options: &RenderOptions) -> String {
        let Ok(src) = Self::source(node) else {
            return node.content().to_string();
        };
        let alt = alt_text(node);
        if alt.is_empty() {
            src
        } else {
            format!("{src} ({alt})")
        }
    }
}

/// `[youtube]https://www.youtube.com/watch?v=ID[/youtube]`, also accepting
/// `youtu.be/ID` short links.
#[derive(Debug)]
pub struct Youtube;

/// The video id of a YouTube watch or short link.
fn video_id(link: &str) -> Option<String> {
    let url = Url::parse(link.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?;
    if !YOUTUBE_HOSTS.contains(&host) {
        return None;
    }
    let id = if host == YOUTUBE_SHORT_HOST {
        url.path_segments()?
            .rev()
            .find(|segment| !segment.is_empty())?
            .trim()
            .to_string()
    } else {
        url.query_pairs()
            .find(|(key, _)| key == "v")?
            .1
            .trim()
            .to_string()
    };
    (!id.is_empty()).then_some(id)
}

fn encoded_video_id(node: NodeRef<'_>) -> Option<String> {
    video_id(node.content()).map(|id| form_urlencoded::byte_serialize(id.as_bytes()).collect())
}

impl Tag for Youtube {
    fn definition(&self) -> &TagDefinition {
        const DEFINITION: TagDefinition = TagDefinition::new("youtube", TagFlags::block().verbatim());
        &DEFINITION
    }

    fn validate(&self, ctx: &mut ValidationContext<'_>) {
        if video_id(ctx.content()).is_none() {
            let link = ctx.content().trim().to_string();
            ctx.report(ValidationError::InvalidVideoUrl(link));
        }
    }

    fn render_html(&self, node: NodeRef<'_>, _inner: Html, _options: &RenderOptions) -> Html {
        let Some(id) = encoded_video_id(node) else {
            return Html::escape(node.content());
        };
        let mut html = Html::from_static(
            "<div class=\"embed-container center-block\">\n    <div class=\"embed-video\">\n        <iframe",
        );
        html.push_static(" width=\"");
        html.push_number(IFRAME_WIDTH);
        html.push_static("\" height=\"");
        html.push_number(IFRAME_HEIGHT);
        html.push_static("\"");
        html.push_attr("src", &format!("https://www.youtube.com/embed/{id}"));
        html.push_static(
            " frameborder=\"0\" allowfullscreen=\"true\"></iframe>\n    </div>\n</div>\n",
        );
        html
    }

    fn render_text(&self, node: NodeRef<'_>, _inner: String, _options: &RenderOptions) -> String {
        match encoded_video_id(node) {
            Some(id) => format!("https://youtu.be/{id}"),
            None => node.content().to_string(),
        }
    }
}
