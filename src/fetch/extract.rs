//! Article text and lead image extraction from raw HTML

use reqwest::Url;
use scraper::node::Element;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

/// Blocks with less visible text than this are never picked as the article body
const MIN_BLOCK_CHARS: usize = 20;

const HIDDEN_TAGS: [&str; 4] = ["script", "style", "noscript", "template"];

const BOILERPLATE_MARKERS: [&str; 13] = [
    "nav",
    "menu",
    "sidebar",
    "footer",
    "header",
    "banner",
    "cookie",
    "consent",
    "advert",
    "promo",
    "subscribe",
    "newsletter",
    "comment",
];

/// Main text and representative image of a page; empty strings when absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extracted {
    pub content: String,
    pub image: String,
}

fn norm_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of `el` without script/style payloads, whitespace-normalized.
/// Hidden subtrees are skipped whole, so each node is visited once.
fn visible_text(el: &ElementRef) -> String {
    let mut parts: Vec<&str> = Vec::new();
    let mut stack = vec![**el];
    while let Some(node) = stack.pop() {
        if let Some(text) = node.value().as_text() {
            parts.push(text);
            continue;
        }
        if node.value().as_element().is_some_and(is_hidden) {
            continue;
        }
        let children: Vec<_> = node.children().collect();
        stack.extend(children.into_iter().rev());
    }
    norm_ws(&parts.join(" "))
}

fn is_hidden(el: &Element) -> bool {
    HIDDEN_TAGS.contains(&el.name())
}

fn looks_like_boilerplate(el: &Element) -> bool {
    let mut marker = String::new();
    if let Some(c) = el.attr("class") {
        marker.push_str(c);
        marker.push(' ');
    }
    if let Some(i) = el.attr("id") {
        marker.push_str(i);
    }
    let marker = marker.to_ascii_lowercase();
    !marker.is_empty() && BOILERPLATE_MARKERS.iter().any(|m| marker.contains(m))
}

/// Visible and link text (non-whitespace chars) under a candidate block
struct Block<'a> {
    el: ElementRef<'a>,
    order: usize,
    chars: usize,
    link_chars: usize,
}

#[derive(Default)]
struct Frame {
    order: usize,
    chars: usize,
    link_chars: usize,
    is_link: bool,
    is_candidate: bool,
}

/// Count text for every element in one post-order walk and keep the candidate
/// blocks. Totals bubble up from children, so the walk stays linear in the
/// size of the document however deeply it nests.
fn collect_blocks(doc: &Html) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut frames: Vec<Frame> = Vec::new();
    let mut opened = 0;
    let mut stack = vec![(*doc.root_element(), false)];

    while let Some((node, closing)) = stack.pop() {
        if closing {
            let Some(frame) = frames.pop() else {
                continue;
            };
            let link_chars = if frame.is_link { frame.chars } else { frame.link_chars };
            if let Some(parent) = frames.last_mut() {
                parent.chars += frame.chars;
                parent.link_chars += link_chars;
            }
            if frame.is_candidate
                && let Some(el) = ElementRef::wrap(node)
            {
                blocks.push(Block {
                    el,
                    order: frame.order,
                    chars: frame.chars,
                    link_chars,
                });
            }
            continue;
        }

        if let Some(text) = node.value().as_text() {
            if let Some(frame) = frames.last_mut() {
                frame.chars += text.chars().filter(|c| !c.is_whitespace()).count();
            }
            continue;
        }
        let Some(el) = node.value().as_element() else {
            continue;
        };
        if is_hidden(el) {
            continue;
        }
        frames.push(Frame {
            order: opened,
            is_link: el.name() == "a",
            is_candidate: matches!(el.name(), "article" | "main" | "section" | "div")
                && !looks_like_boilerplate(el),
            ..Frame::default()
        });
        opened += 1;
        stack.push((node, true));
        let children: Vec<_> = node.children().collect();
        stack.extend(children.into_iter().rev().map(|child| (child, false)));
    }
    blocks
}

/// Pick the block with the most non-link text, favouring `article` and `main`
fn pick_main_block(doc: &Html) -> Option<(ElementRef<'_>, String)> {
    let mut best: Option<(i64, usize, ElementRef<'_>)> = None;
    for Block {
        el,
        order,
        chars,
        link_chars,
    } in collect_blocks(doc)
    {
        if chars < MIN_BLOCK_CHARS {
            continue;
        }
        let mut score = chars as i64 - 2 * link_chars as i64;
        match el.value().name() {
            "article" => score += 500,
            "main" => score += 300,
            _ => {}
        }
        if link_chars > chars / 2 {
            score -= 500;
        }
        let better = best
            .as_ref()
            .is_none_or(|(s, o, _)| score > *s || (score == *s && order < *o));
        if score > 0 && better {
            best = Some((score, order, el));
        }
    }
    best.map(|(_, _, el)| (el, visible_text(&el)))
}

fn first_attr(doc: &Html, selector: &str, attr: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    doc.select(&sel)
        .filter_map(|el| el.value().attr(attr))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

fn first_img_in(el: &ElementRef) -> Option<String> {
    let sel = Selector::parse("img[src]").ok()?;
    el.select(&sel)
        .filter_map(|img| img.value().attr("src"))
        .map(str::trim)
        .find(|src| !src.is_empty() && !src.starts_with("data:"))
        .map(str::to_string)
}

/// Resolve `reference` against `base_url`; unresolvable references are kept as given
fn absolutize(reference: &str, base_url: &str) -> String {
    match Url::parse(base_url).and_then(|base| base.join(reference)) {
        Ok(url) => url.to_string(),
        Err(_) => reference.to_string(),
    }
}

/// Extract the article text and lead image of an HTML page.
///
/// The image is taken from `og:image`, `twitter:image`, `link[rel=image_src]`, then
/// the first `<img>` of the article block (or of the page). Relative image URLs are
/// resolved against `base_url`.
pub fn extract_article(html: &str, base_url: &str) -> Extracted {
    let doc = Html::parse_document(html);
    let main = pick_main_block(&doc);

    let content = match &main {
        Some((_, text)) => text.clone(),
        None => Selector::parse("body")
            .ok()
            .and_then(|body| doc.select(&body).next())
            .map(|body| visible_text(&body))
            .unwrap_or_else(|| visible_text(&doc.root_element())),
    };

    let image = first_attr(&doc, "meta[property=\"og:image\"]", "content")
        .or_else(|| first_attr(&doc, "meta[name=\"twitter:image\"]", "content"))
        .or_else(|| first_attr(&doc, "meta[property=\"twitter:image\"]", "content"))
        .or_else(|| first_attr(&doc, "link[rel=\"image_src\"]", "href"))
        .or_else(|| main.as_ref().and_then(|(el, _)| first_img_in(el)))
        .or_else(|| first_img_in(&doc.root_element()))
        .map(|src| absolutize(&src, base_url))
        .unwrap_or_default();

    Extracted { content, image }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"
        <html><head>
          <title>Sol</title>
          <meta property="og:image" content="/img/lead.jpg">
          <script>var tracking = "do not read me";</script>
        </head><body>
          <div class="navbar"><a href="/">Inicio</a> <a href="/a">Noticias de hoy</a></div>
          <article>
            <h1>El sol brilla</h1>
            <p>El sol brilla sobre la ciudad durante toda la semana.</p>
            <img src="inline.png">
          </article>
          <div class="footer">Copyright y otras cosas legales del sitio</div>
        </body></html>"#;

    #[test]
    fn test_picks_article_and_og_image() {
        let out = extract_article(ARTICLE, "https://news.example.com/2024/sol.html");
        assert!(out.content.contains("El sol brilla sobre la ciudad"));
        assert!(!out.content.contains("Copyright"));
        assert!(!out.content.contains("tracking"));
        assert_eq!(out.image, "https://news.example.com/img/lead.jpg");
    }

    #[test]
    fn test_falls_back_to_first_image_in_block() {
        let html = r#"<html><body><main>
            <p>Un texto bastante largo para contar como cuerpo principal.</p>
            <img src="data:image/png;base64,AAAA"><img src="fotos/a.jpg">
        </main></body></html>"#;
        let out = extract_article(html, "https://example.org/dir/page");
        assert_eq!(out.image, "https://example.org/dir/fotos/a.jpg");
    }

    #[test]
    fn test_link_heavy_blocks_lose() {
        let html = r#"<html><body>
            <div><a href="/1">Enlace uno muy largo</a> <a href="/2">Enlace dos muy largo</a></div>
            <div><p>Este parrafo tiene texto normal sin enlaces y deberia ganar.</p></div>
        </body></html>"#;
        let out = extract_article(html, "https://example.org/");
        assert!(out.content.starts_with("Este parrafo"));
    }

    #[test]
    fn test_short_page_uses_body_and_empty_image() {
        let out = extract_article("<html><body><p>Hola</p></body></html>", "not a url");
        assert_eq!(out.content, "Hola");
        assert_eq!(out.image, "");
    }

    #[test]
    fn test_unresolvable_base_keeps_reference() {
        let html = r#"<meta property="og:image" content="/x.jpg"><p>hola</p>"#;
        let out = extract_article(html, "not a url");
        assert_eq!(out.image, "/x.jpg");
    }

    #[test]
    fn test_deeply_nested_markup_stays_linear() {
        let depth = 3000;
        let mut html = String::from("<html><body>");
        for _ in 0..depth {
            html.push_str("<div>palabra larga aqui ");
        }
        for _ in 0..depth {
            html.push_str("</div>");
        }
        html.push_str("</body></html>");

        let started = std::time::Instant::now();
        let out = extract_article(&html, "https://example.org/");
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
        assert!(out.content.starts_with("palabra larga aqui"));
    }

    #[test]
    fn test_hidden_text_does_not_count_toward_block() {
        let html = r#"<html><body>
            <div><script>var a = "mucho texto escondido que no se ve en la pagina";</script><p>Corto</p></div>
            <section><p>Texto visible suficiente para ganar la seleccion.</p></section>
        </body></html>"#;
        let out = extract_article(html, "https://example.org/");
        assert_eq!(out.content, "Texto visible suficiente para ganar la seleccion.");
    }
}
