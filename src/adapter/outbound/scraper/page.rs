//! Product page interpretation.
//!
//! Naive string heuristics over the rendered HTML. They only need to
//! understand the handful of markers the shop's product pages carry.

use crate::domain::{Observation, StockStatus};

/// Read name, image and availability from a product page.
#[must_use]
pub fn parse_page(html: &str) -> Observation {
    let name = product_name(html).unwrap_or_default();
    let status = availability(html).unwrap_or_else(|| status_from_text(html));
    let observation = Observation::new(status, name);
    match meta_content(html, "og:image") {
        Some(image) if !image.is_empty() => observation.with_image(image),
        _ => observation,
    }
}

fn product_name(html: &str) -> Option<String> {
    if let Some(title) = meta_content(html, "og:title").filter(|t| !t.is_empty()) {
        return Some(title);
    }
    if let Some(h1) = slice_between_ci(html, "<h1", "</h1>") {
        let text = strip_tags(h1);
        if !text.is_empty() {
            return Some(text);
        }
    }
    let title = strip_tags(slice_between_ci(html, "<title", "</title>")?);
    let name = title.split('|').next().unwrap_or_default().trim().to_string();
    (!name.is_empty()).then_some(name)
}

/// schema.org `availability` markers, from JSON-LD or microdata.
fn availability(html: &str) -> Option<StockStatus> {
    let lc = html.to_ascii_lowercase();
    if lc.contains("schema.org/outofstock") || lc.contains("schema.org/soldout") {
        Some(StockStatus::OutOfStock)
    } else if lc.contains("schema.org/instock") || lc.contains("schema.org/limitedavailability") {
        Some(StockStatus::InStock)
    } else {
        None
    }
}

/// Fall back to the visible text of the page.
fn status_from_text(html: &str) -> StockStatus {
    let visible = strip_tags(&remove_blocks_ci(html, "<script", "</script>")).to_ascii_lowercase();
    if visible.contains("sold out") || visible.contains("notify me") {
        StockStatus::OutOfStock
    } else if visible.contains("add to cart") {
        StockStatus::InStock
    } else {
        StockStatus::Unknown
    }
}

/// `content` of the first `<meta>` whose `property` or `name` matches.
fn meta_content(html: &str, key: &str) -> Option<String> {
    let lc = html.to_ascii_lowercase();
    let mut from = 0;
    while let Some(rel) = lc[from..].find("<meta") {
        let start = from + rel;
        let end = start + html[start..].find('>')?;
        let tag = &html[start..=end];
        let matches = [attr_value(tag, "property"), attr_value(tag, "name")]
            .into_iter()
            .flatten()
            .any(|v| v.eq_ignore_ascii_case(key));
        if matches {
            return attr_value(tag, "content").map(|v| normalize_entities(v).trim().to_string());
        }
        from = end + 1;
    }
    None
}

/// Quoted attribute value inside a single tag.
fn attr_value<'a>(tag: &'a str, attr: &str) -> Option<&'a str> {
    let lc = tag.to_ascii_lowercase();
    let pattern = format!("{attr}=");
    let mut from = 0;
    while let Some(rel) = lc[from..].find(&pattern) {
        let at = from + rel;
        let boundary = at == 0 || lc.as_bytes()[at - 1].is_ascii_whitespace();
        let value_start = at + pattern.len();
        if boundary {
            let quote = tag[value_start..].chars().next()?;
            if quote == '"' || quote == '\'' {
                let rest = &tag[value_start + 1..];
                return rest.find(quote).map(|close| &rest[..close]);
            }
        }
        from = value_start;
    }
    None
}

/// HTML inside an opening tag (with attributes) and its closing tag.
fn slice_between_ci<'a>(s: &'a str, open_pat: &str, close_pat: &str) -> Option<&'a str> {
    let lc = s.to_ascii_lowercase();
    let open_idx = lc.find(&open_pat.to_ascii_lowercase())?;
    let after_open = s[open_idx..].find('>')? + open_idx + 1;
    let close_rel = lc[after_open..].find(&close_pat.to_ascii_lowercase())?;
    Some(&s[after_open..after_open + close_rel])
}

/// Drop every `open .. close` block, tags included.
fn remove_blocks_ci(s: &str, open_pat: &str, close_pat: &str) -> String {
    let lc = s.to_ascii_lowercase();
    let mut out = String::with_capacity(s.len());
    let mut from = 0;
    while let Some(rel) = lc[from..].find(open_pat) {
        let start = from + rel;
        out.push_str(&s[from..start]);
        match lc[start..].find(close_pat) {
            Some(end_rel) => from = start + end_rel + close_pat.len(),
            None => return out,
        }
    }
    out.push_str(&s[from..]);
    out
}

/// Remove all tags, decode the common entities and collapse whitespace.
fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&normalize_entities(&out))
}

fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const IN_STOCK_PAGE: &str = r#"<html><head>
        <title>Amul High Protein Lassi | Amul Shop</title>
        <meta property="og:title" content="Amul High Protein Lassi, 200 mL | Pack of 30" />
        <meta property="og:image" content="https://shop.amul.com/s/img/lassi.png">
        <script type="application/ld+json">{"offers":{"availability":"https://schema.org/InStock"}}</script>
        </head><body><h1>Ignored</h1></body></html>"#;

    #[test]
    fn reads_open_graph_and_schema_availability() {
        let observation = parse_page(IN_STOCK_PAGE);
        assert_eq!(observation.status, StockStatus::InStock);
        assert_eq!(observation.name, "Amul High Protein Lassi, 200 mL | Pack of 30");
        assert_eq!(
            observation.image_url.as_deref(),
            Some("https://shop.amul.com/s/img/lassi.png")
        );
    }

    #[test]
    fn schema_out_of_stock_wins_over_button_text() {
        let html = r#"<link itemprop="availability" href="http://schema.org/OutOfStock">
            <button>Add to Cart</button>"#;
        assert_eq!(parse_page(html).status, StockStatus::OutOfStock);
    }

    #[test]
    fn falls_back_to_visible_text() {
        let sold_out = "<h1>Amul Kool</h1><div class='btn'>Sold  Out</div>";
        assert_eq!(parse_page(sold_out).status, StockStatus::OutOfStock);

        let notify = "<h1>Amul Kool</h1><a>Notify Me</a>";
        assert_eq!(parse_page(notify).status, StockStatus::OutOfStock);

        let cart = "<h1>Amul Kool</h1><button>ADD TO CART</button>";
        assert_eq!(parse_page(cart).status, StockStatus::InStock);
    }

    #[test]
    fn script_text_does_not_count_as_visible() {
        let html = "<script>var label = 'add to cart';</script><p>Loading</p>";
        assert_eq!(parse_page(html).status, StockStatus::Unknown);
    }

    #[test]
    fn name_falls_back_to_h1_then_title() {
        let h1 = "<title>T | Shop</title><h1 class=\"name\"> Amul <b>Kool</b> Koko </h1>";
        assert_eq!(parse_page(h1).name, "Amul Kool Koko");

        let title = "<title>Amul Whey Protein | Amul Shop</title><body></body>";
        assert_eq!(parse_page(title).name, "Amul Whey Protein");
    }

    #[test]
    fn blank_page_is_unknown_without_name() {
        let observation = parse_page("<html></html>");
        assert_eq!(observation.status, StockStatus::Unknown);
        assert!(observation.name.is_empty());
        assert!(observation.image_url.is_none());
    }

    #[test]
    fn meta_matching_ignores_lookalike_attributes() {
        let html = r#"<meta data-property="og:image" content="wrong"><meta name="og:image" content='right'>"#;
        assert_eq!(meta_content(html, "og:image").as_deref(), Some("right"));
    }

    #[test]
    fn decodes_entities_in_meta_content() {
        let html = r#"<meta property="og:title" content="Amul Milk &amp; Cream">"#;
        assert_eq!(parse_page(html).name, "Amul Milk & Cream");
    }
}
