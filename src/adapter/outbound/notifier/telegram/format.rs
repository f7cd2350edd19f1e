//! Message formatting for Telegram (`MarkdownV2`).

use chrono::{DateTime, Utc};

use crate::domain::{Observation, Product, ProductUrl, StockStatus};
use crate::port::StatusChange;

const NAME_DISPLAY_LIMIT: usize = 40;

/// Alert sent to a subscriber when a product changes status.
pub fn format_change_message(change: &StatusChange) -> String {
    let product = &change.product;
    let title = match change.new_status {
        StockStatus::InStock => "🟢 *Back in Stock\\!*",
        StockStatus::OutOfStock => "🔴 *Out of Stock\\!*",
        StockStatus::Unknown => "⚪ *Status Unknown*",
    };

    let mut msg = format!(
        "{title}\n\
        \n\
        📦 {}\n\
        📊 Status: {}\n\
        ⏮️ Previous: {}\n\
        🔗 {}",
        escape_markdown(&product.name),
        escape_markdown(change.new_status.label()),
        escape_markdown(change.old_status.label()),
        link("View product", product.url.as_str()),
    );
    if let Some(image) = &product.image_url {
        msg.push_str(&format!("\n🖼️ {}", link("Image", image)));
    }
    if change.is_restock() {
        msg.push_str(&format!("\n\n🛒 {}", link("Buy Now", product.url.as_str())));
    }
    msg
}

/// Card for a single stored product.
pub fn format_product_card(title: &str, product: &Product) -> String {
    format!(
        "{}\n\
        \n\
        📦 {}\n\
        📊 Status: {}\n\
        🕒 Last checked: {}\n\
        🔗 {}",
        title,
        escape_markdown(&product.name),
        escape_markdown(product.status.label()),
        escape_markdown(&format_checked(product.last_checked)),
        link("View product", product.url.as_str()),
    )
}

/// Result of a one-off status check.
pub fn format_observation(url: &ProductUrl, observation: &Observation) -> String {
    let name = if observation.name.is_empty() {
        crate::domain::UNKNOWN_PRODUCT_NAME
    } else {
        &observation.name
    };
    format!(
        "🔎 *Stock Status*\n\
        \n\
        📦 {}\n\
        📊 Status: {}\n\
        🔗 {}",
        escape_markdown(name),
        escape_markdown(observation.status.label()),
        link("View product", url.as_str()),
    )
}

/// Numbered list of a user's products.
pub fn format_product_list(products: &[Product]) -> String {
    if products.is_empty() {
        return format!(
            "📭 *Your Tracked Products*\n\n{}",
            escape_markdown("No products being tracked.\nUse /track <url> to add a product.")
        );
    }

    let mut msg = String::from("📋 *Your Tracked Products*\n\n");
    for (i, product) in products.iter().enumerate() {
        let name = truncate(&product.name, NAME_DISPLAY_LIMIT);
        msg.push_str(&format!(
            "{}\\. {} {}\n",
            i + 1,
            product.status.icon(),
            link(&name, product.url.as_str())
        ));
    }
    msg.push_str(&format!(
        "\nTracking *{}* product\\(s\\)",
        products.len()
    ));
    msg
}

fn format_checked(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(
        || "never".to_string(),
        |t| t.format("%Y-%m-%d %H:%M UTC").to_string(),
    )
}

/// Inline link with the text escaped for `MarkdownV2`.
pub fn link(text: &str, url: &str) -> String {
    format!("[{}]({})", escape_markdown(text), escape_link_url(url))
}

/// Escape special characters for Telegram `MarkdownV2`.
pub fn escape_markdown(text: &str) -> String {
    let special_chars = [
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
        '\\',
    ];
    let mut result = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        if special_chars.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }

    result
}

/// Inside the `(...)` part of a link only `)` and `\` need escaping.
fn escape_link_url(url: &str) -> String {
    url.replace('\\', "\\\\").replace(')', "\\)")
}

/// Truncate a string with ellipsis (Unicode-safe).
pub fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(status: StockStatus) -> Product {
        let observation =
            Observation::new(status, "Amul Lassi (200ml)").with_image("https://cdn.example/l.png");
        Product::from_observation(
            ProductUrl::from_stored("https://shop.amul.com/en/product/amul-lassi"),
            &observation,
            Utc::now(),
        )
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("hello"), "hello");
        assert_eq!(escape_markdown("hello_world"), "hello\\_world");
        assert_eq!(escape_markdown("*bold*"), "\\*bold\\*");
        assert_eq!(escape_markdown("shop.amul.com"), "shop\\.amul\\.com");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hello...");
        assert_eq!(truncate("日本語テスト", 3), "日本語...");
    }

    #[test]
    fn restock_message_has_buy_link() {
        let change = StatusChange {
            product: product(StockStatus::InStock),
            old_status: StockStatus::OutOfStock,
            new_status: StockStatus::InStock,
        };
        let msg = format_change_message(&change);

        assert!(msg.starts_with("🟢 *Back in Stock\\!*"));
        assert!(msg.contains("Amul Lassi \\(200ml\\)"));
        assert!(msg.contains("Previous: ❌ Out of Stock"));
        assert!(msg.contains("[Buy Now](https://shop.amul.com/en/product/amul-lassi)"));
        assert!(msg.contains("[Image](https://cdn.example/l.png)"));
    }

    #[test]
    fn sold_out_message_has_no_buy_link() {
        let change = StatusChange {
            product: product(StockStatus::OutOfStock),
            old_status: StockStatus::InStock,
            new_status: StockStatus::OutOfStock,
        };
        let msg = format_change_message(&change);

        assert!(msg.starts_with("🔴 *Out of Stock\\!*"));
        assert!(!msg.contains("Buy Now"));
    }

    #[test]
    fn unknown_message_title() {
        let change = StatusChange {
            product: product(StockStatus::Unknown),
            old_status: StockStatus::InStock,
            new_status: StockStatus::Unknown,
        };
        assert!(format_change_message(&change).starts_with("⚪ *Status Unknown*"));
    }

    #[test]
    fn list_counts_products() {
        let msg = format_product_list(&[product(StockStatus::InStock)]);
        assert!(msg.contains("1\\. 🟢 [Amul Lassi \\(200ml\\)]"));
        assert!(msg.contains("Tracking *1* product\\(s\\)"));
    }

    #[test]
    fn empty_list_explains_how_to_track() {
        let msg = format_product_list(&[]);
        assert!(msg.contains("No products being tracked\\."));
        assert!(msg.contains("/track <url\\>"));
    }

    #[test]
    fn link_url_escapes_closing_paren() {
        assert_eq!(link("a", "https://x/(y)"), "[a](https://x/(y\\))");
    }
}
