use crate::types::Category;
use once_cell::sync::Lazy;

pub struct CategoryStyle {
    pub background: &'static str,
    pub foreground: &'static str,
}

pub fn category_style(category: &Category) -> CategoryStyle {
    match category {
        Category::Fitness => CategoryStyle {
            background: "rgba(59, 130, 246, 0.2)",
            foreground: "#3b82f6",
        },
        Category::Health => CategoryStyle {
            background: "rgba(34, 197, 94, 0.2)",
            foreground: "#22c55e",
        },
        Category::Habit => CategoryStyle {
            background: "rgba(168, 85, 247, 0.2)",
            foreground: "#a855f7",
        },
        Category::Productivity => CategoryStyle {
            background: "rgba(249, 115, 22, 0.2)",
            foreground: "#f97316",
        },
        Category::General | Category::Other(_) => CategoryStyle {
            background: "rgba(107, 114, 128, 0.2)",
            foreground: "#6b7280",
        },
    }
}

pub fn category_badge_style(category: &Category) -> String {
    let style = category_style(category);
    format!(
        "background: {}; color: {};",
        style.background, style.foreground
    )
}

/// Colour tokens consumed by `assets/main.css`.
pub static THEME_CSS: Lazy<String> = Lazy::new(|| {
    let mut css = String::from(BASE_TOKENS);
    for category in Category::KNOWN.iter() {
        let style = category_style(category);
        css.push_str(&format!(
            ".badge-{name} {{ background: {bg}; color: {fg}; }}\n",
            name = category.as_str(),
            bg = style.background,
            fg = style.foreground,
        ));
    }
    css
});

const BASE_TOKENS: &str = r#"
:root {
    --color-bg-primary: #0b0b0c;
    --color-bg-card: #151517;
    --color-bg-overlay: rgba(0, 0, 0, 0.5);
    --color-text-primary: #f5f5f5;
    --color-text-muted: #9b9b9b;
    --color-border: #2a2a2a;
    --color-accent: #3b82f6;
    --color-accent-text: #ffffff;
    --color-muted: #222225;
    --color-success: #22c55e;
    --color-destructive: #ef4444;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_categories_share_general_colours() {
        let other = category_badge_style(&Category::Other("lernen".into()));
        assert_eq!(other, category_badge_style(&Category::General));
    }

    #[test]
    fn theme_css_has_badge_per_known_category() {
        for name in ["fitness", "health", "habit", "productivity", "general"] {
            assert!(THEME_CSS.contains(&format!(".badge-{name}")));
        }
    }
}
