use colored::*;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    ListItem,
    Paragraph,
}

/// One display unit of a summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderBlock {
    pub kind: BlockKind,
    pub text: String,
}

impl RenderBlock {
    pub fn list_item(text: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::ListItem,
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::Paragraph,
            text: text.into(),
        }
    }
}

/// Split summary text into blocks, one per non-blank line, in order.
/// Lines starting with `- ` or `* ` become list items without the marker.
pub fn render(summary: &str) -> Vec<RenderBlock> {
    summary
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| match line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
            Some(item) => RenderBlock::list_item(item),
            None => RenderBlock::paragraph(line),
        })
        .collect()
}

/// Terminal presentation of rendered blocks
pub struct SummaryView {
    heading: String,
}

impl SummaryView {
    pub fn new() -> Self {
        Self {
            heading: "Your Professional Summary:".to_string(),
        }
    }

    pub fn format(&self, blocks: &[RenderBlock]) -> String {
        let mut out = String::new();
        out.push_str(&format!("\n{}\n\n", self.heading.bright_cyan().bold()));
        for block in blocks {
            match block.kind {
                BlockKind::ListItem => {
                    out.push_str(&format!("  {} {}\n", "•".bright_blue(), block.text));
                }
                BlockKind::Paragraph => {
                    out.push_str(&format!("{}\n", block.text));
                }
            }
        }
        out.push_str(&format!(
            "\n{}\n",
            "Review this summary and adjust it if needed before using it.".dimmed()
        ));
        out
    }

    pub fn format_error(&self, message: &str) -> String {
        format!("{} {}", "Oops! Something went wrong:".red().bold(), message.red())
    }
}

impl Default for SummaryView {
    fn default() -> Self {
        Self::new()
    }
}
