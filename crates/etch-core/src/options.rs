//! Configuration options for the Markdown codec

/// Options for Markdown serialization
#[derive(Debug, Clone)]
pub struct MarkdownOptions {
    /// Marker for bullet and check list items
    pub bullet_list_marker: char,

    /// Fence string for code blocks
    pub fence: String,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            bullet_list_marker: '-',
            fence: "```".to_string(),
        }
    }
}
