//! Open Graph / Twitter meta tags for a generated preview.
//!
//! Values are interpolated as-is. A title containing `"` or `<` produces
//! broken markup; callers that embed the text in a page must escape it
//! themselves.

/// Renders the fixed five-tag block, one tag per line.
pub fn render_meta_tags(title: &str, content: &str, image_url: &str) -> String {
    format!(
        concat!(
            "<meta property=\"og:title\" content=\"{title}\" />\n",
            "<meta property=\"og:description\" content=\"{content}\" />\n",
            "<meta property=\"og:image\" content=\"{image}\" />\n",
            "<meta property=\"og:type\" content=\"website\" />\n",
            "<meta name=\"twitter:card\" content=\"summary_large_image\" />"
        ),
        title = title,
        content = content,
        image = image_url,
    )
}
