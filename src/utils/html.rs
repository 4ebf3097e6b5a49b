use std::collections::HashSet;

use ammonia::Builder;

/// Strips every HTML tag from a respondent-supplied display value.
///
/// Names are shown verbatim in the analytics table and detail heading, so no
/// markup is allowed through at all. Text content between tags is kept;
/// `<script>` and `<style>` bodies are dropped entirely. The result is plain
/// text: characters ammonia escapes on output are turned back into themselves.
pub fn strip_html(input: &str) -> String {
    let mut builder = Builder::empty();
    builder.clean_content_tags(HashSet::from(["script", "style"]));
    let cleaned = builder.clean(input).to_string();
    unescape_text(&cleaned).trim().to_string()
}

/// `&amp;` goes last so an escaped entity such as `&amp;lt;` stays `&lt;`.
fn unescape_text(escaped: &str) -> String {
    escaped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
