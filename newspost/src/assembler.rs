/// Telegram's limit on a single message, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 4096;

const ELLIPSIS: &str = "...";

/// Build the final post: bold title, meta description, body, separated by blank lines.
///
/// When the result is longer than [`MAX_MESSAGE_LENGTH`] characters it is cut to
/// `MAX_MESSAGE_LENGTH - 3` characters, right-trimmed, and terminated with `"..."`.
/// The cut may land mid-word or inside markup.
pub fn assemble(title: &str, meta_description: &str, post_content: &str) -> String {
    let full_text = format!("*{title}*\n\n{meta_description}\n\n{post_content}");
    truncate_message(full_text, MAX_MESSAGE_LENGTH)
}

/// Ellipsis truncation counted in chars, never splitting a code point.
pub fn truncate_message(text: String, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text;
    }

    let keep = max_len.saturating_sub(ELLIPSIS.len());
    let end = text
        .char_indices()
        .nth(keep)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());

    let mut truncated = text[..end].trim_end().to_string();
    truncated.push_str(ELLIPSIS);
    truncated
}
