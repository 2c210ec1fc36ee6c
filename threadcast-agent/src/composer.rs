//! Deterministic thread layout.
//!
//! Output is `[header, bullet..., link]`, or the single "no valid bullet
//! points" chunk when every bullet is blank. Every chunk, the header included,
//! is capped at [`MAX_CHUNK_CHARS`] Unicode scalar values.

pub const MAX_CHUNK_CHARS: usize = 280;
pub const ELLIPSIS: &str = "...";
pub const UNKNOWN_TITLE: &str = "[Unknown Title]";
pub const NO_BULLETS_CHUNK: &str = "🧵 No valid bullet points extracted.";

pub fn compose_thread<S: AsRef<str>>(title: &str, url: &str, bullets: &[S]) -> Vec<String> {
    let clean: Vec<&str> = bullets
        .iter()
        .map(|b| b.as_ref().trim())
        .filter(|b| !b.is_empty())
        .collect();
    if clean.is_empty() {
        return vec![NO_BULLETS_CHUNK.to_string()];
    }

    let title = match title.trim() {
        "" => UNKNOWN_TITLE,
        t => t,
    };

    let mut chunks = Vec::with_capacity(clean.len() + 2);
    chunks.push(fit_chunk(format!(
        "🧵 Summary of: {title}\n\nHere are the key takeaways:"
    )));
    chunks.extend(clean.into_iter().map(|b| fit_chunk(b.to_string())));
    chunks.push(fit_chunk(format!(
        "📖 Read full article here:\n{}",
        url.trim()
    )));
    chunks
}

/// Cut to `MAX_CHUNK_CHARS - 3` characters and append `...` when too long.
pub fn fit_chunk(text: String) -> String {
    if text.chars().count() <= MAX_CHUNK_CHARS {
        return text;
    }
    let keep = MAX_CHUNK_CHARS - ELLIPSIS.len();
    let mut cut: String = text.chars().take(keep).collect();
    cut.push_str(ELLIPSIS);
    cut
}
