//! Size limits of the Bot API and splitting of long replies.

/// Telegram message size limit.
pub const TELEGRAM_MAX_MESSAGE_LEN: usize = 4096;

/// Telegram caption size limit for photos.
pub const TELEGRAM_CAPTION_LIMIT: usize = 1024;

#[must_use]
pub fn truncate_at_char_boundary(text: &str, max_len: usize) -> &str {
    &text[..text.floor_char_boundary(max_len)]
}

/// Split `text` into pieces of at most `max_len` bytes.
///
/// Prefers a paragraph break, then a line break, then a space; only cuts
/// inside a word when the window has none of those.
#[must_use]
pub fn chunk_message(text: &str, max_len: usize) -> Vec<String> {
    if max_len == 0 || text.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut remaining = text;

    while remaining.len() > max_len {
        let window_end = match remaining.floor_char_boundary(max_len) {
            0 => remaining.chars().next().map_or(remaining.len(), char::len_utf8),
            n => n,
        };
        let window = &remaining[..window_end];

        let (cut, skip) = ["\n\n", "\n", " "]
            .iter()
            .find_map(|sep| {
                window
                    .rfind(sep)
                    .filter(|&at| at > 0)
                    .map(|at| (at, sep.len()))
            })
            .unwrap_or((window_end, 0));

        chunks.push(remaining[..cut].to_string());
        remaining = &remaining[cut + skip..];
    }

    if !remaining.is_empty() {
        chunks.push(remaining.to_string());
    }
    chunks
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(chunk_message("hola", 100), ["hola"]);
        assert!(chunk_message("", 100).is_empty());
    }

    #[test]
    fn splits_at_line_breaks_first() {
        let chunks = chunk_message("linea1 a\nlinea2\nlinea3", 10);
        assert_eq!(chunks, ["linea1 a", "linea2", "linea3"]);
    }

    #[test]
    fn prefers_paragraph_breaks() {
        let chunks = chunk_message("uno\ndos\n\ntres cuatro", 12);
        assert_eq!(chunks, ["uno\ndos", "tres cuatro"]);
    }

    #[test]
    fn falls_back_to_spaces_then_hard_cuts() {
        assert_eq!(chunk_message("hello world foo bar", 10), [
            "hello",
            "world foo",
            "bar"
        ]);
        assert_eq!(chunk_message("abcdefghij", 4), ["abcd", "efgh", "ij"]);
    }

    #[test]
    fn long_fact_list_fits_telegram_limit() {
        let text = (0..600)
            .map(|i| format!("• `{i}` · Hecho número {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let chunks = chunk_message(&text, TELEGRAM_MAX_MESSAGE_LEN);

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.len() <= TELEGRAM_MAX_MESSAGE_LEN));
        assert_eq!(chunks.join("\n"), text);
    }

    #[test]
    fn respects_utf8_boundaries() {
        let text = format!("{}лz", "a".repeat(4095));
        let chunks = chunk_message(&text, 4096);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 4095);
        assert_eq!(chunks[1], "лz");

        let truncated = truncate_at_char_boundary(&text, 4096);
        assert_eq!(truncated.len(), 4095);
    }
}
