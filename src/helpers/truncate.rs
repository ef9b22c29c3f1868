/// Cuts `message` down to at most `max_chars` characters, never splitting a
/// UTF-8 code point.
pub fn truncate_message(message: &str, max_chars: usize) -> String {
    match message.char_indices().nth(max_chars) {
        Some((byte_index, _)) => message[..byte_index].to_string(),
        None => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::truncate_message;

    #[test]
    fn short_messages_are_untouched() {
        assert_eq!(truncate_message("timeout", 50), "timeout");
        assert_eq!(truncate_message("", 50), "");
    }

    #[test]
    fn long_messages_are_cut_on_char_boundaries() {
        assert_eq!(truncate_message("abcdef", 3), "abc");
        assert_eq!(truncate_message("ééééé", 2), "éé");
    }
}
