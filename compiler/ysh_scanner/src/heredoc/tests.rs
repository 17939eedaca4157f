use super::*;
use crate::state::DELIMITER_CAPACITY;
use pretty_assertions::assert_eq;
use ysh_lexer_core::TextCursor;

fn open(delimiter: &str, strip_leading_tabs: bool) -> ScannerState {
    let mut d = Delimiter::new();
    for c in delimiter.chars() {
        d.push(c, DELIMITER_CAPACITY);
    }
    let mut state = ScannerState::default();
    state.open_heredoc(d, strip_leading_tabs);
    state
}

/// Helper: drive `scan_body` the way a host would, from byte `start`,
/// until it declines or the heredoc closes.
fn body_tokens<'a>(
    state: &mut ScannerState,
    source: &'a str,
    start: usize,
) -> Vec<(TokenKind, &'a str)> {
    let mut cursor = TextCursor::at(source, start);
    let mut tokens = Vec::new();
    while let Some(kind) = scan_body(state, &mut cursor) {
        let span = cursor.finish_token();
        tokens.push((kind, cursor.slice(span)));
        if kind == TokenKind::HeredocEnd {
            break;
        }
    }
    tokens
}

/// Helper: run `scan_start` on `source`, returning the token text on success.
fn start<'a>(state: &mut ScannerState, source: &'a str, max_len: usize) -> Option<(&'a str, usize)> {
    let mut cursor = TextCursor::new(source);
    if scan_start(state, &mut cursor, max_len) {
        let span = cursor.finish_token();
        Some((cursor.slice(span), cursor.pos()))
    } else {
        None
    }
}

// === Start Delimiter ===

#[test]
fn bare_word_delimiter() {
    let mut state = ScannerState::default();
    assert_eq!(start(&mut state, "EOF\n", DELIMITER_CAPACITY), Some(("EOF", 3)));
    assert!(state.heredoc_active);
    assert!(!state.strip_leading_tabs);
    assert_eq!(state.delimiter.as_str(), "EOF");
}

#[test]
fn dash_enables_tab_stripping() {
    let mut state = ScannerState::default();
    assert!(start(&mut state, "-END", DELIMITER_CAPACITY).is_some());
    assert!(state.strip_leading_tabs);
    assert_eq!(state.delimiter.as_str(), "END");
}

#[test]
fn whitespace_before_delimiter_is_skipped() {
    let mut state = ScannerState::default();
    assert_eq!(start(&mut state, "  \tEOF", DELIMITER_CAPACITY), Some(("EOF", 6)));
}

#[test]
fn word_stops_at_non_word_char() {
    let mut state = ScannerState::default();
    assert_eq!(start(&mut state, "EOF_2-x", DELIMITER_CAPACITY), Some(("EOF_2", 5)));
    assert_eq!(state.delimiter.as_str(), "EOF_2");
}

#[test]
fn single_quoted_delimiter_is_verbatim() {
    let mut state = ScannerState::default();
    assert!(start(&mut state, "'my end' rest", DELIMITER_CAPACITY).is_some());
    assert_eq!(state.delimiter.as_str(), "my end");
}

#[test]
fn double_quoted_delimiter_is_not_unescaped() {
    let mut state = ScannerState::default();
    assert!(start(&mut state, r#""E\$F""#, DELIMITER_CAPACITY).is_some());
    assert_eq!(state.delimiter.as_str(), r"E\$F");
}

#[test]
fn unterminated_quoted_delimiter_takes_rest() {
    let mut state = ScannerState::default();
    assert!(start(&mut state, "'EOF", DELIMITER_CAPACITY).is_some());
    assert_eq!(state.delimiter.as_str(), "EOF");
}

#[test]
fn backslash_delimiter_drops_backslash() {
    let mut state = ScannerState::default();
    assert_eq!(start(&mut state, "\\EOF", DELIMITER_CAPACITY), Some(("\\EOF", 4)));
    assert_eq!(state.delimiter.as_str(), "EOF");
}

#[test]
fn empty_delimiters_decline_without_mutation() {
    for source in ["''", "\"\"", "", "-", "- \n", "\\", "$x"] {
        let mut state = ScannerState::default();
        assert_eq!(start(&mut state, source, DELIMITER_CAPACITY), None, "{source:?}");
        assert_eq!(state, ScannerState::default(), "{source:?}");
    }
}

#[test]
fn decline_keeps_previous_heredoc_state() {
    let mut state = open("OLD", true);
    state.close_heredoc();
    let before = state.clone();
    assert_eq!(start(&mut state, "''", DELIMITER_CAPACITY), None);
    assert_eq!(state, before);
}

#[test]
fn long_delimiter_is_truncated_but_fully_consumed() {
    let mut state = ScannerState::default();
    assert_eq!(start(&mut state, "LONGWORD\n", 3), Some(("LONGWORD", 8)));
    assert_eq!(state.delimiter.as_str(), "LON");
}

#[test]
fn truncation_keeps_a_prefix_of_the_word() {
    let mut state = ScannerState::default();
    assert_eq!(start(&mut state, "'aéb'\n", 2), Some(("'aéb'", 6)));
    assert_eq!(state.delimiter.as_str(), "a");

    let tokens = body_tokens(&mut state, "ab\n", 0);
    assert_eq!(tokens, vec![(TokenKind::HeredocBody, "ab\n")]);
    assert!(state.heredoc_active);
}

// === Body ===

#[test]
fn body_then_end() {
    let mut state = open("EOF", false);
    let tokens = body_tokens(&mut state, "line1\nline2\nEOF\n", 0);
    assert_eq!(
        tokens,
        vec![
            (TokenKind::HeredocBody, "line1\nline2\n"),
            (TokenKind::HeredocEnd, "EOF"),
        ]
    );
    assert!(!state.heredoc_active);
}

#[test]
fn immediate_delimiter_emits_only_end() {
    let mut state = open("EOF", false);
    let tokens = body_tokens(&mut state, "EOF\nafter", 0);
    assert_eq!(tokens, vec![(TokenKind::HeredocEnd, "EOF")]);
}

#[test]
fn delimiter_at_end_of_input_closes() {
    let mut state = open("EOF", false);
    let tokens = body_tokens(&mut state, "x\nEOF", 0);
    assert_eq!(
        tokens,
        vec![(TokenKind::HeredocBody, "x\n"), (TokenKind::HeredocEnd, "EOF")]
    );
}

#[test]
fn strip_mode_excludes_leading_tabs_from_end() {
    let mut state = open("EOF", true);
    let mut cursor = TextCursor::new("\t\tEOF\n");
    assert_eq!(scan_body(&mut state, &mut cursor), Some(TokenKind::HeredocEnd));
    let span = cursor.finish_token();
    assert_eq!(cursor.slice(span), "EOF");
    assert_eq!(span.start, 2);
    assert!(!state.heredoc_active);
}

#[test]
fn strip_mode_body_then_indented_end() {
    let mut state = open("EOF", true);
    let tokens = body_tokens(&mut state, "\thello\n\tEOF\n", 0);
    assert_eq!(
        tokens,
        vec![(TokenKind::HeredocBody, "hello\n"), (TokenKind::HeredocEnd, "EOF")]
    );
}

#[test]
fn without_strip_mode_indented_delimiter_is_body() {
    let mut state = open("EOF", false);
    let tokens = body_tokens(&mut state, "\tEOF\nEOF\n", 0);
    assert_eq!(
        tokens,
        vec![(TokenKind::HeredocBody, "\tEOF\n"), (TokenKind::HeredocEnd, "EOF")]
    );
}

#[test]
fn leading_space_does_not_close() {
    let mut state = open("EOF", false);
    let tokens = body_tokens(&mut state, " EOFX\nEOF\n", 0);
    assert_eq!(
        tokens,
        vec![(TokenKind::HeredocBody, " EOFX\n"), (TokenKind::HeredocEnd, "EOF")]
    );
}

#[test]
fn delimiter_prefix_does_not_close() {
    let mut state = open("EOF", false);
    let tokens = body_tokens(&mut state, "EOFX\nEOF", 0);
    assert_eq!(
        tokens,
        vec![(TokenKind::HeredocBody, "EOFX\n"), (TokenKind::HeredocEnd, "EOF")]
    );
}

#[test]
fn delimiter_mid_line_does_not_close() {
    let mut state = open("EOF", false);
    let tokens = body_tokens(&mut state, "say EOF\nEOF\n", 0);
    assert_eq!(tokens[0], (TokenKind::HeredocBody, "say EOF\n"));
}

#[test]
fn crlf_line_endings() {
    let mut state = open("EOF", false);
    let tokens = body_tokens(&mut state, "a\r\nEOF\r\n", 0);
    assert_eq!(
        tokens,
        vec![(TokenKind::HeredocBody, "a\r\n"), (TokenKind::HeredocEnd, "EOF")]
    );
}

#[test]
fn body_starting_mid_line_includes_rest_of_line() {
    let source = "cat <<EOF\nhi\nEOF\n";
    let mut state = open("EOF", false);
    let tokens = body_tokens(&mut state, source, 9);
    assert_eq!(
        tokens,
        vec![(TokenKind::HeredocBody, "\nhi\n"), (TokenKind::HeredocEnd, "EOF")]
    );
}

#[test]
fn unterminated_heredoc_stays_open() {
    let mut state = open("EOF", false);
    let tokens = body_tokens(&mut state, "abc\nEO", 0);
    assert_eq!(tokens, vec![(TokenKind::HeredocBody, "abc\nEO")]);
    assert!(state.heredoc_active);
}

#[test]
fn empty_input_declines() {
    let mut state = open("EOF", false);
    assert_eq!(body_tokens(&mut state, "", 0), vec![]);
    assert!(state.heredoc_active);
}

#[test]
fn inactive_heredoc_declines() {
    let mut state = ScannerState::default();
    let mut cursor = TextCursor::new("EOF\n");
    assert_eq!(scan_body(&mut state, &mut cursor), None);
    assert_eq!(cursor.pos(), 0);
}

#[test]
fn multibyte_delimiter() {
    let mut state = open("ÉND", false);
    let tokens = body_tokens(&mut state, "ça va\nÉND\n", 0);
    assert_eq!(
        tokens,
        vec![(TokenKind::HeredocBody, "ça va\n"), (TokenKind::HeredocEnd, "ÉND")]
    );
}
