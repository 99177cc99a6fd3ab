//! Word-level helpers for map script text.
//!
//! Map scripts are tokenised by whitespace, so a constant is only "used" when it stands on its own.

use encoding_rs::WINDOWS_1252;
use regex::Regex;

/// Decode a map script. HD Edition scripts are Windows-1252, which maps every byte to a character.
pub fn decode(bytes: &[u8]) -> String {
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text.into_owned()
}

/// Encode a map script back to Windows-1252.
pub fn encode(text: &str) -> Vec<u8> {
    let (bytes, _, _) = WINDOWS_1252.encode(text);
    bytes.into_owned()
}

/// The line ending used by a script.
pub fn line_ending(text: &str) -> &'static str {
    if text.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// Check if `name` occurs as a whitespace-delimited token.
pub fn contains_token(text: &str, name: &str) -> bool {
    text.split_whitespace().any(|token| token == name)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Check if `word` occurs with a non-word character directly before and after it.
pub fn contains_word(text: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    text.match_indices(word).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + word.len()..].chars().next();
        matches!(before, Some(c) if !is_word_char(c)) && matches!(after, Some(c) if !is_word_char(c))
    })
}

/// Replace every whitespace-delimited token that equals one of `names`. Whitespace is kept as is.
pub fn replace_tokens<S: AsRef<str>>(text: &str, names: &[S], replacement: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    while !rest.is_empty() {
        let space = rest
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(rest.len());
        output.push_str(&rest[..space]);
        rest = &rest[space..];

        let token_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let token = &rest[..token_len];
        if names.iter().any(|name| name.as_ref() == token) {
            output.push_str(replacement);
        } else {
            output.push_str(token);
        }
        rest = &rest[token_len..];
    }
    output
}

/// Patterns that locate the places where lines are added to a script.
#[derive(Debug, Clone)]
pub(crate) struct Anchors {
    player_setup: Regex,
    include_drs: Regex,
}

impl Anchors {
    pub(crate) fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            player_setup: Regex::new(r"<PLAYER_SETUP>[ \t]*(\r?)\n")?,
            include_drs: Regex::new(r"#include_drs[ \t]+random_map\.def[ \t]*(\r?)\n")?,
        })
    }

    /// Add a line to the `<PLAYER_SETUP>` section, creating the section if there is none.
    ///
    /// A new section goes where `random_map.def` is included, or at the very top, in which case
    /// the include is added too.
    pub(crate) fn add_player_setup_line(&self, script: &str, line: &str) -> String {
        if self.player_setup.is_match(script) {
            let replacement = format!("<PLAYER_SETUP>${{1}}\n{}${{1}}\n", line);
            return self
                .player_setup
                .replace(script, replacement.as_str())
                .into_owned();
        }
        let eol = line_ending(script);
        if script.contains("<PLAYER_SETUP>") {
            // Marker followed by more commands on the same line.
            return script.replacen(
                "<PLAYER_SETUP>",
                &format!("<PLAYER_SETUP>{}{}{}", eol, line, eol),
                1,
            );
        }
        if self.include_drs.is_match(script) {
            let replacement = format!(
                "#include_drs random_map.def${{1}}\n<PLAYER_SETUP>${{1}}\n{}${{1}}\n",
                line
            );
            return self
                .include_drs
                .replace(script, replacement.as_str())
                .into_owned();
        }
        format!(
            "#include_drs random_map.def{eol}<PLAYER_SETUP>{eol}{line}{eol}{script}",
            eol = eol,
            line = line,
            script = script
        )
    }
}
