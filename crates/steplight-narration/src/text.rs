//! Narration text preparation.
//!
//! Explanations arrive as markdown with inline TeX. Before they reach the
//! audio channel they are flattened into plain spoken text:
//!
//! - Fenced code blocks → "Code omitted."
//! - Headings, blockquotes, list markers, horizontal rules → text only
//! - Links \[text\](url) → text
//! - Bold / strikethrough / inline code markers → removed
//! - TeX delimiters (`$`, `$$`, `\(`, `\)`, `\[`, `\]`) → removed
//! - Common TeX commands → words (`\frac{a}{b}` → "a over b", `x^2` → "x squared")

use steplight_core::NarrationSettings;

/// Longest explanation, in characters, that is flattened for speech.
/// Anything past it is dropped before any parsing happens.
pub const MAX_SOURCE_CHARS: usize = 100_000;

/// Nesting depth past which TeX groups are read out as plain text.
const MAX_TEX_DEPTH: usize = 16;

/// Prepare explanation text for the audio channel according to settings.
pub fn prepare_narration(text: &str, settings: &NarrationSettings) -> String {
    let text = cap_chars(text, MAX_SOURCE_CHARS);
    let spoken = if settings.strip_markup {
        strip_markup(text)
    } else {
        collapse_whitespace(text)
    };

    match settings.max_chars {
        Some(max) => truncate_at_word(&spoken, max),
        None => spoken,
    }
}

/// Flatten markdown and TeX into plain spoken text.
pub fn strip_markup(text: &str) -> String {
    let mut flattened = String::with_capacity(text.len());
    let mut in_fence = false;

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            if !in_fence {
                flattened.push_str(" Code omitted. ");
            }
            in_fence = !in_fence;
            continue;
        }
        if in_fence || is_horizontal_rule(trimmed) {
            continue;
        }

        let line = strip_line_prefix(trimmed);
        let line = strip_links(line);
        let line = line.replace("**", "").replace("__", "").replace("~~", "").replace('`', "");

        flattened.push(' ');
        flattened.push_str(&line);
    }

    collapse_whitespace(&speak_tex(&flattened))
}

/// Cut `text` to at most `max_chars` characters, backing up to the last
/// whitespace so words are never split.
pub fn truncate_at_word(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut = text
        .char_indices()
        .nth(max_chars)
        .map_or(text.len(), |(byte, _)| byte);
    let head = &text[..cut];
    let head = head.rfind(char::is_whitespace).map_or(head, |ws| &head[..ws]);
    head.trim_end().to_string()
}

fn cap_chars(text: &str, max_chars: usize) -> &str {
    text.char_indices()
        .nth(max_chars)
        .map_or(text, |(byte, _)| &text[..byte])
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_horizontal_rule(line: &str) -> bool {
    let chars: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    chars.len() >= 3
        && matches!(chars[0], '-' | '*' | '_')
        && chars.iter().all(|&c| c == chars[0])
}

/// Strip blockquote, heading, and list markers.
fn strip_line_prefix(line: &str) -> &str {
    let mut s = line;
    while let Some(rest) = s.strip_prefix('>') {
        s = rest.trim_start();
    }
    if s.starts_with('#') {
        s = s.trim_start_matches('#').trim_start();
    }
    if let Some(rest) = s
        .strip_prefix("- ")
        .or_else(|| s.strip_prefix("* "))
        .or_else(|| s.strip_prefix("+ "))
    {
        return rest;
    }
    let digits = s.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let after = &s[digits..];
        if let Some(rest) = after.strip_prefix(". ").or_else(|| after.strip_prefix(") ")) {
            return rest;
        }
    }
    s
}

fn strip_links(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        // `\[` opens display math, not a link.
        if c == '[' && !result.ends_with('\\') {
            let mut label = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == ']' {
                    closed = true;
                    break;
                }
                label.push(c);
            }

            if closed && chars.peek() == Some(&'(') {
                chars.next();
                chars.by_ref().take_while(|&c| c != ')').for_each(drop);
                result.push_str(&label);
            } else {
                result.push('[');
                result.push_str(&label);
                if closed {
                    result.push(']');
                }
            }
        } else {
            result.push(c);
        }
    }

    result
}

/// Spoken form of a TeX command, when it has one.
fn tex_word(name: &str) -> Option<&'static str> {
    let word = match name {
        "cdot" | "times" | "ast" => "times",
        "div" => "divided by",
        "pm" => "plus or minus",
        "mp" => "minus or plus",
        "le" | "leq" => "is less than or equal to",
        "ge" | "geq" => "is greater than or equal to",
        "lt" => "is less than",
        "gt" => "is greater than",
        "ne" | "neq" => "is not equal to",
        "approx" => "is approximately",
        "infty" => "infinity",
        "to" | "rightarrow" | "Rightarrow" | "implies" => "gives",
        "pi" => "pi",
        "theta" => "theta",
        "alpha" => "alpha",
        "beta" => "beta",
        "Delta" | "delta" => "delta",
        "sin" => "sine",
        "cos" => "cosine",
        "tan" => "tangent",
        "log" | "ln" => "log",
        "left" | "right" | "text" | "mathrm" | "mathbf" | "quad" | "qquad" => "",
        _ => return None,
    };
    Some(word)
}

/// Take one `{...}` group (or a single character) from the stream.
fn take_group(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
    if chars.peek() != Some(&'{') {
        return chars.next().map(String::from).unwrap_or_default();
    }
    chars.next();

    let mut depth = 1usize;
    let mut group = String::new();
    for c in chars.by_ref() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
        group.push(c);
    }
    group
}

fn speak_tex(text: &str) -> String {
    speak_tex_at(text, 0)
}

/// Groups nested deeper than [`MAX_TEX_DEPTH`] are flattened without
/// interpretation, which bounds the recursion.
fn speak_tex_at(text: &str, depth: usize) -> String {
    if depth >= MAX_TEX_DEPTH {
        return flatten_tex(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '$' | '{' | '}' => out.push(' '),
            '\\' => {
                let mut name = String::new();
                while let Some(&next) = chars.peek() {
                    if !next.is_ascii_alphabetic() {
                        break;
                    }
                    name.push(next);
                    chars.next();
                }

                if name.is_empty() {
                    // Escaped delimiter or spacing: \( \) \[ \] \, \;
                    match chars.next() {
                        Some('(' | ')' | '[' | ']' | ',' | ';' | '!') | None => out.push(' '),
                        Some(other) => out.push(other),
                    }
                    continue;
                }

                match name.as_str() {
                    "frac" | "dfrac" | "tfrac" => {
                        let numerator = speak_tex_at(&take_group(&mut chars), depth + 1);
                        let denominator = speak_tex_at(&take_group(&mut chars), depth + 1);
                        out.push_str(&format!(" {numerator} over {denominator} "));
                    }
                    "sqrt" => {
                        let radicand = speak_tex_at(&take_group(&mut chars), depth + 1);
                        out.push_str(&format!(" the square root of {radicand} "));
                    }
                    other => {
                        out.push(' ');
                        out.push_str(tex_word(other).unwrap_or(other));
                        out.push(' ');
                    }
                }
            }
            '^' => {
                let exponent = speak_tex_at(&take_group(&mut chars), depth + 1);
                match exponent.trim() {
                    "2" => out.push_str(" squared "),
                    "3" => out.push_str(" cubed "),
                    power => out.push_str(&format!(" to the power of {power} ")),
                }
            }
            _ => out.push(c),
        }
    }

    out
}

fn flatten_tex(text: &str) -> String {
    text.chars()
        .map(|c| if matches!(c, '\\' | '{' | '}' | '$' | '^') { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markdown_structure() {
        let text = "## Why\n> **Divide** both sides\n- by [two](https://x.y)\n---\n1. done";
        assert_eq!(strip_markup(text), "Why Divide both sides by two done");
    }

    #[test]
    fn replaces_code_fences() {
        let text = "Run this:\n```python\nprint(1)\n```\nThen check.";
        assert_eq!(strip_markup(text), "Run this: Code omitted. Then check.");
    }

    #[test]
    fn speaks_fractions_roots_and_powers() {
        assert_eq!(strip_markup(r"$\frac{x}{2} = 3$"), "x over 2 = 3");
        assert_eq!(strip_markup(r"\(\sqrt{16}\)"), "the square root of 16");
        assert_eq!(strip_markup("x^2 + y^{10}"), "x squared + y to the power of 10");
        assert_eq!(strip_markup(r"\[ a \cdot b \le c \]"), "a times b is less than or equal to c");
    }

    #[test]
    fn display_math_is_not_mistaken_for_a_link() {
        assert_eq!(strip_markup(r"\[x\](note)"), "x (note)");
    }

    #[test]
    fn deep_nesting_is_flattened_past_the_depth_limit() {
        let depth = 20_000;
        let text = format!("{}x{}", r"\sqrt{".repeat(depth), "}".repeat(depth));

        let spoken = strip_markup(&text);

        assert_eq!(spoken.matches("the square root of").count(), MAX_TEX_DEPTH);
        assert!(spoken.ends_with("sqrt x"));
    }

    #[test]
    fn oversized_input_is_capped_before_flattening() {
        let settings = NarrationSettings {
            strip_markup: true,
            max_chars: None,
        };
        let text = "a ".repeat(MAX_SOURCE_CHARS);
        let spoken = prepare_narration(&text, &settings);
        assert_eq!(spoken.split(' ').count(), MAX_SOURCE_CHARS / 2);
    }

    #[test]
    fn unclosed_brackets_are_kept_as_written() {
        assert_eq!(strip_links("see [a"), "see [a");
        assert_eq!(strip_links("[a] b"), "[a] b");
        assert_eq!(strip_markup("see [a"), "see [a");
    }

    #[test]
    fn unknown_commands_keep_their_name() {
        assert_eq!(strip_markup(r"$\sinh x$"), "sinh x");
    }

    #[test]
    fn truncation_backs_up_to_whitespace() {
        assert_eq!(truncate_at_word("one two three", 9), "one two");
        assert_eq!(truncate_at_word("short", 10), "short");
        assert_eq!(truncate_at_word("ünïcödé wörds", 9), "ünïcödé");
    }

    #[test]
    fn prepare_honours_settings() {
        let mut settings = NarrationSettings::default();
        assert_eq!(prepare_narration("**x** = 1", &settings), "x = 1");

        settings.strip_markup = false;
        settings.max_chars = None;
        assert_eq!(prepare_narration("**x**   = 1", &settings), "**x** = 1");
    }
}
