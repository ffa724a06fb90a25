use super::accrual::Accrual;
use crate::extract::signals::CriterionSignal;
use crate::extract::text::words;

const MAX_SENTENCES: usize = 3;
const LOCATION_WORDS: [&str; 3] = ["headline", "lede", "body"];

pub fn build_rationale(signal: &CriterionSignal, accrual: &Accrual) -> String {
    let locations = signal
        .locations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    let mut sentences = vec![format!("{} ({locations})", signal.finding)];
    if accrual.absence_waived {
        sentences.push("Its absence is not held against this type of article".to_string());
    }
    if accrual.harm_applied {
        sentences.push(
            "Misleading or harmful content is penalized whatever the article type".to_string(),
        );
    }
    sanitize_rationale(&format!("{}.", sentences.join(". ")))
}

pub fn cites_location(rationale: &str) -> bool {
    let lower = rationale.to_lowercase();
    let tokens = words(&lower).collect::<Vec<_>>();
    tokens.iter().enumerate().any(|(position, token)| {
        LOCATION_WORDS.contains(token)
            || (*token == "para"
                && tokens
                    .get(position + 1)
                    .is_some_and(|number| number.chars().all(|ch| ch.is_ascii_digit())))
    })
}

pub fn sanitize_rationale(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let stripped = remove_matches(text, |rest| {
        assignment(rest, "intent")
            .or_else(|| assignment(rest, "need"))
            .or_else(|| start_five(rest))
            .or_else(|| final_mark(rest))
            .or_else(|| step_marker(rest, "+a"))
            .or_else(|| step_marker(rest, "-b"))
    });

    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    let normalized = collapsed
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("; ");
    let trimmed = normalized.trim_matches(|ch: char| matches!(ch, ' ' | ';' | ':' | ','));

    crate::extract::text::split_sentences(trimmed)
        .into_iter()
        .take(MAX_SENTENCES)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Copies `text`, skipping every span `matcher` recognises at a word start.
/// `matcher` sees the ASCII-lowercased remainder and returns the span length
/// in bytes.
fn remove_matches(text: &str, matcher: impl Fn(&str) -> Option<usize>) -> String {
    let lower = text.to_ascii_lowercase();
    let mut out = String::with_capacity(text.len());
    let mut position = 0;
    while position < text.len() {
        let at_word_start = text[..position]
            .chars()
            .next_back()
            .map(|ch| !ch.is_alphanumeric())
            .unwrap_or(true);
        if at_word_start {
            if let Some(length) = matcher(&lower[position..]) {
                position += length;
                continue;
            }
        }
        let Some(ch) = text[position..].chars().next() else {
            break;
        };
        out.push(ch);
        position += ch.len_utf8();
    }
    out
}

struct Cursor<'a> {
    rest: &'a str,
    consumed: usize,
}

impl<'a> Cursor<'a> {
    fn new(rest: &'a str) -> Self {
        Self { rest, consumed: 0 }
    }

    fn tag(&mut self, tag: &str) -> Option<()> {
        let rest = self.rest.strip_prefix(tag)?;
        self.advance(self.rest.len() - rest.len());
        Some(())
    }

    fn spaces(&mut self) -> usize {
        let skipped = self.rest.len() - self.rest.trim_start().len();
        self.advance(skipped);
        skipped
    }

    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> usize {
        let taken = self
            .rest
            .char_indices()
            .find(|(_, ch)| !keep(*ch))
            .map(|(index, _)| index)
            .unwrap_or(self.rest.len());
        self.advance(taken);
        taken
    }

    fn optional_terminator(&mut self) {
        if self.rest.starts_with([';', ':', '.']) {
            self.advance(1);
        }
    }

    fn at_word_end(&self) -> bool {
        self.rest
            .chars()
            .next()
            .map(|ch| !ch.is_alphanumeric())
            .unwrap_or(true)
    }

    fn advance(&mut self, bytes: usize) {
        self.rest = &self.rest[bytes..];
        self.consumed += bytes;
    }
}

/// `key = value` up to and including the next `;`, `:` or `.`.
fn assignment(rest: &str, key: &str) -> Option<usize> {
    let mut cursor = Cursor::new(rest);
    cursor.tag(key)?;
    cursor.spaces();
    cursor.tag("=")?;
    cursor.spaces();
    if cursor.take_while(|ch| !matches!(ch, ';' | ':' | '.')) == 0 {
        return None;
    }
    cursor.optional_terminator();
    Some(cursor.consumed)
}

/// `start 5`, `start: 5`.
fn start_five(rest: &str) -> Option<usize> {
    let mut cursor = Cursor::new(rest);
    cursor.tag("start")?;
    cursor.spaces();
    let _ = cursor.tag(":");
    cursor.spaces();
    cursor.tag("5")?;
    if !cursor.at_word_end() {
        return None;
    }
    cursor.optional_terminator();
    Some(cursor.consumed)
}

/// `final: 7/10`.
fn final_mark(rest: &str) -> Option<usize> {
    let mut cursor = Cursor::new(rest);
    cursor.tag("final")?;
    cursor.spaces();
    cursor.tag(":")?;
    cursor.spaces();
    if cursor.take_while(|ch| ch.is_ascii_digit()) == 0 {
        return None;
    }
    cursor.spaces();
    cursor.tag("/")?;
    cursor.spaces();
    cursor.tag("10")?;
    if !cursor.at_word_end() {
        return None;
    }
    cursor.optional_terminator();
    Some(cursor.consumed)
}

/// `+a for` / `-b for`.
fn step_marker(rest: &str, marker: &str) -> Option<usize> {
    let mut cursor = Cursor::new(rest);
    cursor.tag(marker)?;
    if cursor.spaces() == 0 {
        return None;
    }
    cursor.tag("for")?;
    Some(cursor.consumed)
}
