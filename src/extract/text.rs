use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Location {
    Headline,
    Lede,
    /// 1-based paragraph number; paragraph 1 is always reported as the lede.
    Paragraph(usize),
    Body,
}

impl Location {
    pub fn paragraph(index: usize) -> Self {
        if index == 0 {
            Location::Lede
        } else {
            Location::Paragraph(index + 1)
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Headline => f.write_str("headline"),
            Location::Lede => f.write_str("lede"),
            Location::Paragraph(number) => write!(f, "para {number}"),
            Location::Body => f.write_str("body"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub index: usize,
    pub text: String,
    pub lower: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sentence {
    pub paragraph: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub paragraphs: Vec<Paragraph>,
    pub sentences: Vec<Sentence>,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        let blocks = split_paragraphs(text);
        let paragraphs = blocks
            .into_iter()
            .enumerate()
            .map(|(index, text)| Paragraph {
                index,
                lower: text.to_lowercase(),
                text,
            })
            .collect::<Vec<_>>();
        let sentences = paragraphs
            .iter()
            .flat_map(|paragraph| {
                split_sentences(&paragraph.text)
                    .into_iter()
                    .map(move |sentence| Sentence {
                        paragraph: paragraph.index,
                        text: sentence.to_string(),
                    })
            })
            .collect();
        Self {
            paragraphs,
            sentences,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub fn lede(&self) -> Option<&Paragraph> {
        self.paragraphs.first()
    }

    pub fn word_count(&self) -> usize {
        self.paragraphs
            .iter()
            .map(|paragraph| words(&paragraph.text).count())
            .sum()
    }

    pub fn full_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|paragraph| paragraph.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

// A single block spanning several lines is split line by line.
fn split_paragraphs(text: &str) -> Vec<String> {
    let mut blocks: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(trimmed);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    if blocks.len() == 1 && blocks[0].len() > 1 {
        return blocks[0].iter().map(|line| line.to_string()).collect();
    }
    blocks.into_iter().map(|lines| lines.join(" ")).collect()
}

pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((position, ch)) = chars.next() {
        if matches!(ch, '.' | '!' | '?') {
            if let Some(&(next_position, next)) = chars.peek() {
                if next.is_whitespace() {
                    let sentence = text[start..next_position].trim();
                    if !sentence.is_empty() {
                        sentences.push(sentence);
                    }
                    start = next_position;
                }
            } else {
                let sentence = text[start..position + ch.len_utf8()].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = text.len();
            }
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|ch: char| !is_word_char(ch))
        .filter(|word| !word.is_empty())
}

/// Case-sensitive; callers pass lowercased text and terms.
pub fn count_term(haystack: &str, term: &str) -> usize {
    if term.is_empty() {
        return 0;
    }
    let needs_left = term.chars().next().map(is_word_char).unwrap_or(false);
    let needs_right = term.chars().last().map(is_word_char).unwrap_or(false);
    haystack
        .match_indices(term)
        .filter(|(position, _)| {
            let left_ok = !needs_left
                || haystack[..*position]
                    .chars()
                    .next_back()
                    .map(|ch| !is_word_char(ch))
                    .unwrap_or(true);
            let right_ok = !needs_right
                || haystack[position + term.len()..]
                    .chars()
                    .next()
                    .map(|ch| !is_word_char(ch))
                    .unwrap_or(true);
            left_ok && right_ok
        })
        .count()
}

pub fn contains_term(haystack: &str, term: &str) -> bool {
    count_term(haystack, term) > 0
}

pub fn count_quotes(text: &str) -> usize {
    let straight = text.chars().filter(|ch| *ch == '"').count() / 2;
    let open = text.chars().filter(|ch| *ch == '\u{201C}').count();
    let close = text.chars().filter(|ch| *ch == '\u{201D}').count();
    straight + open.min(close)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_blank_line_paragraphs() {
        let doc = Document::parse("First para. Two sentences!\n\nSecond para\ncontinues here.\n\n\nThird?");
        assert_eq!(doc.paragraphs.len(), 3);
        assert_eq!(doc.paragraphs[1].text, "Second para continues here.");
        assert_eq!(doc.sentences.len(), 4);
        assert_eq!(doc.sentences[1].text, "Two sentences!");
        assert_eq!(doc.sentences[3].paragraph, 2);
    }

    #[test]
    fn parse_treats_lines_as_paragraphs_without_blank_lines() {
        let doc = Document::parse("Line one.\nLine two.\nLine three.");
        assert_eq!(doc.paragraphs.len(), 3);
        assert_eq!(doc.lede().map(|p| p.text.as_str()), Some("Line one."));
    }

    #[test]
    fn empty_text_has_no_paragraphs() {
        let doc = Document::parse("   \n\n  ");
        assert!(doc.is_empty());
        assert_eq!(doc.word_count(), 0);
    }

    #[test]
    fn split_sentences_keeps_decimal_numbers_together() {
        let sentences = split_sentences("Prices rose 2.5 percent. Analysts said so.");
        assert_eq!(sentences, vec!["Prices rose 2.5 percent.", "Analysts said so."]);
    }

    #[test]
    fn words_follow_word_character_runs() {
        let counted = words("Don't stop: 3 tests_passed!").collect::<Vec<_>>();
        assert_eq!(counted, vec!["Don", "t", "stop", "3", "tests_passed"]);
    }

    #[test]
    fn count_term_respects_word_boundaries() {
        assert_eq!(count_term("she said it; they said it", "said"), 2);
        assert_eq!(count_term("unsaid things", "said"), 0);
        assert_eq!(count_term("according to the mayor", "according to"), 1);
        assert_eq!(count_term("up 40% on the year", "%"), 1);
        assert!(contains_term("visit www.example.org today", "www."));
    }

    #[test]
    fn count_quotes_pairs_straight_and_curly() {
        assert_eq!(count_quotes(r#"He said "yes" and "no"."#), 2);
        assert_eq!(count_quotes("She said \u{201C}maybe\u{201D}."), 1);
        assert_eq!(count_quotes(r#"Unbalanced " quote"#), 0);
    }

    #[test]
    fn location_display_uses_lede_for_first_paragraph() {
        assert_eq!(Location::paragraph(0).to_string(), "lede");
        assert_eq!(Location::paragraph(2).to_string(), "para 3");
        assert_eq!(Location::Headline.to_string(), "headline");
    }
}
