//! Reference generator: an indentation-based shorthand markup dialect
//! transpiled into closing-tag markup.
//!
//! Each non-blank source line is one element: indentation depth selects the
//! parent, the first word is the element name, the remainder is inline text.
//!
//! ```text
//! html
//!   body
//!     p Hello
//! ```
//!
//! generates `<html><body><p>Hello</p></body></html>`. Element names and
//! inline text are mapped segments; brackets and synthesized closing tags
//! exist only in the generated document, blank lines only in the source.

use crate::generate::{GenerateError, GeneratedContent, Generator};
use crate::segment::{Segment, SegmentTable};

pub struct ShorthandGenerator;

impl Generator for ShorthandGenerator {
    fn generate(&self, source: &str) -> Result<GeneratedContent, GenerateError> {
        let mut out = String::new();
        let mut segments = Vec::new();
        // Open elements as (indent, name); popped when a line at the same
        // or shallower indent arrives.
        let mut stack: Vec<(usize, String)> = Vec::new();

        let mut line_start = 0;
        for (idx, raw_line) in source.split('\n').enumerate() {
            let line_no = idx + 1;
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

            if line.trim().is_empty() {
                line_start += raw_line.len() + 1;
                continue;
            }

            let indent = line.len() - line.trim_start_matches(' ').len();
            if line.as_bytes().get(indent) == Some(&b'\t') {
                return Err(GenerateError::TabIndentation { line: line_no });
            }

            while let Some((open_indent, _)) = stack.last() {
                if *open_indent >= indent {
                    let (_, name) = stack.pop().unwrap();
                    close_tag(&mut out, &name);
                } else {
                    break;
                }
            }

            let rest = &line[indent..];
            let name_len = rest
                .find(char::is_whitespace)
                .unwrap_or(rest.len());
            let name = &rest[..name_len];
            if !is_valid_name(name) {
                return Err(GenerateError::InvalidElementName {
                    line: line_no,
                    found: name.to_string(),
                });
            }

            out.push('<');
            segments.push(Segment::new(
                line_start + indent,
                name.len(),
                out.len(),
                name.len(),
            ));
            out.push_str(name);
            out.push('>');

            let after_name = &rest[name_len..];
            let text = after_name.trim_start_matches(' ').trim_end();
            if !text.is_empty() {
                let text_col = indent + name_len + (after_name.len() - after_name.trim_start_matches(' ').len());
                segments.push(Segment::new(
                    line_start + text_col,
                    text.len(),
                    out.len(),
                    text.len(),
                ));
                out.push_str(text);
            }

            stack.push((indent, name.to_string()));
            line_start += raw_line.len() + 1;
        }

        while let Some((_, name)) = stack.pop() {
            close_tag(&mut out, &name);
        }

        Ok(GeneratedContent {
            text: out,
            segments: SegmentTable::new(segments),
        })
    }
}

fn close_tag(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::Direction;
    use crate::translate::Translator;

    fn generate(source: &str) -> GeneratedContent {
        ShorthandGenerator.generate(source).unwrap()
    }

    #[test]
    fn nested_elements_close_in_order() {
        let content = generate("html\n  body\n    p Hello");
        assert_eq!(content.text, "<html><body><p>Hello</p></body></html>");
    }

    #[test]
    fn siblings_close_the_previous_element() {
        let content = generate("ul\n  li one\n  li two");
        assert_eq!(content.text, "<ul><li>one</li><li>two</li></ul>");
    }

    #[test]
    fn element_names_map_both_ways() {
        let content = generate("html\n  body");
        let tr = Translator::new(&content.segments);
        // "body" starts at source offset 7 and generated offset 7 ("<html><b…").
        assert_eq!(tr.to_generated(7), Some(7));
        assert_eq!(tr.to_source(7), Some(7));
    }

    #[test]
    fn inline_text_is_mapped() {
        let content = generate("p Hello");
        let tr = Translator::new(&content.segments);
        // "Hello" at source offset 2, generated offset 3 ("<p>H…").
        assert_eq!(tr.to_generated(2), Some(3));
        assert_eq!(tr.to_source(3), Some(2));
    }

    #[test]
    fn synthesized_closing_tags_are_unmapped() {
        let content = generate("p Hi");
        // "</p>" starts right after "Hi".
        let close_start = content.text.find("</p>").unwrap();
        assert!(content
            .segments
            .find(close_start + 1, Direction::Generated)
            .is_none());
    }

    #[test]
    fn blank_lines_are_source_only() {
        let content = generate("p\n\nq");
        let tr = Translator::new(&content.segments);
        // Offset 2 is the blank line.
        assert_eq!(tr.to_generated(2), None);
    }

    #[test]
    fn tab_indentation_is_rejected() {
        let err = ShorthandGenerator.generate("p\n\tq").unwrap_err();
        assert!(matches!(err, GenerateError::TabIndentation { line: 2 }));
    }

    #[test]
    fn invalid_element_name_is_rejected() {
        let err = ShorthandGenerator.generate("1up").unwrap_err();
        assert!(matches!(err, GenerateError::InvalidElementName { line: 1, .. }));
    }

    #[test]
    fn crlf_input_is_accepted() {
        let content = generate("ul\r\n  li one\r\n");
        assert_eq!(content.text, "<ul><li>one</li></ul>");
    }
}
