// Logalizer - core/output.rs
//
// Translation document assembly: wrap_text_pre, the translated body, then
// wrap_text_post, written with or without line terminators.

use std::io::{self, Write};

/// A complete translation document ready to be written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub lines: Vec<String>,
    /// Terminate every line with `\n`. When false, lines are written
    /// back-to-back and the body must carry its own separators.
    pub auto_new_line: bool,
}

impl Document {
    /// Assemble `pre`, `body`, `post` in that order.
    pub fn assemble(pre: &[String], body: Vec<String>, post: &[String], auto_new_line: bool) -> Self {
        let mut lines = Vec::with_capacity(pre.len() + body.len() + post.len());
        lines.extend(pre.iter().cloned());
        lines.extend(body);
        lines.extend(post.iter().cloned());
        Self {
            lines,
            auto_new_line,
        }
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for line in &self.lines {
            writer.write_all(line.as_bytes())?;
            if self.auto_new_line {
                writer.write_all(b"\n")?;
            }
        }
        writer.flush()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_wrap_order() {
        let doc = Document::assemble(
            &strings(&["@startuml"]),
            strings(&["A -> B : hi"]),
            &strings(&["@enduml"]),
            true,
        );
        assert_eq!(doc.lines, vec!["@startuml", "A -> B : hi", "@enduml"]);
    }

    #[test]
    fn test_write_with_newlines() {
        let doc = Document::assemble(&[], strings(&["a", "b"]), &[], true);
        let mut buf = Vec::new();
        doc.write_to(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_write_without_newlines() {
        let doc = Document::assemble(&[], strings(&["a;", "b;"]), &[], false);
        let mut buf = Vec::new();
        doc.write_to(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a;b;");
    }

    #[test]
    fn test_empty_document_writes_nothing() {
        let doc = Document::default();
        let mut buf = Vec::new();
        doc.write_to(&mut buf).unwrap();
        assert!(buf.is_empty());
        assert!(doc.is_empty());
    }
}
