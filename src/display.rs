//! Text drawings of analyzed clauses, for logs and test snapshots.

use std::fmt::{self, Write};
use unicode_width::UnicodeWidthStr;

use crate::clause::{Clause, ClauseTree};
use crate::element::Element;

/// Draws a clause's elements under the sentence.
///
/// ```text
/// She seems to be happy
/// ╰─╯S
///     ╰───╯V #vc-0
///           ╰─────────╯Comp #vc-0
/// ∅ Od
/// ```
pub struct ClauseDisplay<'a> {
    sentence: &'a str,
    clause: &'a Clause,
    show_header: bool,
}

impl<'a> ClauseDisplay<'a> {
    pub fn new(sentence: &'a str, clause: &'a Clause) -> Self {
        ClauseDisplay {
            sentence,
            clause,
            show_header: false,
        }
    }

    /// Prefix the drawing with the clause id, type and pattern.
    pub fn with_header(mut self) -> Self {
        self.show_header = true;
        self
    }

    fn column(&self, offset: usize) -> usize {
        self.sentence
            .get(..offset)
            .map_or(0, |prefix| UnicodeWidthStr::width(prefix))
    }
}

fn annotation(element: &Element) -> String {
    let mut out = element.role.to_string();
    if let Some(group) = &element.predicate_group_id {
        let _ = write!(out, " #{}", group);
    }
    if let Some(target) = &element.expands_to {
        let _ = write!(out, " >{}", target);
    }
    if let Some(index) = element.modifies_index {
        let _ = write!(out, " ->{}", index);
    }
    out
}

impl<'a> fmt::Display for ClauseDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.show_header {
            write!(f, "{} ({})", self.clause.id, self.clause.clause_type.as_str())?;
            if let Some(label) = &self.clause.pattern_label {
                write!(f, " [{}]", label)?;
            }
            f.write_char('\n')?;
        }
        f.write_str(self.sentence)?;

        for element in self.clause.elements.iter() {
            f.write_char('\n')?;
            let Some(span) = element.span else {
                write!(f, "∅ {}", annotation(element))?;
                continue;
            };

            let start_col = self.column(span.start);
            let end_col = self.column(span.end).max(start_col + 1);
            for _ in 0..start_col {
                f.write_char(' ')?;
            }
            f.write_char('╰')?;
            for _ in (start_col + 1)..end_col.saturating_sub(1) {
                f.write_char('─')?;
            }
            if end_col - start_col > 1 {
                f.write_char('╯')?;
            }
            f.write_str(&annotation(element))?;
        }
        Ok(())
    }
}

/// Every clause of a tree, one drawing after another.
pub struct TreeDisplay<'a> {
    sentence: &'a str,
    tree: &'a ClauseTree,
}

impl<'a> TreeDisplay<'a> {
    pub fn new(sentence: &'a str, tree: &'a ClauseTree) -> Self {
        TreeDisplay { sentence, tree }
    }
}

impl<'a> fmt::Display for TreeDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.tree.iter().enumerate() {
            if i > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{}", ClauseDisplay::new(self.sentence, clause).with_header())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Role;

    #[test]
    fn test_draws_spans_and_elided() {
        let sentence = "She seems to be happy";
        let el = |role, text| Element::find(role, sentence, text).unwrap();
        let clause = Clause::main().with_elements(vec![
            el(Role::S, "She"),
            el(Role::V, "seems"),
            el(Role::Comp, "to be happy"),
            Element::elided(Role::Od),
        ]);
        insta::assert_snapshot!(ClauseDisplay::new(sentence, &clause).to_string(), @r###"
        She seems to be happy
        ╰─╯S
            ╰───╯V
                  ╰─────────╯Comp
        ∅ Od
        "###);
    }

    #[test]
    fn test_wide_characters() {
        let sentence = "東京 is big";
        let el = |role, text| Element::find(role, sentence, text).unwrap();
        let clause = Clause::main().with_elements(vec![el(Role::S, "東京"), el(Role::V, "is")]);
        insta::assert_snapshot!(ClauseDisplay::new(sentence, &clause).to_string(), @r###"
        東京 is big
        ╰──╯S
             ╰╯V
        "###);
    }
}
