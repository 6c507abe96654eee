//! Plain Markdown docstrings: no titled sections, only fences and admonitions.

use scribe_core::Section;

use super::blocks::scan_sections;
use super::{DocstringParser, ParseContext};

const NO_TITLES: &[(&str, ())] = &[];

#[derive(Debug, Clone, Copy)]
pub struct Markdown {
    replace_admonitions: bool,
}

impl Markdown {
    #[must_use]
    pub const fn new(replace_admonitions: bool) -> Self {
        Self {
            replace_admonitions,
        }
    }
}

impl Default for Markdown {
    fn default() -> Self {
        Self::new(true)
    }
}

impl DocstringParser for Markdown {
    fn parse(&self, docstring: &str, _context: &ParseContext<'_>) -> (Vec<Section>, Vec<String>) {
        let sections = scan_sections(docstring, NO_TITLES, self.replace_admonitions, |(), _, start| {
            (None, start)
        });
        (sections, Vec::new())
    }
}
