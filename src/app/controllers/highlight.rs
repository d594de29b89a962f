use crate::app::domain::selector::Selector;
use crate::app::domain::settings::{CodeTheme, HIGHLIGHTED_CODE_CLASS, SelectorSettings};
use crate::app::domain::tree::{Document, NodeId};
use crate::app::infrastructure::error::Result;
use crate::app::services::syntax::{CodeHighlighter, HighlightedPiece};

pub struct HighlightController {
    code_blocks: Selector,
    highlighter: CodeHighlighter,
    pub highlighting_enabled: bool,
}

impl HighlightController {
    pub fn new(selectors: &SelectorSettings, theme: CodeTheme, highlighting_enabled: bool) -> Result<Self> {
        Ok(Self {
            code_blocks: Selector::parse(&selectors.code_blocks)?,
            highlighter: CodeHighlighter::new(theme),
            highlighting_enabled,
        })
    }

    /// Color every code block not already marked as highlighted. Blocks
    /// that fail are logged and left as they were. Returns how many blocks
    /// were colored.
    pub fn highlight_all(&mut self, doc: &mut Document) -> usize {
        if !self.highlighting_enabled {
            return 0;
        }
        let root = doc.root();
        let mut count = 0;
        for block in doc.query_selector_all(root, &self.code_blocks) {
            if doc.has_class(block, HIGHLIGHTED_CODE_CLASS) {
                continue;
            }
            match self.highlight_block(doc, block) {
                Ok(()) => count += 1,
                Err(e) => log::warn!("skipping code block {block}: {e}"),
            }
        }
        log::debug!("highlighted {count} code blocks");
        count
    }

    fn highlight_block(&mut self, doc: &mut Document, block: NodeId) -> Result<()> {
        let text = doc.text_content(block);
        let language = block_language(doc, block);
        let pieces = self.highlighter.highlight(&text, language.as_deref())?;

        doc.clear_children(block);
        for HighlightedPiece { style, text } in pieces {
            let leaf = doc.create_text(&text);
            match style {
                Some(style) => {
                    let span = doc.create_element("span");
                    doc.set_attr(span, "style", &style);
                    doc.append_child(span, leaf);
                    doc.append_child(block, span);
                }
                None => doc.append_child(block, leaf),
            }
        }
        doc.add_class(block, HIGHLIGHTED_CODE_CLASS);
        Ok(())
    }
}

/// Language named by a `language-*` or `lang-*` class on the block or its
/// enclosing `pre`.
fn block_language(doc: &Document, block: NodeId) -> Option<String> {
    let from = |node: NodeId| {
        doc.classes(node).iter().find_map(|class| {
            class
                .strip_prefix("language-")
                .or_else(|| class.strip_prefix("lang-"))
                .filter(|lang| !lang.is_empty())
                .map(str::to_string)
        })
    };
    from(block).or_else(|| doc.parent(block).and_then(from))
}
