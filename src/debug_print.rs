//! Debug printer.

use core::fmt::{self, Write as _};

use alloc::vec::Vec;

use crate::{Anchor, OrderedTree};

/// Guide drawn for one nesting level.
#[derive(Clone, Copy)]
struct Guide {
    /// Whether the item is the last among its siblings.
    last: bool,
    /// Whether the current line is the first line of the item.
    first_line: bool,
}

impl Guide {
    /// Returns the visible mark and the padding after it.
    fn parts(self) -> (&'static str, &'static str) {
        match (self.last, self.first_line) {
            (false, true) => ("|--", " "),
            (false, false) => ("|", "   "),
            (true, true) => ("`--", " "),
            (true, false) => ("", "    "),
        }
    }
}

/// Writer prefixing every line with the guides of the open items.
struct GuideWriter<'a, 'b> {
    /// Backend formatter.
    fmt: &'b mut fmt::Formatter<'a>,
    /// Whether nothing has been written to the current line yet.
    at_line_start: bool,
    /// Guides of the open items, outermost first.
    guides: Vec<Guide>,
}

impl<'a, 'b> GuideWriter<'a, 'b> {
    /// Creates a new writer.
    fn new(fmt: &'b mut fmt::Formatter<'a>) -> Self {
        Self {
            fmt,
            at_line_start: true,
            guides: Vec::new(),
        }
    }

    /// Ends the current line unless it is still empty.
    fn newline(&mut self) -> fmt::Result {
        if !self.at_line_start {
            self.fmt.write_char('\n')?;
            self.at_line_start = true;
        }
        Ok(())
    }

    /// Opens a child item of the innermost open item on a new line.
    fn open_item(&mut self, last: bool) -> fmt::Result {
        self.newline()?;
        if let Some(parent) = self.guides.last_mut() {
            parent.first_line = false;
        }
        self.guides.push(Guide {
            last,
            first_line: true,
        });

        Ok(())
    }

    /// Closes the innermost open item.
    fn close_item(&mut self) {
        self.guides.pop();
    }

    /// Writes the guides at the start of a line.
    ///
    /// A blank line gets no trailing whitespace.
    fn write_prefix(&mut self, blank_line: bool) -> fmt::Result {
        let visible = if blank_line {
            self.guides
                .iter()
                .rposition(|guide| !guide.parts().0.is_empty())
                .map_or(0, |index| index + 1)
        } else {
            self.guides.len()
        };
        for (index, guide) in self.guides[..visible].iter().enumerate() {
            let (mark, padding) = guide.parts();
            self.fmt.write_str(mark)?;
            if !blank_line || index + 1 < visible {
                self.fmt.write_str(padding)?;
            }
        }

        Ok(())
    }
}

impl fmt::Write for GuideWriter<'_, '_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for line in s.split_inclusive('\n') {
            if self.at_line_start {
                self.write_prefix(line == "\n")?;
            }
            self.fmt.write_str(line)?;
            self.at_line_start = line.ends_with('\n');
            if self.at_line_start {
                if let Some(guide) = self.guides.last_mut() {
                    guide.first_line = false;
                }
            }
        }

        Ok(())
    }
}

/// Tree printer for debugging.
///
/// Every node is printed on its own line, children below their parent with
/// `|-- ` and `` `-- `` guides. Each top-level node of a forest starts a new
/// unindented block.
///
/// ```text
/// 1
/// |-- 2
/// |   `-- 10
/// `-- 3
/// 4
/// ```
///
/// This is provided mainly for debugging purpose. Note that the output format
/// is not guaranteed to be stable.
pub struct DebugPrint<'a, Tr: OrderedTree> {
    /// Tree.
    tree: &'a Tr,
    /// Node to print, or the whole forest.
    anchor: Anchor<Tr::Handle>,
}

impl<'a, Tr: OrderedTree> DebugPrint<'a, Tr> {
    /// Creates a printer for the node and its descendants.
    ///
    /// `Anchor::Root` prints the whole forest.
    #[inline]
    #[must_use]
    pub fn new(tree: &'a Tr, anchor: Anchor<Tr::Handle>) -> Self {
        Self { tree, anchor }
    }

    /// Writes the trees using `write_item` for every payload.
    fn write<F>(&self, f: &mut fmt::Formatter<'_>, mut write_item: F) -> fmt::Result
    where
        F: FnMut(&mut GuideWriter<'_, '_>, &Tr::Item) -> fmt::Result,
    {
        let tops = match &self.anchor {
            Anchor::Root => self.tree.child_handles(Anchor::Root),
            Anchor::Node(handle) => alloc::vec![handle.clone()],
        };
        let mut writer = GuideWriter::new(f);
        for top in tops {
            writer.newline()?;
            self.write_item_of(&mut writer, &top, &mut write_item)?;

            // Frames of (children, index of the next child to open).
            let mut stack = alloc::vec![(self.tree.child_handles(Anchor::Node(top)), 0_usize)];
            while let Some((children, next)) = stack.last_mut() {
                let Some(child) = children.get(*next).cloned() else {
                    stack.pop();
                    if !stack.is_empty() {
                        writer.close_item();
                    }
                    continue;
                };
                *next += 1;
                let is_last = *next == children.len();
                writer.open_item(is_last)?;
                self.write_item_of(&mut writer, &child, &mut write_item)?;
                stack.push((self.tree.child_handles(Anchor::Node(child)), 0));
            }
        }

        Ok(())
    }

    /// Writes the payload of a node.
    fn write_item_of<F>(
        &self,
        writer: &mut GuideWriter<'_, '_>,
        handle: &Tr::Handle,
        write_item: &mut F,
    ) -> fmt::Result
    where
        F: FnMut(&mut GuideWriter<'_, '_>, &Tr::Item) -> fmt::Result,
    {
        let item = self
            .tree
            .item(handle)
            .expect("[consistency] the node must be the part of the tree");
        write_item(writer, &*item)
    }
}

impl<Tr> fmt::Display for DebugPrint<'_, Tr>
where
    Tr: OrderedTree,
    Tr::Item: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, |writer, item| write!(writer, "{}", item))
    }
}

impl<Tr> fmt::Debug for DebugPrint<'_, Tr>
where
    Tr: OrderedTree,
    Tr::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, |writer, item| write!(writer, "{:?}", item))
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;

    use crate::arena::Tree;
    use crate::{owned, Anchor, OrderedTree};

    fn sample() -> Tree<&'static str> {
        let mut tree = Tree::new();
        let root = tree.insert(Anchor::Root, "root", None).expect("root");
        let zero = tree.insert(root, "0", None).expect("alive");
        tree.insert_range(zero, None, ["0-0", "0-1"]).expect("alive");
        let one = tree.insert(root, "1", None).expect("alive");
        tree.insert(one, "1-0", None).expect("alive");
        tree.insert(Anchor::Root, "other", None).expect("root");
        tree
    }

    #[test]
    fn forest_display() {
        let tree = sample();
        let expected = "\
root
|-- 0
|   |-- 0-0
|   `-- 0-1
`-- 1
    `-- 1-0
other";
        assert_eq!(format!("{}", tree.debug_print()), expected);
    }

    #[test]
    fn subtree_debug() {
        let tree = sample();
        let root = tree.child_handles(Anchor::Root)[0];
        let zero = tree.child_ids(root).expect("alive")[0];
        let printer = super::DebugPrint::new(&tree, Anchor::Node(zero));
        assert_eq!(format!("{:?}", printer), "\"0\"\n|-- \"0-0\"\n`-- \"0-1\"");
    }

    #[test]
    fn multiline_payloads() {
        let mut tree = owned::Tree::new();
        let root = tree.insert(Anchor::Root, "a\nb", None).expect("root");
        tree.insert(&root, "c\nd", None).expect("attached");
        tree.insert(&root, "e", None).expect("attached");
        assert_eq!(
            format!("{}", tree.debug_print()),
            "a\nb\n|-- c\n|   d\n`-- e"
        );
    }

    #[test]
    fn stacked_last_items_keep_padding() {
        let mut tree = Tree::new();
        let a = tree.insert(Anchor::Root, "a", None).expect("root");
        let b = tree.insert(a, "b", None).expect("alive");
        tree.insert(b, "c\nd", None).expect("alive");
        assert_eq!(
            format!("{}", tree.debug_print()),
            "a\n`-- b\n    `-- c\n        d"
        );
    }

    #[test]
    fn empty_forest_prints_nothing() {
        let tree = Tree::<u8>::new();
        assert_eq!(format!("{}", tree.debug_print()), "");
    }
}
