//! The stack of open container blocks.

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Container {
    Document,
    BlockQuote,
    List {
        ordered: bool,
        delimiter: char,
        loose: bool,
        /// The last line processed inside this list was blank.
        pending_blank: bool,
    },
    ListItem {
        content_indent: usize,
        has_children: bool,
        pending_blank: bool,
    },
}

impl Container {
    /// Whether the container records one prefix per continuation line.
    pub(crate) fn records_indents(&self) -> bool {
        matches!(self, Container::BlockQuote | Container::ListItem { .. })
    }

    pub(crate) fn set_pending_blank(&mut self, value: bool) {
        match self {
            Container::List { pending_blank, .. } | Container::ListItem { pending_blank, .. } => {
                *pending_blank = value;
            }
            Container::Document | Container::BlockQuote => {}
        }
    }
}

/// An open container and where its open token lives.
#[derive(Debug, Clone)]
pub(crate) struct OpenContainer {
    pub(crate) container: Container,
    /// Index of the open token in the token arena.
    pub(crate) token: usize,
    /// 1-based line the container was opened on.
    pub(crate) line: usize,
}

pub(crate) struct ContainerStack {
    pub(crate) stack: Vec<OpenContainer>,
}

impl ContainerStack {
    pub(crate) fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    pub(crate) fn last(&self) -> Option<&OpenContainer> {
        self.stack.last()
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut OpenContainer> {
        self.stack.last_mut()
    }

    pub(crate) fn get(&self, idx: usize) -> Option<&OpenContainer> {
        self.stack.get(idx)
    }

    pub(crate) fn get_mut(&mut self, idx: usize) -> Option<&mut OpenContainer> {
        self.stack.get_mut(idx)
    }

    pub(crate) fn push(&mut self, container: Container, token: usize, line: usize) {
        self.stack.push(OpenContainer {
            container,
            token,
            line,
        });
    }

    pub(crate) fn pop(&mut self) -> Option<OpenContainer> {
        self.stack.pop()
    }

    pub(crate) fn last_is_list(&self) -> bool {
        matches!(
            self.last().map(|open| &open.container),
            Some(Container::List { .. })
        )
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut OpenContainer> {
        self.stack.iter_mut()
    }
}
