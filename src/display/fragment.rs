use std::fmt::Write;

/// A small render tree handed to the host for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Element {
        tag: &'static str,
        class: Option<String>,
        children: Vec<Fragment>,
    },
    /// Escaped on output.
    Text(String),
    /// Emitted as-is; for host-supplied markup such as the header.
    Raw(String),
}

impl Fragment {
    pub fn element(tag: &'static str, class: impl Into<String>) -> Self {
        let class = class.into();
        Self::Element {
            tag,
            class: (!class.is_empty()).then_some(class),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    #[must_use]
    pub fn with_child(mut self, child: Fragment) -> Self {
        self.push(child);
        self
    }

    pub fn push(&mut self, child: Fragment) {
        if let Self::Element { children, .. } = self {
            children.push(child);
        }
    }

    pub fn children(&self) -> &[Fragment] {
        match self {
            Self::Element { children, .. } => children,
            _ => &[],
        }
    }

    pub fn class(&self) -> Option<&str> {
        match self {
            Self::Element { class, .. } => class.as_deref(),
            _ => None,
        }
    }

    /// Concatenated text of the whole tree, without markup.
    pub fn text_content(&self) -> String {
        match self {
            Self::Element { children, .. } => children.iter().map(Self::text_content).collect(),
            Self::Text(text) | Self::Raw(text) => text.clone(),
        }
    }

    /// Finds the first element carrying `class`, depth first.
    pub fn find_by_class(&self, wanted: &str) -> Option<&Fragment> {
        if self.class().is_some_and(|c| c.split_whitespace().any(|c| c == wanted)) {
            return Some(self);
        }
        self.children()
            .iter()
            .find_map(|child| child.find_by_class(wanted))
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Element {
                tag,
                class,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                if let Some(class) = class {
                    let _ = write!(out, " class=\"{}\"", escape_html(class));
                }
                out.push('>');
                for child in children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{tag}>");
            }
            Self::Text(text) => out.push_str(&escape_html(text)),
            Self::Raw(html) => out.push_str(html),
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
