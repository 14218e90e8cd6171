use serde_json::Value;

/// Attribute map carried by nodes and marks (TipTap `attrs`).
pub type Attrs = serde_json::Map<String, Value>;

/// Known mark types. Anything registered by an outside extension is `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarkKind {
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
    Link,
    Subscript,
    Superscript,
    Highlight,
    Comment,
    Stamp,
    Other(String),
}

impl MarkKind {
    pub fn name(&self) -> &str {
        match self {
            MarkKind::Bold => "bold",
            MarkKind::Italic => "italic",
            MarkKind::Underline => "underline",
            MarkKind::Strike => "strike",
            MarkKind::Code => "code",
            MarkKind::Link => "link",
            MarkKind::Subscript => "subscript",
            MarkKind::Superscript => "superscript",
            MarkKind::Highlight => "highlight",
            MarkKind::Comment => "comment",
            MarkKind::Stamp => "stamp",
            MarkKind::Other(name) => name,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "bold" => MarkKind::Bold,
            "italic" => MarkKind::Italic,
            "underline" => MarkKind::Underline,
            "strike" => MarkKind::Strike,
            "code" => MarkKind::Code,
            "link" => MarkKind::Link,
            "subscript" => MarkKind::Subscript,
            "superscript" => MarkKind::Superscript,
            "highlight" => MarkKind::Highlight,
            "comment" => MarkKind::Comment,
            "stamp" => MarkKind::Stamp,
            other => MarkKind::Other(other.to_string()),
        }
    }

    /// Whether a second mark of this kind replaces the first on the same run.
    ///
    /// Annotations are non-exclusive: two comments (different threads) or a
    /// comment and a stamp may cover the same text.
    pub fn is_exclusive(&self) -> bool {
        !matches!(self, MarkKind::Comment | MarkKind::Stamp)
    }
}

/// A mark instance. Identity is kind plus attributes, so changing an
/// attribute means removing one mark and adding another.
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    pub kind: MarkKind,
    pub attrs: Attrs,
}

impl Mark {
    pub fn new(kind: MarkKind) -> Self {
        Self {
            kind,
            attrs: Attrs::new(),
        }
    }

    pub fn with_attrs(kind: MarkKind, attrs: Attrs) -> Self {
        Self { kind, attrs }
    }

    pub fn link(href: &str) -> Self {
        let mut attrs = Attrs::new();
        attrs.insert("href".to_string(), Value::from(href));
        Self::with_attrs(MarkKind::Link, attrs)
    }

    /// Copy of this mark with one attribute replaced
    pub fn with_attr(&self, key: &str, value: impl Into<Value>) -> Self {
        let mut attrs = self.attrs.clone();
        attrs.insert(key.to_string(), value.into());
        Self {
            kind: self.kind.clone(),
            attrs,
        }
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(Value::as_str)
    }

    pub fn attr_bool(&self, key: &str) -> bool {
        self.attrs.get(key).and_then(Value::as_bool).unwrap_or(false)
    }
}

/// Adds `mark` to a mark set, honouring exclusivity.
pub fn add_to_set(set: &[Mark], mark: &Mark) -> Vec<Mark> {
    if set.contains(mark) {
        return set.to_vec();
    }
    let mut out: Vec<Mark> = if mark.kind.is_exclusive() {
        set.iter().filter(|m| m.kind != mark.kind).cloned().collect()
    } else {
        set.to_vec()
    };
    out.push(mark.clone());
    out
}

pub fn remove_from_set(set: &[Mark], mark: &Mark) -> Vec<Mark> {
    set.iter().filter(|m| *m != mark).cloned().collect()
}

/// Order-insensitive mark set equality
pub fn same_set(a: &[Mark], b: &[Mark]) -> bool {
    a.len() == b.len() && a.iter().all(|m| b.contains(m))
}
