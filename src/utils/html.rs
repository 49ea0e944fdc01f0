//! Narrow query layer over the `scraper` parse tree.
//!
//! Extraction rules only ever need a handful of lookups: find the first or
//! all elements matching a tag/class, walk to a following sibling, walk
//! forward in document order, and read text or attributes. Everything here is
//! expressed in those terms so the rules never touch `scraper` directly.

use scraper::{ElementRef, Html, Node};

/// A parsed HTML page.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parse a full HTML document
    pub fn parse(text: &str) -> Self {
        Self {
            html: Html::parse_document(text),
        }
    }

    /// The `<html>` element
    pub fn root(&self) -> Element<'_> {
        Element::new(self.html.root_element())
    }

    /// First element anywhere in the document matching `query`
    pub fn find(&self, query: &Query<'_>) -> Option<Element<'_>> {
        let root = self.root();
        if query.matches(&root) {
            return Some(root);
        }
        root.find(query)
    }

    /// All elements anywhere in the document matching `query`, in document order
    pub fn find_all(&self, query: &Query<'_>) -> Vec<Element<'_>> {
        let root = self.root();
        let mut found = Vec::new();
        if query.matches(&root) {
            found.push(root);
        }
        found.extend(root.find_all(query, true));
        found
    }
}

/// Element lookup by tag name, class, exact string content and attribute presence.
///
/// Unset parts match anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<'q> {
    tag: Option<&'q str>,
    class: Option<&'q str>,
    string: Option<&'q str>,
    attr: Option<&'q str>,
}

impl<'q> Query<'q> {
    /// Match elements with this tag name
    pub fn tag(tag: &'q str) -> Self {
        Self {
            tag: Some(tag),
            ..Default::default()
        }
    }

    /// Match any element carrying this class
    pub fn any_with_class(class: &'q str) -> Self {
        Self {
            class: Some(class),
            ..Default::default()
        }
    }

    /// Also require this class
    pub fn class(mut self, class: &'q str) -> Self {
        self.class = Some(class);
        self
    }

    /// Also require [`Element::string`] to equal `string` exactly
    pub fn string(mut self, string: &'q str) -> Self {
        self.string = Some(string);
        self
    }

    /// Also require the attribute to be present
    pub fn with_attr(mut self, attr: &'q str) -> Self {
        self.attr = Some(attr);
        self
    }

    /// Check a single element against the query
    pub fn matches(&self, element: &Element<'_>) -> bool {
        if let Some(tag) = self.tag {
            if element.name() != tag {
                return false;
            }
        }
        if let Some(class) = self.class {
            if !element.has_class(class) {
                return false;
            }
        }
        if let Some(attr) = self.attr {
            if element.attr(attr).is_none() {
                return false;
            }
        }
        if let Some(string) = self.string {
            if element.string().as_deref() != Some(string) {
                return false;
            }
        }
        true
    }
}

/// A child of an element: either a nested element or a run of text.
#[derive(Debug, Clone, Copy)]
pub enum Child<'a> {
    Element(Element<'a>),
    Text(&'a str),
}

impl<'a> Child<'a> {
    /// Concatenated text of this child
    pub fn text(&self) -> String {
        match self {
            Child::Element(element) => element.text(),
            Child::Text(text) => (*text).to_string(),
        }
    }
}

/// A borrowed element inside a [`Document`].
#[derive(Debug, Clone, Copy)]
pub struct Element<'a> {
    inner: ElementRef<'a>,
}

impl<'a> Element<'a> {
    fn new(inner: ElementRef<'a>) -> Self {
        Self { inner }
    }

    /// Lowercase tag name
    pub fn name(&self) -> &'a str {
        self.inner.value().name()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.inner.value().classes().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.inner.value().attr(name)
    }

    /// All descendant text, concatenated in document order
    pub fn text(&self) -> String {
        self.inner.text().collect()
    }

    /// The element's sole string, if it has exactly one child that is text
    /// or is itself an element with a sole string.
    pub fn string(&self) -> Option<String> {
        let mut children = self.inner.children();
        let only = children.next()?;
        if children.next().is_some() {
            return None;
        }
        match only.value() {
            Node::Text(text) => Some(text.to_string()),
            Node::Element(_) => ElementRef::wrap(only).and_then(|e| Element::new(e).string()),
            _ => None,
        }
    }

    /// Direct children, elements and text runs alike
    pub fn children(&self) -> Vec<Child<'a>> {
        self.inner
            .children()
            .filter_map(|node| match node.value() {
                Node::Text(text) => Some(Child::Text(&**text)),
                Node::Element(_) => ElementRef::wrap(node).map(|e| Child::Element(Element::new(e))),
                _ => None,
            })
            .collect()
    }

    /// First descendant matching `query`
    pub fn find(&self, query: &Query<'_>) -> Option<Element<'a>> {
        self.descendant_elements().find(|e| query.matches(e))
    }

    /// All matching descendants, or only matching direct children when
    /// `recursive` is false
    pub fn find_all(&self, query: &Query<'_>, recursive: bool) -> Vec<Element<'a>> {
        if recursive {
            self.descendant_elements()
                .filter(|e| query.matches(e))
                .collect()
        } else {
            self.inner
                .children()
                .filter_map(ElementRef::wrap)
                .map(Element::new)
                .filter(|e| query.matches(e))
                .collect()
        }
    }

    /// Next sibling element, whatever its tag
    pub fn next_element_sibling(&self) -> Option<Element<'a>> {
        self.next_element_siblings().into_iter().next()
    }

    /// All following sibling elements, in order
    pub fn next_element_siblings(&self) -> Vec<Element<'a>> {
        self.inner
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .map(Element::new)
            .collect()
    }

    /// Nearest following sibling with this tag
    pub fn find_next_sibling(&self, query: &Query<'_>) -> Option<Element<'a>> {
        self.next_element_siblings()
            .into_iter()
            .find(|e| query.matches(e))
    }

    /// First element after this one's start tag in document order (its own
    /// descendants included) that satisfies `predicate`
    pub fn find_next<P>(&self, predicate: P) -> Option<Element<'a>>
    where
        P: Fn(&Element<'a>) -> bool,
    {
        let id = self.inner.id();
        self.inner
            .tree()
            .root()
            .descendants()
            .skip_while(|node| node.id() != id)
            .skip(1)
            .filter_map(ElementRef::wrap)
            .map(Element::new)
            .find(|e| predicate(e))
    }

    fn descendant_elements(&self) -> impl Iterator<Item = Element<'a>> {
        self.inner
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .map(Element::new)
    }
}
