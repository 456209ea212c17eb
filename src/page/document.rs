use crate::charts::Canvas;

/// Class markers identifying a chart placeholder.
pub const CHART_PLACEHOLDER_CLASSES: [&str; 2] = ["repo", "chart"];

/// A child of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Canvas(Canvas),
}

/// An element of the page tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    text: Option<String>,
    children: Vec<Node>,
}

impl Element {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Whether the element carries every one of `classes`.
    #[must_use]
    pub fn has_classes(&self, classes: &[&str]) -> bool {
        classes.iter().all(|wanted| self.classes.iter().any(|c| c == wanted))
    }

    /// Append `node` as the last child.
    pub fn append_child(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Canvases that are direct children of this element.
    pub fn canvases(&self) -> impl Iterator<Item = &Canvas> {
        self.children.iter().filter_map(|child| match child {
            Node::Canvas(canvas) => Some(canvas),
            Node::Element(_) => None,
        })
    }

    fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            Node::Canvas(_) => None,
        })
    }

    fn collect_matching<'a>(&'a self, classes: &[&str], found: &mut Vec<&'a Self>) {
        if self.has_classes(classes) {
            found.push(self);
        }
        for child in self.child_elements() {
            child.collect_matching(classes, found);
        }
    }

    fn find(&self, id: &str) -> Option<&Self> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.child_elements().find_map(|child| child.find(id))
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Self> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| match child {
            Node::Element(element) => element.find_mut(id),
            Node::Canvas(_) => None,
        })
    }
}

/// The page charts are mounted into.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    title: String,
    body: Element,
}

impl Document {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: Element::new("body"),
        }
    }

    /// Build the dashboard page: one block per repository, each holding a chart placeholder
    /// whose id is the repository identifier. The placeholder is also the chart's mount point.
    #[must_use]
    pub fn for_repos<I, S>(title: impl Into<String>, repos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut document = Self::new(title);
        let heading = Element::new("h1").with_text(document.title.clone());
        document.body.append_child(Node::Element(heading));

        for repo in repos {
            let repo = repo.as_ref();
            let block = Element::new("div")
                .with_class("repo-block")
                .with_child(Element::new("h2").with_text(repo))
                .with_child(
                    Element::new("div")
                        .with_id(repo)
                        .with_class(CHART_PLACEHOLDER_CLASSES[0])
                        .with_class(CHART_PLACEHOLDER_CLASSES[1]),
                );
            document.body.append_child(Node::Element(block));
        }

        document
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The `<body>` element every chart placeholder lives under.
    #[must_use]
    pub const fn body(&self) -> &Element {
        &self.body
    }

    pub const fn body_mut(&mut self) -> &mut Element {
        &mut self.body
    }

    /// Elements carrying all of `classes`, in document order.
    #[must_use]
    pub fn elements_with_classes(&self, classes: &[&str]) -> Vec<&Element> {
        let mut found = Vec::new();
        self.body.collect_matching(classes, &mut found);
        found
    }

    /// The first element in document order whose id is `id`.
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<&Element> {
        self.body.find(id)
    }

    /// Mutable access to the first element in document order whose id is `id`.
    pub fn element_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.body.find_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_repos_builds_placeholders() {
        let doc = Document::for_repos("Metrics", ["octo/repo", "a"]);

        let placeholders = doc.elements_with_classes(&CHART_PLACEHOLDER_CLASSES);
        let ids: Vec<_> = placeholders.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec![Some("octo/repo"), Some("a")]);

        let heading = &doc.body().children()[0];
        let Node::Element(h1) = heading else {
            panic!("expected heading element");
        };
        assert_eq!(h1.text(), Some("Metrics"));
    }

    #[test]
    fn test_requires_all_classes() {
        let mut doc = Document::new("t");
        doc.body_mut().append_child(Node::Element(Element::new("div").with_id("x").with_class("repo")));
        doc.body_mut().append_child(Node::Element(
            Element::new("div").with_id("y").with_class("chart").with_class("repo").with_class("wide"),
        ));

        let ids: Vec<_> = doc.elements_with_classes(&["repo", "chart"]).iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec![Some("y")]);
    }

    #[test]
    fn test_nested_lookup_and_append() {
        let mut doc = Document::new("t");
        doc.body_mut().append_child(Node::Element(
            Element::new("section").with_child(Element::new("div").with_id("inner").with_child(Element::new("p"))),
        ));

        let inner = doc.element_by_id_mut("inner").unwrap();
        inner.append_child(Node::Canvas(Canvas::new(500, 500)));

        let inner = doc.element_by_id("inner").unwrap();
        assert_eq!(inner.children().len(), 2);
        assert!(matches!(inner.children().last(), Some(Node::Canvas(_))));
        assert_eq!(inner.canvases().count(), 1);

        assert!(doc.element_by_id("missing").is_none());
    }

    #[test]
    fn test_first_match_wins_for_duplicate_ids() {
        let mut doc = Document::new("t");
        doc.body_mut().append_child(Node::Element(Element::new("div").with_id("dup").with_text("first")));
        doc.body_mut().append_child(Node::Element(Element::new("div").with_id("dup").with_text("second")));

        assert_eq!(doc.element_by_id("dup").and_then(Element::text), Some("first"));
    }
}
