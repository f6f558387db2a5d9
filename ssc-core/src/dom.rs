use std::{
    cell::RefCell,
    collections::BTreeMap,
    fmt,
    rc::{Rc, Weak},
};

use crate::resource::Element;

/// Minimal mutable element tree, standing in for the page DOM.
///
/// `Node` is a shared handle: clones refer to the same element. Children keep
/// a weak link to their parent so nodes can be moved and detached.
#[derive(Clone)]
pub struct Node(Rc<RefCell<NodeData>>);

struct NodeData {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    text: String,
    parent: Weak<RefCell<NodeData>>,
    children: Vec<Node>,
}

impl Node {
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(NodeData {
            tag: tag.to_owned(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            text: String::new(),
            parent: Weak::new(),
            children: Vec::new(),
        })))
    }

    pub fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_child(self, child: Node) -> Self {
        self.append(&child);
        self
    }

    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn classes(&self) -> Vec<String> {
        self.0.borrow().classes.clone()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    pub fn add_class(&self, class: &str) {
        if !self.has_class(class) {
            self.0.borrow_mut().classes.push(class.to_owned());
        }
    }

    pub fn remove_class(&self, class: &str) {
        self.0.borrow_mut().classes.retain(|c| c != class);
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_owned(), value.to_owned());
    }

    pub fn set_text(&self, text: &str) {
        self.0.borrow_mut().text = text.to_owned();
    }

    pub fn own_text(&self) -> String {
        self.0.borrow().text.clone()
    }

    /// Own text followed by the text of all descendants, in document order.
    pub fn text(&self) -> String {
        let mut out = self.own_text();
        for child in self.children() {
            out.push_str(&child.text());
        }
        out
    }

    pub fn parent(&self) -> Option<Node> {
        self.0.borrow().parent.upgrade().map(Node)
    }

    pub fn children(&self) -> Vec<Node> {
        self.0.borrow().children.clone()
    }

    pub fn append(&self, child: &Node) -> bool {
        if self.is_inclusive_descendant_of(child) {
            return false;
        }
        child.detach();
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.push(child.clone());
        true
    }

    /// Moves `child` directly in front of `reference`, which must be a child
    /// of `self`.
    pub fn insert_before(&self, child: &Node, reference: &Node) -> bool {
        if child.ptr_eq(reference) || self.is_inclusive_descendant_of(child) {
            return false;
        }
        if self.position_of(reference).is_none() {
            return false;
        }
        child.detach();
        // Detaching may have shifted the reference.
        let Some(index) = self.position_of(reference) else {
            return false;
        };
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.insert(index, child.clone());
        true
    }

    pub fn detach(&self) {
        let Some(parent) = self.parent() else {
            return;
        };
        parent
            .0
            .borrow_mut()
            .children
            .retain(|sibling| !sibling.ptr_eq(self));
        self.0.borrow_mut().parent = Weak::new();
    }

    /// First descendant carrying `class`, in document order.
    pub fn find_by_class(&self, class: &str) -> Option<Node> {
        for child in self.children() {
            if child.has_class(class) {
                return Some(child);
            }
            if let Some(found) = child.find_by_class(class) {
                return Some(found);
            }
        }
        None
    }

    pub fn find_all_by_class(&self, class: &str) -> Vec<Node> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    fn collect_by_class(&self, class: &str, found: &mut Vec<Node>) {
        for child in self.children() {
            if child.has_class(class) {
                found.push(child.clone());
            }
            child.collect_by_class(class, found);
        }
    }

    fn position_of(&self, child: &Node) -> Option<usize> {
        self.0
            .borrow()
            .children
            .iter()
            .position(|c| c.ptr_eq(child))
    }

    fn is_inclusive_descendant_of(&self, ancestor: &Node) -> bool {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            if node.ptr_eq(ancestor) {
                return true;
            }
            current = node.parent();
        }
        false
    }
}

impl Element for Node {
    fn has_class(&self, class: &str) -> bool {
        Node::has_class(self, class)
    }

    fn find_by_class(&self, class: &str) -> Option<Self> {
        Node::find_by_class(self, class)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        Node::attribute(self, name)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let data = self.0.borrow();
        f.debug_struct("Node")
            .field("tag", &data.tag)
            .field("classes", &data.classes)
            .field("children", &data.children.len())
            .finish()
    }
}
