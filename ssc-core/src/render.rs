use crate::{
    dom::Node,
    engine::{Affordance, Decision, RenderDecision},
    resource::{Resource, ResourceSubtype},
};

pub const DELETED_CLASS: &str = "ssc-deleted";
pub const HIDE_CLASS: &str = "ssc-hide";
pub const COMPACT_CLASS: &str = "ssc-compact";
pub const INLINE_CLASS: &str = "ssc-inline";
pub const BUTTON_CLASS: &str = "ssc-button";

const SELECTED_CLASS: &str = "sc-button-selected";
const SHARE_CLASS: &str = "sc-button-share";
const TARGET_CLASS: &str = "soundContext__targetLink";
const USERNAME_CLASS: &str = "soundTitle__username";
const TITLE_CLASS: &str = "soundTitle__title";

/// Description of the delete/restore toggle for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub title: String,
    pub classes: Vec<&'static str>,
}

impl Button {
    pub fn new(resource: &Resource, affordance: Affordance) -> Self {
        let mut classes = vec![
            BUTTON_CLASS,
            "sc-button-delete",
            "sc-button",
            "sc-button-responsive",
        ];
        match resource.subtype() {
            Some(ResourceSubtype::Hero) => classes.push("sc-button-medium"),
            Some(ResourceSubtype::Stream) => classes.push("sc-button-small"),
            Some(ResourceSubtype::Playlist) => {
                classes.extend(["sc-button-icon", "sc-button-small"])
            }
            Some(ResourceSubtype::Player) | None => {}
        }
        match affordance {
            Affordance::Delete => Self {
                label: "Delete",
                title: format!("Delete this {} from stream", resource.kind()),
                classes,
            },
            Affordance::Restore => {
                classes.push(SELECTED_CLASS);
                Self {
                    label: "Deleted",
                    title: format!("Undelete this {} from stream", resource.kind()),
                    classes,
                }
            }
        }
    }

    pub fn to_node(&self) -> Node {
        let node = Node::new("button")
            .with_attribute("role", "button")
            .with_attribute("title", &self.title)
            .with_text(self.label);
        for class in &self.classes {
            node.add_class(class);
        }
        node
    }
}

/// Classes marking rows that render their own toggle, e.g. the tracks listed
/// on a resource page. Lookups for an element's own markup stop at them.
const NESTED_RESOURCE_CLASSES: [&str; 3] =
    ["trackList__item", "soundList__item", "playbackSoundBadge"];

/// Applies `decision` to `element`. Applying the same decision twice leaves
/// the element exactly as after the first application, and every decision
/// undoes the markers of the others. Missing page structure is skipped.
///
/// Only the element's own markup is touched; rows nested inside it keep
/// their markers and buttons.
pub fn apply(element: &Node, resource: &Resource, decision: &Decision) {
    let is_stream = resource.subtype() == Some(ResourceSubtype::Stream);
    match decision.render {
        RenderDecision::Normal => {
            element.remove_class(DELETED_CLASS);
            element.remove_class(HIDE_CLASS);
            element.remove_class(COMPACT_CLASS);
            remove_inline(element);
        }
        RenderDecision::Hidden => {
            element.add_class(DELETED_CLASS);
            element.add_class(HIDE_CLASS);
            element.remove_class(COMPACT_CLASS);
            remove_inline(element);
        }
        RenderDecision::Compact => {
            element.add_class(DELETED_CLASS);
            element.remove_class(HIDE_CLASS);
            // Other subtypes are only struck through.
            if is_stream {
                element.add_class(COMPACT_CLASS);
                insert_inline(element);
            } else {
                element.remove_class(COMPACT_CLASS);
            }
        }
    }

    remove_button(element);
    if let Some(affordance) = decision.affordance {
        insert_button(element, &Button::new(resource, affordance));
    }
}

/// Puts "username — title" in front of the target link, once.
fn insert_inline(element: &Node) {
    if find_own(element, INLINE_CLASS).is_some() {
        return;
    }
    let (Some(target), Some(username), Some(title)) = (
        find_own(element, TARGET_CLASS),
        find_own(element, USERNAME_CLASS),
        find_own(element, TITLE_CLASS),
    ) else {
        log::debug!("compact: missing title structure, skipping");
        return;
    };
    let Some(parent) = target.parent() else {
        return;
    };
    let inline = Node::new("span")
        .with_class(INLINE_CLASS)
        .with_child(Node::new("span").with_text(&username.text()))
        .with_child(Node::new("span").with_text("\u{2014}"))
        .with_child(Node::new("span").with_text(&title.text()));
    parent.insert_before(&inline, &target);
}

fn remove_inline(element: &Node) {
    for inline in find_all_own(element, INLINE_CLASS) {
        inline.detach();
    }
}

fn insert_button(element: &Node, button: &Button) {
    let Some(share) = find_own(element, SHARE_CLASS) else {
        log::debug!("toggle: no share button to anchor on, skipping");
        return;
    };
    if let Some(parent) = share.parent() {
        parent.insert_before(&button.to_node(), &share);
    }
}

fn remove_button(element: &Node) {
    for previous in find_all_own(element, BUTTON_CLASS) {
        previous.detach();
    }
}

fn find_own(element: &Node, class: &str) -> Option<Node> {
    find_all_own(element, class).into_iter().next()
}

/// Descendants carrying `class`, in document order, without entering nested
/// resource rows.
fn find_all_own(element: &Node, class: &str) -> Vec<Node> {
    let mut found = Vec::new();
    collect_own(element, class, &mut found);
    found
}

fn collect_own(node: &Node, class: &str, found: &mut Vec<Node>) {
    for child in node.children() {
        if NESTED_RESOURCE_CLASSES.iter().any(|c| child.has_class(c)) {
            continue;
        }
        if child.has_class(class) {
            found.push(child.clone());
        }
        collect_own(&child, class, found);
    }
}
