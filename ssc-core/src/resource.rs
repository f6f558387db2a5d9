use std::fmt;

use url::Url;

use crate::error::Error;

/// Page location used to resolve relative links when none is known.
pub const DEFAULT_LOCATION: &str = "https://soundcloud.com/";

const TRACK_LIST_MARKERS: [&str; 2] = ["trackList", "compactTrackList"];
const PLAYER_MARKER: &str = "playbackSoundBadge";
const PLAYLIST_MARKER: &str = "trackList__item";
const STREAM_MARKER: &str = "soundList__item";
const HERO_MARKER: &str = "fullListenHero";

/// The parts of a page element that classification looks at.
pub trait Element: Sized {
    fn has_class(&self, class: &str) -> bool;
    /// First descendant carrying `class`.
    fn find_by_class(&self, class: &str) -> Option<Self>;
    fn attribute(&self, name: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Track,
    Playlist,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Playlist => "playlist",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where on the page the element lives. Variant order is the order in which
/// the markers are tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceSubtype {
    Player,
    Playlist,
    Stream,
    Hero,
}

impl ResourceSubtype {
    fn detect<E: Element>(element: &E) -> Option<Self> {
        if element.has_class(PLAYER_MARKER) {
            Some(Self::Player)
        } else if element.has_class(PLAYLIST_MARKER) {
            Some(Self::Playlist)
        } else if element.has_class(STREAM_MARKER) {
            Some(Self::Stream)
        } else if element.find_by_class(HERO_MARKER).is_some() {
            Some(Self::Hero)
        } else {
            None
        }
    }

    /// Class of the descendant anchor holding the canonical link. Hero pages
    /// use the page location instead.
    fn link_class(self) -> Option<&'static str> {
        match self {
            Self::Player => Some("playbackSoundBadge__titleLink"),
            Self::Playlist => Some("trackItem__trackTitle"),
            Self::Stream => Some("soundContext__targetLink"),
            Self::Hero => None,
        }
    }
}

/// Classified view of one element. All fields are computed once, when the
/// resource is built, and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    kind: ResourceKind,
    subtype: Option<ResourceSubtype>,
    identity_key: Option<String>,
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn subtype(&self) -> Option<ResourceSubtype> {
        self.subtype
    }

    pub fn identity_key(&self) -> Option<&str> {
        self.identity_key.as_deref()
    }

    /// Only resources with an identity can carry deletion state.
    pub fn is_deletable(&self) -> bool {
        self.identity_key.is_some()
    }

    fn unusable(kind: ResourceKind, subtype: Option<ResourceSubtype>) -> Self {
        Self {
            kind,
            subtype,
            identity_key: None,
        }
    }
}

/// Classifies `element`, resolving relative links (and hero pages) against
/// `location`. Never fails: elements that cannot be identified yield a
/// resource without an identity key.
pub fn classify<E: Element>(element: Option<&E>, location: &str) -> Resource {
    let Some(element) = element else {
        log::error!("classify: {}", Error::MissingElement);
        return Resource::unusable(ResourceKind::Track, None);
    };

    let kind = if TRACK_LIST_MARKERS
        .iter()
        .any(|marker| element.find_by_class(marker).is_some())
    {
        ResourceKind::Playlist
    } else {
        ResourceKind::Track
    };
    let subtype = ResourceSubtype::detect(element);

    let resource = match locate_link(element, subtype, location) {
        Ok(raw) => Resource {
            kind,
            subtype,
            identity_key: Some(identity_key(&raw, location)),
        },
        Err(err) => {
            log::warn!("classify: {}", err);
            Resource::unusable(kind, subtype)
        }
    };
    log::info!(
        "classified {} {:?} as {:?}",
        resource.kind,
        resource.subtype,
        resource.identity_key
    );
    resource
}

fn locate_link<E: Element>(
    element: &E,
    subtype: Option<ResourceSubtype>,
    location: &str,
) -> Result<String, Error> {
    let subtype = subtype.ok_or(Error::Unclassifiable)?;
    match subtype.link_class() {
        None => Ok(location.to_owned()),
        Some(class) => element
            .find_by_class(class)
            .and_then(|anchor| anchor.attribute("href"))
            .ok_or(Error::MissingIdentity),
    }
}

/// Normalizes a raw link to its path component, e.g.
/// `https://example.com/user/track?ref=x` becomes `/user/track`. Relative
/// links are resolved against `location`. Falls back to `raw` when no path can
/// be extracted.
pub fn identity_key(raw: &str, location: &str) -> String {
    let parsed = match Url::parse(location) {
        Ok(base) => base.join(raw),
        Err(_) => Url::parse(raw),
    };
    match parsed {
        Ok(url) if !url.path().is_empty() => url.path().to_owned(),
        _ => raw.to_owned(),
    }
}

/// Identity key for a link typed by a user: an absolute URL with a host, or a
/// path starting with `/`. Anything else, such as `example.com/a/b`, is
/// rejected instead of being resolved as a relative path.
pub fn parse_identity_key(raw: &str) -> Option<String> {
    if raw.starts_with('/') {
        return Some(identity_key(raw, DEFAULT_LOCATION));
    }
    match Url::parse(raw) {
        Ok(url) if url.has_host() => Some(url.path().to_owned()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Node;

    fn anchor(class: &str, href: &str) -> Node {
        Node::new("a").with_class(class).with_attribute("href", href)
    }

    fn stream_item(href: &str) -> Node {
        Node::new("li")
            .with_class("soundList__item")
            .with_child(anchor("soundContext__targetLink", href))
    }

    #[test]
    fn identity_keeps_path_only() {
        assert_eq!(
            identity_key("https://example.com/user/track-name?ref=x", DEFAULT_LOCATION),
            "/user/track-name"
        );
        assert_eq!(
            identity_key("/user/track-name#comments", DEFAULT_LOCATION),
            "/user/track-name"
        );
    }

    #[test]
    fn identity_falls_back_to_raw_string() {
        assert_eq!(identity_key("::not a url::", "also not a url"), "::not a url::");
    }

    #[test]
    fn typed_links_need_a_scheme_or_leading_slash() {
        assert_eq!(
            parse_identity_key("https://soundcloud.com/a/b?in=x").as_deref(),
            Some("/a/b")
        );
        assert_eq!(parse_identity_key("/a/b#t=1").as_deref(), Some("/a/b"));
        assert_eq!(parse_identity_key("soundcloud.com/a/b"), None);
        assert_eq!(parse_identity_key("a/b"), None);
        assert_eq!(parse_identity_key("mailto:someone"), None);
    }

    #[test]
    fn classifies_stream_item() {
        let el = stream_item("https://example.com/user/track-name?ref=x");
        let resource = classify(Some(&el), DEFAULT_LOCATION);
        assert_eq!(resource.kind(), ResourceKind::Track);
        assert_eq!(resource.subtype(), Some(ResourceSubtype::Stream));
        assert_eq!(resource.identity_key(), Some("/user/track-name"));
    }

    #[test]
    fn nested_track_list_makes_playlist() {
        let el = stream_item("/user/sets/mix").with_child(Node::new("ul").with_class("compactTrackList"));
        assert_eq!(
            classify(Some(&el), DEFAULT_LOCATION).kind(),
            ResourceKind::Playlist
        );
    }

    #[test]
    fn player_marker_wins_over_later_markers() {
        let el = Node::new("div")
            .with_class("soundList__item")
            .with_class("playbackSoundBadge")
            .with_child(anchor("playbackSoundBadge__titleLink", "/a/player"))
            .with_child(anchor("soundContext__targetLink", "/a/stream"));
        let resource = classify(Some(&el), DEFAULT_LOCATION);
        assert_eq!(resource.subtype(), Some(ResourceSubtype::Player));
        assert_eq!(resource.identity_key(), Some("/a/player"));
    }

    #[test]
    fn playlist_item_uses_track_title_link() {
        let el = Node::new("li")
            .with_class("trackList__item")
            .with_child(anchor("trackItem__trackTitle", "/b/song?in=b/sets/x"));
        let resource = classify(Some(&el), DEFAULT_LOCATION);
        assert_eq!(resource.subtype(), Some(ResourceSubtype::Playlist));
        assert_eq!(resource.identity_key(), Some("/b/song"));
    }

    #[test]
    fn hero_uses_page_location() {
        let el = Node::new("div").with_child(Node::new("div").with_class("fullListenHero"));
        let resource = classify(Some(&el), "https://soundcloud.com/c/tune?utm=1");
        assert_eq!(resource.subtype(), Some(ResourceSubtype::Hero));
        assert_eq!(resource.identity_key(), Some("/c/tune"));
    }

    #[test]
    fn unmarked_element_has_no_identity() {
        let el = Node::new("div").with_child(anchor("soundContext__targetLink", "/x/y"));
        let resource = classify(Some(&el), DEFAULT_LOCATION);
        assert_eq!(resource.subtype(), None);
        assert!(!resource.is_deletable());
    }

    #[test]
    fn missing_link_has_no_identity() {
        let el = Node::new("li").with_class("soundList__item");
        let resource = classify(Some(&el), DEFAULT_LOCATION);
        assert_eq!(resource.subtype(), Some(ResourceSubtype::Stream));
        assert_eq!(resource.identity_key(), None);
    }

    #[test]
    fn missing_element_has_no_identity() {
        let resource = classify::<Node>(None, DEFAULT_LOCATION);
        assert!(!resource.is_deletable());
        assert_eq!(resource.subtype(), None);
    }

    #[test]
    fn identity_survives_element_mutation() {
        let el = stream_item("/user/first");
        let resource = classify(Some(&el), DEFAULT_LOCATION);
        el.find_by_class("soundContext__targetLink")
            .unwrap()
            .set_attribute("href", "/user/second");
        assert_eq!(resource.identity_key(), Some("/user/first"));
    }
}
