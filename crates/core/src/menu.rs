//! Navigation menu tree and dropdown toggle state.
//!
//! Menus are authored in the commerce backend and arrive as a nested list of
//! items. An item with children is [`MenuItem::Expandable`]; everything else
//! is a [`MenuItem::Leaf`].
//!
//! [`MenuState`] tracks which expandable item is open at each nesting level.
//! At most one item per level is open, and opening an item implies its
//! ancestors are open, so the state is simply the path of open ids from the
//! top level down:
//!
//! ```text
//! []                       all collapsed
//! ["shop"]                 "shop" dropdown open
//! ["shop", "mugs"]         "shop" open, "mugs" sub-dropdown open
//! ```

use url::Url;

/// The link part of a menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuLink {
    pub id: String,
    pub title: String,
    /// Absolute or relative target. Items without a URL are not rendered.
    pub url: Option<String>,
}

/// A menu node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Leaf(MenuLink),
    Expandable { link: MenuLink, items: Vec<Self> },
}

impl MenuItem {
    /// Build a node, choosing the variant from whether it has children.
    #[must_use]
    pub fn new(link: MenuLink, items: Vec<Self>) -> Self {
        if items.is_empty() {
            Self::Leaf(link)
        } else {
            Self::Expandable { link, items }
        }
    }

    #[must_use]
    pub const fn link(&self) -> &MenuLink {
        match self {
            Self::Leaf(link) | Self::Expandable { link, .. } => link,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.link().id
    }

    /// Child items; empty for a leaf.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Leaf(_) => &[],
            Self::Expandable { items, .. } => items,
        }
    }

    #[must_use]
    pub const fn is_expandable(&self) -> bool {
        matches!(self, Self::Expandable { .. })
    }
}

/// Find the chain of items from a top-level item down to the item with `id`.
fn path_to<'a>(items: &'a [MenuItem], id: &str) -> Option<Vec<&'a MenuItem>> {
    for item in items {
        if item.id() == id {
            return Some(vec![item]);
        }
        if let Some(mut path) = path_to(item.children(), id) {
            path.insert(0, item);
            return Some(path);
        }
    }
    None
}

/// Which expandable item is open at each nesting level.
///
/// Ephemeral: it lives for one rendering session and travels with toggle
/// requests as a comma-separated parameter. It is never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuState {
    open: Vec<String>,
}

impl MenuState {
    /// The initial state: every dropdown collapsed.
    #[must_use]
    pub const fn collapsed() -> Self {
        Self { open: Vec::new() }
    }

    /// Decode from the `open` request parameter (`id1,id2`).
    #[must_use]
    pub fn from_param(param: &str) -> Self {
        Self {
            open: param
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .collect(),
        }
    }

    /// Encode for the `open` request parameter.
    #[must_use]
    pub fn to_param(&self) -> String {
        self.open.join(",")
    }

    /// Open item ids, outermost first.
    #[must_use]
    pub fn open_ids(&self) -> &[String] {
        &self.open
    }

    /// Whether `id` is the open item at `depth` (0 = top level).
    #[must_use]
    pub fn is_open(&self, depth: usize, id: &str) -> bool {
        self.open.get(depth).is_some_and(|open| open == id)
    }

    /// Drop ids that no longer describe a chain of open expandable items in
    /// `items`, keeping the longest valid prefix.
    #[must_use]
    pub fn sanitize(mut self, items: &[MenuItem]) -> Self {
        let mut level = items;
        let mut valid = 0;
        for id in &self.open {
            let Some(item) = level
                .iter()
                .find(|item| item.id() == id && item.is_expandable())
            else {
                break;
            };
            valid += 1;
            level = item.children();
        }
        self.open.truncate(valid);
        self
    }

    /// Apply a selection of item `id` and return the new state.
    ///
    /// Selecting a closed expandable item opens it and closes its siblings
    /// (and anything below them). Selecting the open item collapses it and
    /// everything beneath it. Leaves and unknown ids leave the state as is.
    #[must_use]
    pub fn select(&self, items: &[MenuItem], id: &str) -> Self {
        let current = self.clone().sanitize(items);

        let Some(path) = path_to(items, id) else {
            return current;
        };
        if !path.last().is_some_and(|item| item.is_expandable()) {
            return current;
        }

        let ids: Vec<String> = path.iter().map(|item| item.id().to_string()).collect();
        let depth = ids.len() - 1;

        if current.open.len() > depth && current.open.get(..=depth) == ids.get(..=depth) {
            return Self {
                open: ids.into_iter().take(depth).collect(),
            };
        }

        Self { open: ids }
    }
}

/// Hosts that belong to the storefront itself.
///
/// Menu URLs authored in the backend are absolute. When they point at the
/// shop's own domain (or the platform's canonical `*.myshopify.com` domain)
/// only the path is kept so navigation stays inside this app.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreDomains {
    hosts: Vec<String>,
}

/// Canonical platform domain suffix.
const PLATFORM_DOMAIN_SUFFIX: &str = ".myshopify.com";

impl StoreDomains {
    /// Build from domains given either as bare hosts (`shop.myshopify.com`)
    /// or URLs (`https://coffeecuphut.com`).
    #[must_use]
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hosts = domains
            .into_iter()
            .filter_map(|domain| {
                let domain = domain.as_ref().trim();
                if domain.is_empty() {
                    return None;
                }
                let host = Url::parse(domain)
                    .ok()
                    .and_then(|url| url.host_str().map(str::to_string))
                    .unwrap_or_else(|| domain.to_string());
                Some(host.to_ascii_lowercase())
            })
            .collect();
        Self { hosts }
    }

    /// Whether `host` is one of the storefront's own hosts.
    #[must_use]
    pub fn is_internal(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        host.ends_with(PLATFORM_DOMAIN_SUFFIX) || self.hosts.iter().any(|own| *own == host)
    }

    /// Resolve the `href` for a menu URL.
    ///
    /// Internal absolute URLs become their path; external absolute URLs and
    /// relative URLs are returned unchanged.
    #[must_use]
    pub fn link_target(&self, raw: &str) -> String {
        match Url::parse(raw) {
            Ok(url) if url.host_str().is_some_and(|host| self.is_internal(host)) => {
                url.path().to_string()
            }
            _ => raw.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(id: &str) -> MenuLink {
        MenuLink {
            id: id.to_string(),
            title: id.to_uppercase(),
            url: Some(format!("https://shop.example.com/{id}")),
        }
    }

    fn leaf(id: &str) -> MenuItem {
        MenuItem::new(link(id), Vec::new())
    }

    fn node(id: &str, items: Vec<MenuItem>) -> MenuItem {
        MenuItem::new(link(id), items)
    }

    /// shop > (mugs > (ceramic, glass), tumblers), about, journal > (news)
    fn menu() -> Vec<MenuItem> {
        vec![
            node(
                "shop",
                vec![
                    node("mugs", vec![leaf("ceramic"), leaf("glass")]),
                    leaf("tumblers"),
                ],
            ),
            leaf("about"),
            node("journal", vec![leaf("news")]),
        ]
    }

    /// Count open expandable items per level by walking the tree.
    fn open_per_level(items: &[MenuItem], state: &MenuState, depth: usize, counts: &mut Vec<usize>) {
        if counts.len() <= depth {
            counts.resize(depth + 1, 0);
        }
        for item in items {
            if item.is_expandable() && state.is_open(depth, item.id()) {
                if let Some(count) = counts.get_mut(depth) {
                    *count += 1;
                }
                open_per_level(item.children(), state, depth + 1, counts);
            }
        }
    }

    #[test]
    fn test_new_picks_variant_from_children() {
        assert!(!leaf("about").is_expandable());
        assert!(node("shop", vec![leaf("a")]).is_expandable());
        assert!(leaf("about").children().is_empty());
    }

    #[test]
    fn test_initial_state_is_collapsed() {
        let state = MenuState::collapsed();
        assert!(state.open_ids().is_empty());
        assert!(!state.is_open(0, "shop"));
    }

    #[test]
    fn test_select_opens_top_level_item() {
        let state = MenuState::collapsed().select(&menu(), "shop");
        assert_eq!(state.open_ids(), ["shop"]);
    }

    #[test]
    fn test_select_open_item_collapses_level() {
        let items = menu();
        let state = MenuState::collapsed().select(&items, "shop");
        let state = state.select(&items, "shop");
        assert_eq!(state, MenuState::collapsed());
    }

    #[test]
    fn test_select_sibling_closes_previous() {
        let items = menu();
        let state = MenuState::collapsed()
            .select(&items, "shop")
            .select(&items, "mugs")
            .select(&items, "journal");
        assert_eq!(state.open_ids(), ["journal"]);
    }

    #[test]
    fn test_select_nested_item_keeps_parent_open() {
        let items = menu();
        let state = MenuState::collapsed()
            .select(&items, "shop")
            .select(&items, "mugs");
        assert_eq!(state.open_ids(), ["shop", "mugs"]);

        let state = state.select(&items, "mugs");
        assert_eq!(state.open_ids(), ["shop"]);
    }

    #[test]
    fn test_select_open_parent_collapses_descendants() {
        let items = menu();
        let state = MenuState::collapsed()
            .select(&items, "shop")
            .select(&items, "mugs")
            .select(&items, "shop");
        assert_eq!(state, MenuState::collapsed());
    }

    #[test]
    fn test_select_leaf_or_unknown_is_noop() {
        let items = menu();
        let state = MenuState::collapsed().select(&items, "shop");
        assert_eq!(state.select(&items, "tumblers"), state);
        assert_eq!(state.select(&items, "missing"), state);
    }

    #[test]
    fn test_at_most_one_open_per_level() {
        let items = menu();
        let selections = [
            "shop", "mugs", "journal", "shop", "mugs", "mugs", "about", "journal", "journal",
            "shop", "glass", "mugs",
        ];
        let mut state = MenuState::collapsed();
        for id in selections {
            state = state.select(&items, id);
            let mut counts = Vec::new();
            open_per_level(&items, &state, 0, &mut counts);
            assert!(
                counts.iter().all(|&count| count <= 1),
                "after selecting {id}: {counts:?}"
            );
        }
    }

    #[test]
    fn test_param_round_trip() {
        let state = MenuState::from_param("shop, mugs,,");
        assert_eq!(state.open_ids(), ["shop", "mugs"]);
        assert_eq!(state.to_param(), "shop,mugs");
        assert_eq!(MenuState::from_param(""), MenuState::collapsed());
    }

    #[test]
    fn test_sanitize_trims_stale_ids() {
        let items = menu();
        let state = MenuState::from_param("shop,gone,mugs").sanitize(&items);
        assert_eq!(state.open_ids(), ["shop"]);

        let state = MenuState::from_param("about").sanitize(&items);
        assert_eq!(state, MenuState::collapsed());
    }

    #[test]
    fn test_link_target_internal_hosts_use_path() {
        let domains = StoreDomains::new(["https://coffeecuphut.com", "cch.myshopify.com"]);
        assert_eq!(
            domains.link_target("https://coffeecuphut.com/collections/all"),
            "/collections/all"
        );
        assert_eq!(
            domains.link_target("https://other-store.myshopify.com/pages/about"),
            "/pages/about"
        );
        assert_eq!(domains.link_target("https://CoffeeCupHut.com/"), "/");
    }

    #[test]
    fn test_link_target_external_and_relative_unchanged() {
        let domains = StoreDomains::new(["https://coffeecuphut.com"]);
        assert_eq!(
            domains.link_target("https://instagram.com/coffeecuphut"),
            "https://instagram.com/coffeecuphut"
        );
        assert_eq!(domains.link_target("/blogs/journal"), "/blogs/journal");
    }
}
