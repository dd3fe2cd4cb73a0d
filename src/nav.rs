//! Navigation menu entries and social links.
//!
//! Both lists are static. Only the home route has a screen behind it; the
//! others are listed so the menu matches the site map.

/// A page the navigation menu can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Tasks,
    About,
    Contact,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Tasks => "/tasks",
            Route::About => "/about",
            Route::Contact => "/contact",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Tasks => "Tasks",
            Route::About => "About",
            Route::Contact => "Contact",
        }
    }

    /// Whether a screen is wired to this route.
    pub fn is_wired(self) -> bool {
        matches!(self, Route::Home)
    }
}

/// Menu entries, in display order.
pub const MENU_ITEMS: [Route; 4] = [Route::Home, Route::Tasks, Route::About, Route::Contact];

/// An external profile link shown at the bottom of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocialLink {
    pub label: &'static str,
    pub href: &'static str,
}

pub const SOCIAL_LINKS: [SocialLink; 4] = [
    SocialLink { label: "Instagram", href: "https://instagram.com/ii.bbs" },
    SocialLink { label: "GitHub", href: "https://github.com/mukhtaransarii" },
    SocialLink { label: "LinkedIn", href: "https://linkedin.com/in/mukhtar-alam-643764299" },
    SocialLink { label: "Email", href: "mailto:mukhtar.alam458546@gmail.com" },
];

/// One selectable row of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEntry {
    Page(Route),
    Link(SocialLink),
}

impl NavEntry {
    pub fn label(&self) -> &'static str {
        match self {
            NavEntry::Page(r) => r.label(),
            NavEntry::Link(l) => l.label,
        }
    }
}

/// Every menu row: pages first, then links.
pub fn entries() -> Vec<NavEntry> {
    MENU_ITEMS
        .iter()
        .map(|&r| NavEntry::Page(r))
        .chain(SOCIAL_LINKS.iter().map(|&l| NavEntry::Link(l)))
        .collect()
}
