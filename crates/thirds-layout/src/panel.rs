#![forbid(unsafe_code)]

//! Panel sets: the fixed, closed list of regions one engine governs.
//!
//! A panel set is a fieldless enum whose variants are the panels, in the
//! order used for every deterministic tie-break. The [`panel_set!`] macro
//! derives everything the engine needs, including the stable storage key
//! written to persisted records.
//!
//! ```
//! use thirds_layout::panel_set;
//! use thirds_layout::panel::PanelSet;
//!
//! panel_set! {
//!     /// Inbox layout.
//!     pub enum InboxPanel {
//!         Threads => "threads",
//!         Reader => "reader",
//!     }
//! }
//!
//! assert_eq!(InboxPanel::ALL.len(), 2);
//! assert_eq!(InboxPanel::from_key("reader"), Some(InboxPanel::Reader));
//! assert_eq!(InboxPanel::Threads.to_string(), "threads");
//! ```

use std::fmt;
use std::hash::Hash;

/// A closed set of panel identifiers.
///
/// Implementors must list every variant exactly once in [`PanelSet::ALL`],
/// and [`PanelSet::index`] must return the variant's position in that list.
pub trait PanelSet: Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display + 'static {
    /// Every panel, in key order.
    const ALL: &'static [Self];

    /// Stable identifier used in persisted records.
    fn key(self) -> &'static str;

    /// Position of this panel in [`PanelSet::ALL`].
    fn index(self) -> usize;

    /// Look a panel up by its storage key.
    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|panel| panel.key() == key)
    }

    /// Number of panels in the set.
    fn count() -> usize {
        Self::ALL.len()
    }
}

/// Declare a fieldless panel enum and implement [`PanelSet`] for it.
///
/// Variant order is key order.
#[macro_export]
macro_rules! panel_set {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $key:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::panel::PanelSet for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn key(self) -> &'static str {
                match self {
                    $(Self::$variant => $key),+
                }
            }

            fn index(self) -> usize {
                self as usize
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::panel::PanelSet::key(*self))
            }
        }
    };
}

panel_set! {
    /// Feed drawers: the three-panel horizontal home layout.
    pub enum DrawerPanel {
        Posts => "posts",
        Messages => "messages",
        Events => "events",
    }
}

panel_set! {
    /// Group content panels shown inside a group page.
    pub enum GroupPanel {
        Posts => "posts",
        Members => "members",
        Events => "events",
    }
}

panel_set! {
    /// Creation-flow editors (post, group, or event composer).
    pub enum CreationPanel {
        Compose => "compose",
        Preview => "preview",
        Options => "options",
    }
}

panel_set! {
    /// Vertical presentation/communication split.
    pub enum VerticalPanel {
        Presentation => "presentation",
        Communication => "communication",
    }
}
