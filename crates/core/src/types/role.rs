//! Admin roles.

use serde::{Deserialize, Serialize};

use super::lang::Lang;

/// Role of an email inside one restaurant's admin list.
///
/// Each restaurant has exactly one `Owner` (created with the restaurant and
/// enforced by the data store). Owners invite and remove the other roles;
/// editors and managers share the same category/product permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Restaurant owner. Can manage other admins; cannot be removed.
    Owner,
    /// Can edit categories and products.
    #[default]
    Editor,
    /// Same permissions as an editor.
    Manager,
}

impl AdminRole {
    /// Roles an owner may hand out through the invite form.
    pub const INVITABLE: [Self; 2] = [Self::Editor, Self::Manager];

    /// Whether this role sees and edits the admin list.
    #[must_use]
    pub const fn can_manage_admins(self) -> bool {
        matches!(self, Self::Owner)
    }

    /// Whether an admin row with this role may be removed.
    #[must_use]
    pub const fn is_removable(self) -> bool {
        !matches!(self, Self::Owner)
    }

    /// Wire value stored in `restaurant_admins.role`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Editor => "editor",
            Self::Manager => "manager",
        }
    }

    /// Badge label shown in the admin table.
    #[must_use]
    pub const fn label(self, lang: Lang) -> &'static str {
        match (self, lang) {
            (Self::Owner, Lang::Ar) => "مالك",
            (Self::Editor, Lang::Ar) => "محرر",
            (Self::Manager, Lang::Ar) => "مدير",
            (Self::Owner, Lang::En) => "Owner",
            (Self::Editor, Lang::En) => "Editor",
            (Self::Manager, Lang::En) => "Manager",
        }
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "owner" => Ok(Self::Owner),
            "editor" => Ok(Self::Editor),
            "manager" => Ok(Self::Manager),
            other => Err(format!("invalid admin role: {other}")),
        }
    }
}
