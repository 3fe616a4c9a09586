//! The single modal the dashboard can show at a time.

use serde::{Deserialize, Serialize};

use qr_menu_core::{AdminId, CategoryId, Email, ProductId};

use super::forms::{CategoryForm, InviteForm, ProductForm};

/// A destructive action waiting for confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingAction {
    DeleteCategory {
        id: CategoryId,
        name: String,
        /// Products deleted along with the category.
        product_count: usize,
    },
    DeleteProduct {
        id: ProductId,
        name: String,
    },
    RemoveAdmin {
        id: AdminId,
        email: Email,
    },
}

impl PendingAction {
    /// Confirmation question.
    #[must_use]
    pub fn question(&self) -> String {
        match self {
            Self::DeleteCategory { name, .. } => format!("هل أنت متأكد من حذف القسم \"{name}\"؟"),
            Self::DeleteProduct { name, .. } => format!("هل أنت متأكد من حذف المنتج \"{name}\"؟"),
            Self::RemoveAdmin { email, .. } => format!("هل أنت متأكد من حذف المسؤول {email}؟"),
        }
    }

    /// Extra warning for actions with side effects beyond the record itself.
    #[must_use]
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::DeleteCategory { product_count, .. } if *product_count > 0 => Some(format!(
                "سيتم حذف جميع المنتجات في هذا القسم ({product_count})"
            )),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalKind {
    Category(CategoryForm),
    Product(ProductForm),
    AdminInvite(InviteForm),
    Confirm(PendingAction),
}

/// Open modal with its last error and submit state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modal {
    pub kind: ModalKind,
    pub error: Option<String>,
    /// A save is in flight; the submit control is disabled.
    pub submitting: bool,
}

impl Modal {
    #[must_use]
    pub const fn new(kind: ModalKind) -> Self {
        Self {
            kind,
            error: None,
            submitting: false,
        }
    }

    /// Mark a submit as started. Returns `false` if one is already running.
    pub fn begin_submit(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        self.error = None;
        true
    }

    /// Keep the modal open with `message` and re-enable the submit control.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.submitting = false;
    }

    #[must_use]
    pub const fn is_confirm(&self) -> bool {
        matches!(self.kind, ModalKind::Confirm(_))
    }
}
