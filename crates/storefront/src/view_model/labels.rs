//! Static menu text in both languages.

use qr_menu_core::Lang;

/// Shown instead of the menu when the link has no restaurant id.
pub const INVALID_LINK: &str = "❌ رابط المنيو غير صالح";

/// Every fixed string the menu page prints, in one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuLabels {
    /// Caption of the language toggle: names the other language.
    pub toggle: &'static str,
    pub tagline: &'static str,
    /// Shown for a category without products.
    pub coming_soon: &'static str,
    pub order_button: &'static str,
    pub currency: &'static str,
    pub unavailable: &'static str,
    pub close: &'static str,
    pub not_found: &'static str,
}

impl MenuLabels {
    #[must_use]
    pub const fn for_lang(lang: Lang) -> Self {
        match lang {
            Lang::Ar => Self {
                toggle: "English",
                tagline: "مساحة فنون الطهي التجريبية",
                coming_soon: "رحلة قادمة قريباً",
                order_button: "إضافة للطلب",
                currency: lang.currency_label(),
                unavailable: "غير متوفر حالياً",
                close: "إغلاق",
                not_found: "لم يتم العثور على هذا المطعم",
            },
            Lang::En => Self {
                toggle: "عربي",
                tagline: "Experimental Culinary Space",
                coming_soon: "Journey Coming Soon",
                order_button: "Add to Order",
                currency: lang.currency_label(),
                unavailable: "Currently unavailable",
                close: "Close",
                not_found: "Restaurant not found",
            },
        }
    }
}
