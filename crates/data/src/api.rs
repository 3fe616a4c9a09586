//! Uniform error wrapping for service calls.
//!
//! Every service operation returns [`ApiResult`]. A failure carries two
//! messages: a fixed Arabic message chosen by the operation (shown to the
//! user) and the gateway's own detail (logged, never shown).

use std::fmt;
use std::future::Future;

use crate::gateway::GatewayError;
use crate::rows::RowError;

/// User-facing failure messages, one per operation.
pub mod messages {
    pub const LOAD_RESTAURANT: &str = "فشل في تحميل بيانات المطعم";
    pub const UPDATE_RESTAURANT: &str = "فشل في تحديث بيانات المطعم";
    pub const UPLOAD_LOGO: &str = "فشل في رفع الشعار";
    pub const LOAD_ADMINS: &str = "فشل في تحميل قائمة المسؤولين";
    pub const ADD_ADMIN: &str = "فشل في إضافة مسؤول جديد";
    pub const REMOVE_ADMIN: &str = "فشل في حذف المسؤول";
    pub const OWNER_NOT_REMOVABLE: &str = "لا يمكن حذف مالك المطعم";
    pub const OWNER_NOT_INVITABLE: &str = "لا يمكن إضافة مالك جديد";
    pub const NO_RESTAURANT_FOR_EMAIL: &str = "لم يتم العثور على مطاعم مرتبطة بهذا البريد";
    pub const LOAD_CATEGORIES: &str = "فشل في تحميل الأقسام";
    pub const UPDATE_CATEGORY: &str = "فشل في تحديث القسم";
    pub const ADD_CATEGORY: &str = "فشل في إضافة القسم";
    pub const DELETE_CATEGORY: &str = "فشل في حذف القسم";
    pub const LOAD_PRODUCTS: &str = "فشل في تحميل المنتجات";
    pub const UPDATE_PRODUCT: &str = "فشل في تحديث المنتج";
    pub const ADD_PRODUCT: &str = "فشل في إضافة المنتج";
    pub const UPLOAD_PRODUCT_IMAGE: &str = "فشل في رفع صورة المنتج";
    pub const DELETE_PRODUCT: &str = "فشل في حذف المنتج";
    pub const SIGN_IN: &str = "البريد الإلكتروني أو كلمة المرور غير صحيحة";
    pub const UNEXPECTED: &str = "حدث خطأ غير متوقع";
}

/// What kind of failure an [`ApiError`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// A single-record read matched nothing.
    NotFound,
    /// Credentials were missing or rejected.
    Unauthorized,
    /// Anything else: network, status, decode, storage.
    Failed,
}

/// A failed service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Localized message for the user.
    pub message: String,
    /// Underlying detail for logs.
    pub detail: String,
    pub kind: ApiErrorKind,
}

impl ApiError {
    /// A failure that did not come from the gateway.
    #[must_use]
    pub fn new(message: &str, detail: impl Into<String>) -> Self {
        Self {
            message: message.to_string(),
            detail: detail.into(),
            kind: ApiErrorKind::Failed,
        }
    }

    /// Wrap a gateway error under the operation's message.
    #[must_use]
    pub fn from_gateway(message: &str, error: &GatewayError) -> Self {
        let kind = match error {
            GatewayError::NotFound => ApiErrorKind::NotFound,
            GatewayError::Unauthorized(_) => ApiErrorKind::Unauthorized,
            _ => ApiErrorKind::Failed,
        };
        Self {
            message: message.to_string(),
            detail: error.to_string(),
            kind,
        }
    }

    /// Wrap a row conversion error under the operation's message.
    #[must_use]
    pub fn from_row(message: &str, error: &RowError) -> Self {
        Self::new(message, error.to_string())
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == ApiErrorKind::NotFound
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.detail)
    }
}

impl std::error::Error for ApiError {}

/// Result of a service operation.
pub type ApiResult<T> = Result<T, ApiError>;

/// Await a gateway call, logging and wrapping any failure under `message`.
///
/// # Errors
///
/// Returns an [`ApiError`] carrying `message` if the call fails.
pub async fn fetch<T>(
    operation: &'static str,
    message: &str,
    call: impl Future<Output = Result<T, GatewayError>>,
) -> ApiResult<T> {
    call.await.map_err(|error| {
        tracing::warn!(operation, error = %error, "gateway call failed");
        ApiError::from_gateway(message, &error)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_wraps_error_with_message() {
        let err = fetch("load_products", messages::LOAD_PRODUCTS, async {
            Err::<(), _>(GatewayError::Status {
                status: 503,
                message: "upstream down".to_string(),
            })
        })
        .await
        .unwrap_err();

        assert_eq!(err.message, messages::LOAD_PRODUCTS);
        assert!(err.detail.contains("upstream down"));
        assert_eq!(err.kind, ApiErrorKind::Failed);
    }

    #[tokio::test]
    async fn test_fetch_keeps_not_found_kind() {
        let err = fetch("load_restaurant", messages::LOAD_RESTAURANT, async {
            Err::<(), _>(GatewayError::NotFound)
        })
        .await
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_fetch_passes_success_through() {
        let value = fetch("noop", messages::UNEXPECTED, async { Ok::<_, GatewayError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }
}
