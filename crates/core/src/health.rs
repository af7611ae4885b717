//! Recognition of the analysis backend's health banner.

/// Product name the backend announces on `GET /`.
pub const PRODUCT_NAME: &str = "Analizador de Complejidades";

/// Status fragment announced by a running backend.
pub const ACTIVE_MARKER: &str = "Sistema Activo";

/// A banner is healthy only if it names the product and reports it active.
pub fn is_healthy_banner(message: &str) -> bool {
    message.contains(PRODUCT_NAME) && message.contains(ACTIVE_MARKER)
}
