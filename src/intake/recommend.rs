//! Recommendation table — business type → suggested services.
//!
//! Pure lookup, used to enrich the canned terminal reply when generation is
//! unavailable.

/// Quick-reply choices offered after the email step.
pub const BUSINESS_TYPE_CHOICES: [&str; 3] = ["Restaurante", "Tienda", "Servicios"];

/// Ordered suggestions for a business type. Case-insensitive; unknown types
/// get the default list.
pub fn recommendations_for(business_type: &str) -> Vec<&'static str> {
    match business_type.trim().to_lowercase().as_str() {
        "restaurante" => vec![
            "Sitio web con reservas online",
            "SEO local para Google Maps",
        ],
        "tienda" => vec![
            "Tienda online con e-commerce",
            "Automatización de inventario",
        ],
        "servicios" => vec![
            "CRM para gestión de clientes",
            "Campañas de email marketing",
        ],
        _ => vec![
            "Sitio web profesional",
            "Análisis de datos para decisiones",
        ],
    }
}
