use backend_domain::{EntityType, PackageStatus};

use crate::AppError;

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn required_text(field: &str, value: Option<&str>) -> Result<String, AppError> {
    let trimmed = value.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn parse_entity_type(value: &str) -> Result<EntityType, AppError> {
    value
        .parse()
        .map_err(|err: backend_domain::InvalidValue| AppError::BadRequest(err.to_string()))
}

pub(crate) fn parse_status(value: &str) -> Result<PackageStatus, AppError> {
    value
        .parse()
        .map_err(|err: backend_domain::InvalidValue| AppError::BadRequest(err.to_string()))
}

/// Empty filter strings count as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text("relation", Some("  contains ")).unwrap(), "contains");
        let err = required_text("external_id", Some("   ")).unwrap_err();
        assert_eq!(err.to_string(), "external_id is required");
        assert!(required_text("external_id", None).is_err());
    }

    #[test]
    fn enum_values_surface_as_bad_requests() {
        assert_eq!(parse_entity_type("Shipment").unwrap(), EntityType::Shipment);
        assert!(matches!(parse_entity_type("pallet"), Err(AppError::BadRequest(_))));
        assert!(matches!(parse_status("teleported"), Err(AppError::BadRequest(_))));
    }
}
