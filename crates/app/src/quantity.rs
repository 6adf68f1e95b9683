//! Resolution of the metadata field holding "the" magnitude being
//! subdivided or damaged.

use gearbase_catalog::{Category, MetadataRecord};

/// Resolve which numeric metadata field the given unit refers to.
///
/// The category's explicit `quantity_field` wins when the item actually
/// carries a numeric value under that name. Otherwise the legacy unit
/// heuristic applies: `m`/`cm` → `length`, `kg`/`g` → `weight`, again only
/// when the item carries a numeric value under that name.
pub fn resolve_quantity_field(
    category: &Category,
    unit: &str,
    metadata: &MetadataRecord,
) -> Option<String> {
    if let Some(field) = &category.quantity_field {
        if numeric_value(metadata, field).is_some() {
            return Some(field.clone());
        }
    }

    let fallback = match unit {
        "m" | "cm" => "length",
        "kg" | "g" => "weight",
        _ => return None,
    };
    numeric_value(metadata, fallback).map(|_| fallback.to_string())
}

/// The item's current numeric value under `field`, when present.
pub fn numeric_value(metadata: &MetadataRecord, field: &str) -> Option<f64> {
    metadata.get(field).and_then(serde_json::Value::as_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gearbase_catalog::{CategoryId, CategoryName, MetadataSchema};
    use gearbase_core::{EntityId, OrganizationId};
    use serde_json::json;

    fn category(quantity_field: Option<&str>) -> Category {
        Category {
            id: CategoryId::new(EntityId::new()),
            organization_id: OrganizationId::new(),
            name: CategoryName::parse("Cuerdas").unwrap(),
            slug: "cuerdas".to_string(),
            requires_unique_numbering: false,
            can_be_composite: false,
            can_be_subdivided: true,
            metadata_schema: MetadataSchema::new(),
            quantity_field: quantity_field.map(str::to_string),
            deleted_at: None,
        }
    }

    fn metadata(pairs: &[(&str, f64)]) -> MetadataRecord {
        pairs.iter().map(|(k, v)| (k.to_string(), json!(v))).collect()
    }

    #[test]
    fn explicit_quantity_field_wins_over_the_heuristic() {
        let md = metadata(&[("rope_length", 50.0), ("length", 10.0)]);
        let field = resolve_quantity_field(&category(Some("rope_length")), "m", &md);
        assert_eq!(field.as_deref(), Some("rope_length"));
    }

    #[test]
    fn metric_length_units_map_to_length() {
        let md = metadata(&[("length", 50.0)]);
        for unit in ["m", "cm"] {
            let field = resolve_quantity_field(&category(None), unit, &md);
            assert_eq!(field.as_deref(), Some("length"));
        }
    }

    #[test]
    fn weight_units_map_to_weight() {
        let md = metadata(&[("weight", 2.5)]);
        for unit in ["kg", "g"] {
            let field = resolve_quantity_field(&category(None), unit, &md);
            assert_eq!(field.as_deref(), Some("weight"));
        }
    }

    #[test]
    fn unknown_units_resolve_to_nothing() {
        let md = metadata(&[("length", 50.0)]);
        assert_eq!(resolve_quantity_field(&category(None), "l", &md), None);
    }

    #[test]
    fn heuristic_requires_a_numeric_value_on_the_item() {
        let mut md = MetadataRecord::new();
        md.insert("length".to_string(), json!("fifty"));
        assert_eq!(resolve_quantity_field(&category(None), "m", &md), None);
    }

    #[test]
    fn explicit_field_without_a_value_falls_back_to_the_heuristic() {
        let md = metadata(&[("length", 50.0)]);
        let field = resolve_quantity_field(&category(Some("rope_length")), "m", &md);
        assert_eq!(field.as_deref(), Some("length"));
    }
}
