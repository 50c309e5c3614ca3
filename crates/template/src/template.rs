//! The label template: geometry plus an ordered field list and optional
//! background artwork.

use crate::artwork::BackgroundKind;
use crate::error::TemplateError;
use crate::field::FieldSpec;
use crate::geometry::TemplateGeometry;
use labelsmith_types::{OwnerId, TemplateId};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LabelTemplate {
    pub id: TemplateId,
    pub name: String,
    pub owner: OwnerId,
    background_kind: BackgroundKind,
    artwork: Option<Vec<u8>>,
    geometry: TemplateGeometry,
    fields: Vec<FieldSpec>,
    active: bool,
}

impl LabelTemplate {
    /// Validates field names (unique within the template) and positions
    /// (non-negative), and that artwork bytes are present exactly when the
    /// background kind requires them.
    pub fn new(
        id: TemplateId,
        name: impl Into<String>,
        owner: OwnerId,
        background_kind: BackgroundKind,
        artwork: Option<Vec<u8>>,
        geometry: TemplateGeometry,
        fields: Vec<FieldSpec>,
    ) -> Result<Self, TemplateError> {
        if background_kind != BackgroundKind::None && artwork.is_none() {
            return Err(TemplateError::MissingArtwork {
                kind: background_kind.as_str(),
            });
        }

        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(TemplateError::DuplicateField(field.name.clone()));
            }
            if field.x_mm < 0.0 || field.y_mm < 0.0 {
                return Err(TemplateError::InvalidField {
                    name: field.name.clone(),
                    reason: format!(
                        "position must be non-negative, got ({}, {})",
                        field.x_mm, field.y_mm
                    ),
                });
            }
            for dim in [field.width_mm, field.height_mm].into_iter().flatten() {
                if dim < 0.0 {
                    return Err(TemplateError::InvalidField {
                        name: field.name.clone(),
                        reason: format!("size must be non-negative, got {dim}"),
                    });
                }
            }
            if field.font.size <= 0.0 {
                return Err(TemplateError::InvalidField {
                    name: field.name.clone(),
                    reason: format!("font size must be positive, got {}", field.font.size),
                });
            }
        }

        Ok(Self {
            id,
            name: name.into(),
            owner,
            background_kind,
            artwork,
            geometry,
            fields,
            active: true,
        })
    }

    pub fn background_kind(&self) -> BackgroundKind {
        self.background_kind
    }

    pub fn artwork(&self) -> Option<&[u8]> {
        self.artwork.as_deref()
    }

    pub fn geometry(&self) -> &TemplateGeometry {
        &self.geometry
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Auto-generated template name: file stem plus print dimensions, e.g.
    /// `"wine-label (100x50)"`.
    pub fn suggested_name(filename: &str, geometry: &TemplateGeometry) -> String {
        let stem = Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(filename);
        format!(
            "{stem} ({:.0}x{:.0})",
            geometry.print().width,
            geometry.print().height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Margins;
    use labelsmith_types::Size;

    fn geometry() -> TemplateGeometry {
        TemplateGeometry::new(
            Size::new(50.0, 30.0),
            Size::new(60.0, 40.0),
            Margins::uniform(5.0),
            300,
        )
        .unwrap()
    }

    fn template_with(fields: Vec<FieldSpec>) -> Result<LabelTemplate, TemplateError> {
        LabelTemplate::new(
            TemplateId::new(1),
            "test",
            OwnerId::new(1),
            BackgroundKind::None,
            None,
            geometry(),
            fields,
        )
    }

    #[test]
    fn duplicate_field_names_are_rejected() {
        let err = template_with(vec![
            FieldSpec::text("sku", 1.0, 1.0),
            FieldSpec::text("sku", 2.0, 2.0),
        ])
        .unwrap_err();
        assert!(matches!(err, TemplateError::DuplicateField(name) if name == "sku"));
    }

    #[test]
    fn negative_positions_are_rejected() {
        let err = template_with(vec![FieldSpec::text("sku", -1.0, 0.0)]).unwrap_err();
        assert!(matches!(err, TemplateError::InvalidField { .. }));
    }

    #[test]
    fn vector_background_requires_artwork_bytes() {
        let err = LabelTemplate::new(
            TemplateId::new(1),
            "test",
            OwnerId::new(1),
            BackgroundKind::Vector,
            None,
            geometry(),
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, TemplateError::MissingArtwork { kind: "vector" }));
    }

    #[test]
    fn suggested_name_includes_print_dimensions() {
        let name = LabelTemplate::suggested_name("art/wine-label.png", &geometry());
        assert_eq!(name, "wine-label (50x30)");
    }

    #[test]
    fn templates_start_active() {
        let template = template_with(vec![]).unwrap();
        assert!(template.is_active());
    }
}
