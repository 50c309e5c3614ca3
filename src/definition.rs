//! The job definition file.
//!
//! One JSON document describes the template (geometry, fields, optional
//! background artwork path) and the field mappings for a run. Artwork paths
//! are resolved relative to the definition file itself.

use crate::LabelsmithError;
use labelsmith_core::FieldMapping;
use labelsmith_template::{
    BackgroundKind, FieldSpec, LabelTemplate, Margins, TemplateGeometry, geometry_from_artwork,
};
use labelsmith_types::{OwnerId, Size, TemplateId};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
pub struct GeometryDefinition {
    pub print_width_mm: f32,
    pub print_height_mm: f32,
    pub layout_width_mm: f32,
    pub layout_height_mm: f32,
    #[serde(default)]
    pub margins_mm: Margins,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
}

fn default_dpi() -> u32 {
    300
}

#[derive(Debug, Deserialize)]
pub struct JobDefinition {
    pub name: String,
    /// Explicit geometry; omit to derive it from the background artwork.
    #[serde(default)]
    pub geometry: Option<GeometryDefinition>,
    /// Background artwork path, relative to the definition file.
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub mappings: Vec<FieldMapping>,
}

impl JobDefinition {
    pub fn from_file(path: &Path) -> Result<Self, LabelsmithError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Builds the template, loading background artwork relative to
    /// `base_dir`. Artwork kind follows the file extension: `.svg` is
    /// vector, anything else raster.
    pub fn into_template(
        self,
        base_dir: &Path,
        owner: OwnerId,
    ) -> Result<(LabelTemplate, Vec<FieldMapping>), LabelsmithError> {
        let (kind, artwork) = match &self.background {
            None => (BackgroundKind::None, None),
            Some(rel_path) => {
                let path = base_dir.join(rel_path);
                let bytes = fs::read(&path)?;
                let kind = match path.extension().and_then(|e| e.to_str()) {
                    Some(ext) if ext.eq_ignore_ascii_case("svg") => BackgroundKind::Vector,
                    _ => BackgroundKind::Raster,
                };
                (kind, Some(bytes))
            }
        };

        let geometry = match &self.geometry {
            Some(g) => TemplateGeometry::new(
                Size::new(g.print_width_mm, g.print_height_mm),
                Size::new(g.layout_width_mm, g.layout_height_mm),
                g.margins_mm,
                g.dpi,
            )?,
            None => {
                let bytes = artwork.as_deref().ok_or_else(|| {
                    LabelsmithError::Definition(
                        "definition needs either a geometry block or background artwork"
                            .to_string(),
                    )
                })?;
                geometry_from_artwork(bytes, kind, default_dpi())?
            }
        };

        let template = LabelTemplate::new(
            TemplateId::new(1),
            self.name,
            owner,
            kind,
            artwork,
            geometry,
            self.fields,
        )?;
        Ok((template, self.mappings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelsmith_template::FieldKind;

    const DEFINITION: &str = r#"{
        "name": "shelf label",
        "geometry": {
            "print_width_mm": 50, "print_height_mm": 30,
            "layout_width_mm": 60, "layout_height_mm": 40,
            "margins_mm": { "top": 5, "bottom": 5, "left": 5, "right": 5 }
        },
        "fields": [
            { "name": "sku", "kind": "text", "x_mm": 5, "y_mm": 5 },
            { "name": "code", "kind": "datamatrix", "x_mm": 30, "y_mm": 10,
              "width_mm": 15, "height_mm": 15 }
        ],
        "mappings": [
            { "field": "sku", "column": 1 },
            { "field": "code", "column": 2, "required": true, "order": 1 }
        ]
    }"#;

    #[test]
    fn definition_round_trips_into_a_template() {
        let definition: JobDefinition = serde_json::from_str(DEFINITION).unwrap();
        let (template, mappings) = definition
            .into_template(Path::new("."), OwnerId::new(1))
            .unwrap();

        assert_eq!(template.name, "shelf label");
        assert_eq!(template.fields().len(), 2);
        assert_eq!(template.field("code").unwrap().kind, FieldKind::DataMatrix);
        assert_eq!(template.geometry().dpi(), 300);
        assert_eq!(mappings.len(), 2);
        assert!(mappings[1].required);
    }

    #[test]
    fn geometry_or_background_is_required() {
        let definition: JobDefinition =
            serde_json::from_str(r#"{ "name": "bare" }"#).unwrap();
        assert!(matches!(
            definition.into_template(Path::new("."), OwnerId::new(1)),
            Err(LabelsmithError::Definition(_))
        ));
    }
}
