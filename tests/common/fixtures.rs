use labelsmith::{
    BackgroundKind, DatasetId, DatasetStore, DelimiterSpec, FieldMapping, FieldSpec,
    GenerationJob, GenerationRequest, JobId, LabelTemplate, Margins, OwnerId, SourceFormat,
    TemplateGeometry, TemplateId,
};
use labelsmith_types::Size;

pub fn owner() -> OwnerId {
    OwnerId::new(1)
}

/// Ingests `data` as auto-delimited CSV with a header row.
pub fn store_with_csv(data: &[u8]) -> (DatasetStore, DatasetId) {
    let mut store = DatasetStore::new();
    let id = store.create_dataset(
        "data.csv",
        SourceFormat::Delimited {
            delimiter: DelimiterSpec::Auto,
        },
        true,
        owner(),
    );
    store.ingest(id, data).expect("fixture data ingests");
    (store, id)
}

/// A 50x30 mm label at 300 DPI with no margins and no background.
pub fn plain_template(fields: Vec<FieldSpec>) -> LabelTemplate {
    template_with_background(fields, BackgroundKind::None, None)
}

pub fn template_with_background(
    fields: Vec<FieldSpec>,
    kind: BackgroundKind,
    artwork: Option<Vec<u8>>,
) -> LabelTemplate {
    let geometry = TemplateGeometry::new(
        Size::new(50.0, 30.0),
        Size::new(50.0, 30.0),
        Margins::zero(),
        300,
    )
    .unwrap();
    LabelTemplate::new(
        TemplateId::new(1),
        "fixture",
        owner(),
        kind,
        artwork,
        geometry,
        fields,
    )
    .unwrap()
}

pub fn job_for(dataset: DatasetId, mappings: Vec<FieldMapping>) -> GenerationJob {
    let mut request = GenerationRequest::new("fixture run", dataset, TemplateId::new(1), owner());
    request.mappings = mappings;
    GenerationJob::new(JobId::new(1), request)
}

/// A small solid-color PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([230, 240, 250]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
    bytes
}

/// An SVG the vector path can draw directly.
pub fn drawable_svg() -> Vec<u8> {
    br##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="60">
        <rect x="2" y="2" width="96" height="56" fill="#eef2ff" stroke="#334466" stroke-width="1"/>
    </svg>"##
        .to_vec()
}

/// An SVG that forces the raster fallback (gradient fill).
pub fn gradient_svg() -> Vec<u8> {
    br##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="60">
        <defs><linearGradient id="g">
            <stop offset="0" stop-color="#ff0000"/>
            <stop offset="1" stop-color="#0000ff"/>
        </linearGradient></defs>
        <rect width="100" height="60" fill="url(#g)"/>
    </svg>"##
        .to_vec()
}
