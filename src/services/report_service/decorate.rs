use log::{debug, warn};

use crate::errors::ReportError;
use crate::services::report_service::package::Deck;
use crate::services::report_service::slide::{
    filled_shape_xml, next_shape_id, Geometry, ShapeKind, EMU_PER_INCH,
};

const WIDE_FILL: &str = "F4F4F4";
const NARROW_FILL: &str = "DEDEDF";
const WIDE_THRESHOLD_EMU: i64 = EMU_PER_INCH * 11 / 2;

/// Copies the non-placeholder rectangles, rounded rectangles and pictures of
/// `source` onto `destination` at the same position and size.
///
/// Rectangles come across as plain filled shapes without their text; pictures
/// are re-embedded from the original image bytes. Returns the number of shapes
/// added.
pub fn clone_decorative_shapes(
    deck: &mut Deck,
    source: usize,
    destination: usize,
) -> Result<usize, ReportError> {
    // fail on a bad destination before touching anything
    deck.slide_part(destination)?;

    let mut cloned = 0;
    for shape in deck.shapes(source)? {
        if shape.is_placeholder() {
            continue;
        }
        let Some(geometry) = shape.geometry else {
            debug!("Skipping shape '{}' without geometry", shape.name);
            continue;
        };

        match shape.kind {
            ShapeKind::Rectangle | ShapeKind::RoundedRectangle => {
                let preset = if shape.kind == ShapeKind::Rectangle {
                    "rect"
                } else {
                    "roundRect"
                };
                let id = next_shape_id(&deck.shapes(destination)?);
                let xml = filled_shape_xml(id, &shape.name, preset, geometry, fill_for(geometry));
                deck.append_shape_xml(destination, &xml)?;
                cloned += 1;
            }
            ShapeKind::Picture => {
                let Some(rel_id) = shape.image_rel.as_deref() else {
                    warn!("Picture '{}' has no embedded image", shape.name);
                    continue;
                };
                let (bytes, format) = deck.image(source, rel_id)?;
                deck.add_picture(destination, bytes, format, geometry)?;
                cloned += 1;
            }
            _ => {}
        }
    }
    Ok(cloned)
}

fn fill_for(geometry: Geometry) -> &'static str {
    if geometry.cx > WIDE_THRESHOLD_EMU {
        WIDE_FILL
    } else {
        NARROW_FILL
    }
}
