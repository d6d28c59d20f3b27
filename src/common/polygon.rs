use geo::{Coord, LineString, MultiPolygon, Polygon};
use shapefile as shp;

/// Convert a shapefile polygon into a `geo` multipolygon.
///
/// Shapefiles store each exterior ring (clockwise) followed by its holes
/// (counter-clockwise); orientation decides which is which.
pub fn shp_to_geo(p: &shp::Polygon) -> MultiPolygon<f64> {
    let mut polys = Vec::new();
    let mut exterior: Option<LineString<f64>> = None;
    let mut holes = Vec::new();

    for ring in p.rings() {
        let mut coords: Vec<Coord<f64>> = ring.points().iter().map(|pt| Coord { x: pt.x, y: pt.y }).collect();
        if coords.first() != coords.last() {
            coords.push(coords[0]);
        }

        if signed_area(&coords) < 0.0 {
            if let Some(ext) = exterior.take() {
                polys.push(Polygon::new(ext, std::mem::take(&mut holes)));
            }
            exterior = Some(LineString(coords));
        } else {
            holes.push(LineString(coords));
        }
    }
    if let Some(ext) = exterior {
        polys.push(Polygon::new(ext, holes));
    }

    MultiPolygon(polys)
}

/// Shoelace area of a closed ring; negative when clockwise.
fn signed_area(pts: &[Coord<f64>]) -> f64 {
    pts.windows(2).map(|w| w[0].x * w[1].y - w[1].x * w[0].y).sum::<f64>() / 2.0
}
