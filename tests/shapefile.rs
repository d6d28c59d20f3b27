use std::path::Path;

use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Point, Polygon, PolygonRing};
use tzgrid::{generate, read_boundaries, GenerateConfig, WorldGrid};

fn rect(west: f64, south: f64, east: f64, north: f64) -> Vec<Point> {
    // Clockwise, as shapefiles store exteriors.
    vec![
        Point { x: west, y: south },
        Point { x: west, y: north },
        Point { x: east, y: north },
        Point { x: east, y: south },
        Point { x: west, y: south },
    ]
}

fn write_zones(path: &Path, zones: &[(&str, Polygon)]) {
    let table = TableWriterBuilder::new()
        .add_character_field(FieldName::try_from("TZID").unwrap(), 64);
    let mut writer = shapefile::Writer::from_path(path, table).unwrap();
    for (name, polygon) in zones {
        let mut record = Record::default();
        record.insert("TZID".to_string(), FieldValue::Character(Some(name.to_string())));
        writer.write_shape_and_record(polygon, &record).unwrap();
    }
}

#[test]
fn boundaries_from_a_shapefile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zones.shp");
    write_zones(&path, &[
        ("America/Denver", Polygon::new(PolygonRing::Outer(rect(-180.0, -90.0, 0.0, 90.0)))),
        ("uninhabited", Polygon::new(PolygonRing::Outer(rect(0.0, -90.0, 90.0, 90.0)))),
        ("Asia/Tokyo", Polygon::with_rings(vec![
            PolygonRing::Outer(rect(90.0, -90.0, 180.0, 90.0)),
            // Counter-clockwise hole.
            PolygonRing::Inner(rect(100.0, 10.0, 120.0, 30.0).into_iter().rev().collect()),
        ])),
    ]);

    let boundaries = read_boundaries(&path, "TZID").unwrap();
    let names: Vec<&str> = boundaries.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["America/Denver", "uninhabited", "Asia/Tokyo"]);
    assert_eq!(boundaries[2].shape.0.len(), 1);
    assert_eq!(boundaries[2].shape.0[0].interiors().len(), 1);

    assert!(read_boundaries(&path, "NAME").is_err());

    let (data, report) = generate(boundaries, &GenerateConfig { scale: 4, ..Default::default() }).unwrap();
    assert_eq!(report.skipped, 1);
    let grid = WorldGrid::new(data).unwrap();
    assert_eq!(grid.lookup(45.0, -100.0), Some("America/Denver"));
    assert_eq!(grid.lookup(45.0, 45.0), None);
    assert_eq!(grid.lookup(-45.0, 150.0), Some("Asia/Tokyo"));
    // Empty pixels inside a coarse tile do not stop it from resolving, so a
    // hole smaller than a coarse tile reads as the surrounding zone.
    assert_eq!(grid.lookup(20.0, 110.0), Some("Asia/Tokyo"));
}
