use anyhow::{anyhow, bail, Result};
use geo::{Coord, InteriorPoint, LineString, MultiPolygon, Polygon};
use serde_json::Value;

/// Parse a GeoJSON Polygon or MultiPolygon geometry into a geo::MultiPolygon.
pub(crate) fn parse_polygonal(geometry: &Value) -> Result<MultiPolygon<f64>> {
    let object = geometry.as_object()
        .ok_or_else(|| anyhow!("[parse_polygonal] Geometry is not an object"))?;
    let coords = object.get("coordinates").and_then(Value::as_array)
        .ok_or_else(|| anyhow!("[parse_polygonal] Geometry has no coordinates array"))?;

    match object.get("type").and_then(Value::as_str) {
        Some("Polygon") => Ok(MultiPolygon(vec![parse_polygon(coords)?])),
        Some("MultiPolygon") => coords.iter()
            .map(|poly| {
                let rings = poly.as_array()
                    .ok_or_else(|| anyhow!("[parse_polygonal] MultiPolygon member is not an array"))?;
                parse_polygon(rings)
            })
            .collect::<Result<Vec<_>>>()
            .map(MultiPolygon),
        Some(other) => bail!("[parse_polygonal] Unsupported geometry type '{other}'"),
        None => bail!("[parse_polygonal] Geometry has no type"),
    }
}

/// Parse polygon rings: the first is the exterior, the rest are holes.
fn parse_polygon(rings: &[Value]) -> Result<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| {
        ring.as_array()
            .ok_or_else(|| anyhow!("[parse_polygon] Ring is not an array"))
            .and_then(|coords| parse_ring(coords))
    });
    let exterior = rings.next()
        .ok_or_else(|| anyhow!("[parse_polygon] Polygon has no exterior ring"))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

/// Parse a ring of `[x, y]` positions, closing it if needed.
fn parse_ring(coords: &[Value]) -> Result<LineString<f64>> {
    let mut points = coords.iter()
        .map(|position| {
            let pair = position.as_array().filter(|p| p.len() >= 2)
                .ok_or_else(|| anyhow!("[parse_ring] Position must have at least two numbers"))?;
            let x = pair[0].as_f64().ok_or_else(|| anyhow!("[parse_ring] x must be a number"))?;
            let y = pair[1].as_f64().ok_or_else(|| anyhow!("[parse_ring] y must be a number"))?;
            Ok(Coord { x, y })
        })
        .collect::<Result<Vec<_>>>()?;

    if points.len() < 3 { bail!("[parse_ring] Ring needs at least three positions") }

    // Ensure ring is closed (first point == last point)
    if points.first() != points.last() {
        points.push(points[0]);
    }
    Ok(LineString(points))
}

/// Point inside the boundary at which to draw a proportional symbol, as `[lon, lat]`.
pub(crate) fn symbol_anchor(geometry: &Value) -> Result<Option<[f64; 2]>> {
    if geometry.is_null() { return Ok(None) }
    let shape = parse_polygonal(geometry)?;
    Ok(shape.interior_point().map(|p| [p.x(), p.y()]))
}
