//! Geometry producers for the demo driver: OBJ meshes and the procedural
//! cube.

use anyhow::{bail, Context, Result};
use obj::Obj;
use std::path::Path;
use toonray::{Color, GroupId, Primitive, Triangle, Vec3};

/// Load a triangulated OBJ file as one logical object.
///
/// File normals are negated for this renderer's reversed coordinate system
/// (+z away from the camera); faces without normals fall back to
/// winding-derived ones.
pub fn load_obj(
    path: &Path,
    scale: f64,
    offset: Vec3,
    color: Color,
    reflectiveness: f64,
    group: GroupId,
) -> Result<Vec<Primitive>> {
    let model = Obj::load(path).with_context(|| format!("loading model {}", path.display()))?;
    let data = &model.data;

    let mut triangles = Vec::new();
    for object in &data.objects {
        for obj_group in &object.groups {
            for poly in &obj_group.polys {
                let indices = &poly.0;
                if indices.len() != 3 {
                    bail!(
                        "model {} has a face with {} vertices, expected triangles",
                        path.display(),
                        indices.len()
                    );
                }

                let vertex = |slot: usize| -> Result<Vec3> {
                    let i = indices[slot].0;
                    let p = data
                        .position
                        .get(i)
                        .with_context(|| format!("vertex index {i} out of range"))?;
                    Ok(Vec3::new(p[0] as f64, p[1] as f64, p[2] as f64) * scale + offset)
                };
                let (a, b, c) = (vertex(0)?, vertex(1)?, vertex(2)?);

                let normal = indices[0].2.and_then(|i| data.normal.get(i)).map(|n| {
                    -Vec3::new(n[0] as f64, n[1] as f64, n[2] as f64)
                });

                let triangle = match normal {
                    Some(normal) => Triangle::with_normal(
                        a,
                        b,
                        c,
                        normal,
                        color,
                        reflectiveness,
                        8.0,
                        Some(group),
                    ),
                    None => Triangle::new(a, b, c, color, reflectiveness, 8.0, Some(group)),
                }
                .with_context(|| format!("degenerate face in {}", path.display()))?;

                triangles.push(triangle.into());
            }
        }
    }

    if triangles.is_empty() {
        bail!("model {} contains no triangles", path.display());
    }
    Ok(triangles)
}

/// Face corners and colors of the unit cube, clockwise for this coordinate
/// system. From the cube_regl.js example data.
const CUBE_FACES: [([[f64; 3]; 4], [f64; 3]); 6] = [
    (
        [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]],
        [1.0, 0.0, 0.0],
    ),
    (
        [[-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, -1.0, 1.0]],
        [0.0, 1.0, 0.0],
    ),
    (
        [[-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0]],
        [0.0, 0.0, 1.0],
    ),
    (
        [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [-1.0, -1.0, -1.0]],
        [1.0, 0.0, 1.0],
    ),
    (
        [[1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0]],
        [0.0, 1.0, 1.0],
    ),
    (
        [[-1.0, -1.0, 1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0]],
        [1.0, 1.0, 0.0],
    ),
];

/// The unit cube as twelve colored triangles, scaled and offset into place.
pub fn cube(
    scale: f64,
    offset: Vec3,
    reflectiveness: f64,
    group: GroupId,
) -> Result<Vec<Primitive>> {
    let mut triangles = Vec::with_capacity(12);
    for (corners, rgb) in CUBE_FACES {
        let corner = |i: usize| Vec3::new(corners[i][0], corners[i][1], corners[i][2]) * scale + offset;
        let color = Color::new(rgb[0], rgb[1], rgb[2]) * 255.0;
        for [i, j, k] in [[0usize, 1, 2], [0, 2, 3]] {
            let triangle = Triangle::new(
                corner(i),
                corner(j),
                corner(k),
                color,
                reflectiveness,
                8.0,
                Some(group),
            )
            .context("cube face triangle is degenerate")?;
            triangles.push(triangle.into());
        }
    }
    Ok(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use toonray::Surface;

    #[test]
    fn cube_has_twelve_triangles_around_its_center() {
        let group = GroupId(9);
        let cube = cube(10.0, Vec3::new(0.0, 5.0, 0.0), 0.25, group).unwrap();
        assert_eq!(cube.len(), 12);
        for primitive in &cube {
            assert_eq!(primitive.group(), Some(group));
            assert_eq!(primitive.reflectiveness(), 0.25);
            let bounds = primitive.bounds();
            assert!(bounds.min.x >= -10.0 && bounds.max.x <= 10.0);
            assert!(bounds.min.y >= -5.0 && bounds.max.y <= 15.0);
        }
    }
}
