//! Wavefront OBJ format support.
//!
//! Parsing goes through `tobj`: polygons are fan-triangulated, texture and
//! normal indices on faces are ignored, and objects and groups are merged.
//! Writes positions and triangles, and optionally one `vt` record per vertex
//! so a map can be inspected as a texture parameterization in any viewer.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::algo::parameterize::UVMap;
use crate::error::{MeshError, Result};
use crate::mesh::{build_from_triangles, to_face_vertex, HalfEdgeMesh, MeshIndex};

/// Load a triangle mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use afmap::io::obj;
/// use afmap::mesh::HalfEdgeMesh;
///
/// let mesh: HalfEdgeMesh = obj::load("disk.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<HalfEdgeMesh<I>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let (vertices, faces) = read(BufReader::new(file)).map_err(|message| MeshError::LoadError {
        path: path.to_path_buf(),
        message,
    })?;
    build_from_triangles(&vertices, &faces)
}

/// Options shared by every OBJ read: triangulated, one index per position.
fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Parse OBJ text into a face list.
///
/// Every object and group in the file is merged into one face list, with
/// bit-identical positions welded into one vertex. Material libraries are not
/// opened.
pub fn read<R: BufRead>(
    mut reader: R,
) -> std::result::Result<(Vec<Point3<f64>>, Vec<[usize; 3]>), String> {
    let (models, _) = tobj::load_obj_buf(&mut reader, &load_options(), |_| Ok(Default::default()))
        .map_err(|e| e.to_string())?;

    // tobj re-indexes positions per object, so vertices shared between
    // objects come back duplicated. Identical coordinates are welded.
    let mut vertices = Vec::new();
    let mut welded: HashMap<[u64; 3], usize> = HashMap::new();
    let mut faces = Vec::new();
    for model in &models {
        let mesh = &model.mesh;
        let ids: Vec<usize> = mesh
            .positions
            .chunks_exact(3)
            .map(|p| {
                let key = [p[0].to_bits(), p[1].to_bits(), p[2].to_bits()];
                *welded.entry(key).or_insert_with(|| {
                    vertices.push(Point3::new(p[0], p[1], p[2]));
                    vertices.len() - 1
                })
            })
            .collect();
        for t in mesh.indices.chunks_exact(3) {
            let corner = |k: usize| {
                ids.get(t[k] as usize)
                    .copied()
                    .ok_or_else(|| format!("face index {} out of range", t[k] + 1))
            };
            faces.push([corner(0)?, corner(1)?, corner(2)?]);
        }
    }

    if faces.is_empty() {
        return Err("OBJ file contains no faces".to_string());
    }
    Ok((vertices, faces))
}

/// Save a mesh to an OBJ file.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &HalfEdgeMesh<I>, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer, mesh, None)?;
    writer.flush()?;
    Ok(())
}

/// Save a mesh with one texture coordinate per vertex.
///
/// # Errors
/// `InvalidParameter` if `uv` does not cover every vertex of `mesh`.
pub fn save_with_uvs<P: AsRef<Path>, I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    uv: &UVMap<I>,
    path: P,
) -> Result<()> {
    if uv.len() != mesh.num_vertices() {
        return Err(MeshError::invalid_param(
            "uv",
            uv.len(),
            "needs one coordinate per mesh vertex",
        ));
    }
    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer, mesh, Some(uv))?;
    writer.flush()?;
    Ok(())
}

/// Write OBJ text, with `vt` records when `uv` is given.
pub fn write<W: Write, I: MeshIndex>(
    writer: &mut W,
    mesh: &HalfEdgeMesh<I>,
    uv: Option<&UVMap<I>>,
) -> Result<()> {
    let (vertices, faces) = to_face_vertex(mesh);

    writeln!(writer, "# afmap: {} vertices, {} faces", vertices.len(), faces.len())?;
    for p in &vertices {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    if let Some(uv) = uv {
        for p in uv.as_slice() {
            writeln!(writer, "vt {} {}", p.x, p.y)?;
        }
    }
    for [a, b, c] in faces {
        if uv.is_some() {
            writeln!(writer, "f {0}/{0} {1}/{1} {2}/{2}", a + 1, b + 1, c + 1)?;
        } else {
            writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
        }
    }
    Ok(())
}
