//! OBJ file loader for 3D models

use std::path::Path;

use thiserror::Error;

use crate::render::{MeshData, Vertex};

/// OBJ parsing errors
#[derive(Error, Debug)]
pub enum ObjError {
    /// File could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A number or index failed to parse
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },
    /// The file parsed but describes no usable geometry
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Wavefront OBJ reader
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file and return its mesh
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<MeshData, ObjError> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    /// Parse OBJ text. Faces with more than three corners are fan-triangulated;
    /// negative (relative) indices are supported.
    pub fn parse(source: &str) -> Result<MeshData, ObjError> {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();
        let mut tex_coords: Vec<[f32; 2]> = Vec::new();
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for (number, line) in source.lines().enumerate() {
            let line_no = number + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split_whitespace();
            let Some(keyword) = parts.next() else {
                continue;
            };
            let args: Vec<&str> = parts.collect();

            match keyword {
                "v" => positions.push(parse_floats::<3>(&args, line_no, "vertex")?),
                "vn" => normals.push(parse_floats::<3>(&args, line_no, "normal")?),
                "vt" => tex_coords.push(parse_floats::<2>(&args, line_no, "texture coordinate")?),
                "f" => {
                    if args.len() < 3 {
                        return Err(parse_error(line_no, "face needs at least three corners"));
                    }
                    let first = vertices.len();
                    for corner in &args {
                        let mut refs = corner.split('/');
                        let position = refs
                            .next()
                            .map(|s| resolve_index(s, positions.len(), line_no))
                            .transpose()?
                            .flatten()
                            .and_then(|i| positions.get(i))
                            .ok_or_else(|| parse_error(line_no, "position index out of range"))?;
                        let tex_coord = match refs.next() {
                            Some(s) => resolve_index(s, tex_coords.len(), line_no)?.and_then(|i| tex_coords.get(i)),
                            None => None,
                        };
                        let normal = match refs.next() {
                            Some(s) => resolve_index(s, normals.len(), line_no)?.and_then(|i| normals.get(i)),
                            None => None,
                        };
                        vertices.push(Vertex::new(
                            *position,
                            normal.copied().unwrap_or([0.0, 1.0, 0.0]),
                            tex_coord.copied().unwrap_or([0.0, 0.0]),
                        ));
                    }
                    let to_u32 = |i: usize| u32::try_from(i).map_err(|_| parse_error(line_no, "too many vertices"));
                    for i in 1..args.len() - 1 {
                        indices.push(to_u32(first)?);
                        indices.push(to_u32(first + i)?);
                        indices.push(to_u32(first + i + 1)?);
                    }
                }
                _ => {}
            }
        }

        if vertices.is_empty() {
            return Err(ObjError::InvalidFormat("No faces found in OBJ file".to_string()));
        }
        Ok(MeshData::new(vertices, indices))
    }
}

fn parse_error(line: usize, message: &str) -> ObjError {
    ObjError::Parse {
        line,
        message: message.to_string(),
    }
}

fn parse_floats<const N: usize>(args: &[&str], line: usize, what: &str) -> Result<[f32; N], ObjError> {
    if args.len() < N {
        return Err(parse_error(line, &format!("{what} needs {N} components")));
    }
    let mut out = [0.0; N];
    for (slot, text) in out.iter_mut().zip(args) {
        *slot = text
            .parse()
            .map_err(|_| parse_error(line, &format!("invalid {what} component '{text}'")))?;
    }
    Ok(out)
}

/// Convert a 1-based (or negative, relative) OBJ index; empty means absent
fn resolve_index(text: &str, count: usize, line: usize) -> Result<Option<usize>, ObjError> {
    if text.is_empty() {
        return Ok(None);
    }
    let value: i64 = text
        .parse()
        .map_err(|_| parse_error(line, &format!("invalid index '{text}'")))?;
    let resolved = match value {
        v if v > 0 => usize::try_from(v - 1).ok(),
        v if v < 0 => usize::try_from(v.unsigned_abs()).ok().and_then(|back| count.checked_sub(back)),
        _ => None,
    };
    match resolved {
        Some(index) => Ok(Some(index)),
        None => Err(parse_error(line, &format!("index '{text}' out of range"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# unit quad
v 0 0 0
v 1 0 0
v 1 0 1
v 0 0 1
vt 0 0
vt 1 1
vn 0 1 0
f 1/1/1 2/2/1 3/2/1 4/1/1
";

    #[test]
    fn quads_are_fan_triangulated() {
        let mesh = ObjLoader::parse(QUAD).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.vertices[1].tex_coord, [1.0, 1.0]);
        assert_eq!(mesh.vertices[2].position, [1.0, 0.0, 1.0]);
    }

    #[test]
    fn relative_indices_and_missing_attributes() {
        let mesh = ObjLoader::parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertices[0].normal, [0.0, 1.0, 0.0]);
        assert_eq!(mesh.vertices[2].position, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn position_only_and_position_normal_corners() {
        let mesh = ObjLoader::parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n").unwrap();
        assert_eq!(mesh.vertices[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(mesh.vertices[0].tex_coord, [0.0, 0.0]);
    }

    #[test]
    fn errors_carry_line_numbers() {
        match ObjLoader::parse("v 0 0 0\nv 1 x 0\n") {
            Err(ObjError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            ObjLoader::parse("v 0 0 0\nf 1 2 3\n"),
            Err(ObjError::Parse { line: 2, .. })
        ));
        assert!(matches!(ObjLoader::parse("v 0 0 0\n"), Err(ObjError::InvalidFormat(_))));
    }
}
