use std::rc::Rc;

use glam::Vec3;

use crate::core::vertex::Vertex;

/// CPU-side mesh. Terrain tiers share their index buffer through the
/// topology cache; prototype meshes own theirs.
#[derive(Clone, Debug)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Rc<[u32]>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn byte_size(&self) -> usize {
        std::mem::size_of_val(self.vertices.as_slice()) + std::mem::size_of_val(&*self.indices)
    }
}

/// Index buffer for a `(segments + 1)^2` row-major vertex grid. Triangles
/// wind so that a flat grid faces +Y.
pub fn grid_indices(segments: u32) -> Vec<u32> {
    let side = segments + 1;
    let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
    for row in 0..segments {
        for col in 0..segments {
            let a = row * side + col;
            let b = a + 1;
            let c = a + side;
            let d = c + 1;
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }
    indices
}

/// Recompute smooth vertex normals from the displaced positions. Each
/// vertex gets the area-weighted sum of its adjacent face normals.
pub fn compute_vertex_normals(vertices: &mut [Vertex], indices: &[u32]) {
    let mut accum = vec![Vec3::ZERO; vertices.len()];
    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let p0 = Vec3::from(vertices[i0].position);
        let p1 = Vec3::from(vertices[i1].position);
        let p2 = Vec3::from(vertices[i2].position);
        let face = (p1 - p0).cross(p2 - p0);
        accum[i0] += face;
        accum[i1] += face;
        accum[i2] += face;
    }
    for (vertex, n) in vertices.iter_mut().zip(accum) {
        vertex.normal = n.try_normalize().unwrap_or(Vec3::Y).to_array();
    }
}

pub fn add_quad(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    corners: [Vec3; 4],
    normal: Vec3,
    color: [f32; 3],
) {
    let base_idx = vertices.len() as u32;
    for corner in corners {
        vertices.push(Vertex::new(corner.to_array(), normal.to_array(), color));
    }
    indices.extend_from_slice(&[
        base_idx,
        base_idx + 1,
        base_idx + 2,
        base_idx,
        base_idx + 2,
        base_idx + 3,
    ]);
}

/// Axis-aligned box centered at `center` with half extents `half`.
pub fn add_box(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    center: Vec3,
    half: Vec3,
    color: [f32; 3],
) {
    let corner = |sx: f32, sy: f32, sz: f32| center + half * Vec3::new(sx, sy, sz);
    let c = [
        corner(-1.0, -1.0, -1.0),
        corner(1.0, -1.0, -1.0),
        corner(1.0, 1.0, -1.0),
        corner(-1.0, 1.0, -1.0),
        corner(-1.0, -1.0, 1.0),
        corner(1.0, -1.0, 1.0),
        corner(1.0, 1.0, 1.0),
        corner(-1.0, 1.0, 1.0),
    ];

    let faces = [
        ([4, 5, 6, 7], Vec3::Z),
        ([1, 0, 3, 2], Vec3::NEG_Z),
        ([5, 1, 2, 6], Vec3::X),
        ([0, 4, 7, 3], Vec3::NEG_X),
        ([7, 6, 2, 3], Vec3::Y),
        ([0, 1, 5, 4], Vec3::NEG_Y),
    ];

    for (face, normal) in faces {
        add_quad(
            vertices,
            indices,
            [c[face[0]], c[face[1]], c[face[2]], c[face[3]]],
            normal,
            color,
        );
    }
}

/// Square-based pyramid standing on `base_y`, used for conifer crowns.
pub fn add_pyramid(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    base_y: f32,
    half_width: f32,
    height: f32,
    color: [f32; 3],
) {
    let apex = Vec3::new(0.0, base_y + height, 0.0);
    let base = [
        Vec3::new(-half_width, base_y, -half_width),
        Vec3::new(half_width, base_y, -half_width),
        Vec3::new(half_width, base_y, half_width),
        Vec3::new(-half_width, base_y, half_width),
    ];
    for i in 0..4 {
        let a = base[i];
        let b = base[(i + 1) % 4];
        let normal = (apex - a).cross(b - a).try_normalize().unwrap_or(Vec3::Y);
        let base_idx = vertices.len() as u32;
        for p in [a, apex, b] {
            vertices.push(Vertex::new(p.to_array(), normal.to_array(), color));
        }
        indices.extend_from_slice(&[base_idx, base_idx + 1, base_idx + 2]);
    }
}

pub fn build_tree_mesh() -> MeshData {
    let mut vertices = Vec::with_capacity(36);
    let mut indices = Vec::with_capacity(48);
    let bark = [0.36, 0.25, 0.16];
    let needles = [0.16, 0.38, 0.18];

    add_box(
        &mut vertices,
        &mut indices,
        Vec3::new(0.0, 0.75, 0.0),
        Vec3::new(0.15, 0.75, 0.15),
        bark,
    );
    add_pyramid(&mut vertices, &mut indices, 1.2, 1.1, 2.2, needles);
    add_pyramid(&mut vertices, &mut indices, 2.4, 0.8, 1.8, needles);

    MeshData {
        vertices,
        indices: indices.into(),
    }
}

pub fn build_grass_mesh() -> MeshData {
    let mut vertices = Vec::with_capacity(8);
    let mut indices = Vec::with_capacity(12);
    let blade = [0.35, 0.60, 0.22];

    // Two crossed quads
    add_quad(
        &mut vertices,
        &mut indices,
        [
            Vec3::new(-0.3, 0.0, 0.0),
            Vec3::new(0.3, 0.0, 0.0),
            Vec3::new(0.3, 0.5, 0.0),
            Vec3::new(-0.3, 0.5, 0.0),
        ],
        Vec3::Z,
        blade,
    );
    add_quad(
        &mut vertices,
        &mut indices,
        [
            Vec3::new(0.0, 0.0, -0.3),
            Vec3::new(0.0, 0.0, 0.3),
            Vec3::new(0.0, 0.5, 0.3),
            Vec3::new(0.0, 0.5, -0.3),
        ],
        Vec3::X,
        blade,
    );

    MeshData {
        vertices,
        indices: indices.into(),
    }
}

pub fn build_rock_mesh() -> MeshData {
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    add_box(
        &mut vertices,
        &mut indices,
        Vec3::new(0.0, 0.3, 0.0),
        Vec3::new(0.6, 0.35, 0.5),
        [0.46, 0.44, 0.42],
    );
    MeshData {
        vertices,
        indices: indices.into(),
    }
}

/// Blocky quadruped: body, head, four legs. Dimensions are for scale 1.
pub fn build_quadruped_mesh(body: Vec3, color: [f32; 3]) -> MeshData {
    let mut vertices = Vec::with_capacity(144);
    let mut indices = Vec::with_capacity(216);
    let leg_height = body.y * 0.8;
    let leg_half = Vec3::new(body.x * 0.12, leg_height * 0.5, body.x * 0.12);

    add_box(
        &mut vertices,
        &mut indices,
        Vec3::new(0.0, leg_height + body.y * 0.5, 0.0),
        body * 0.5,
        color,
    );
    add_box(
        &mut vertices,
        &mut indices,
        Vec3::new(0.0, leg_height + body.y * 1.1, body.z * 0.6),
        Vec3::splat(body.y * 0.35),
        color,
    );
    for (sx, sz) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        add_box(
            &mut vertices,
            &mut indices,
            Vec3::new(sx * body.x * 0.35, leg_height * 0.5, sz * body.z * 0.35),
            leg_half,
            color,
        );
    }

    MeshData {
        vertices,
        indices: indices.into(),
    }
}
