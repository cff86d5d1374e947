use nalgebra::Point2;
use rayon::prelude::*;

use crate::mesh::{write_quad_indices, SpriteMesh, SpriteVertex};
use crate::{Renderable, SpriteSheet, SpriteTransform, INDICES_PER_SPRITE, VERTICES_PER_SPRITE};

// Unit quad corners in sprite space, in the winding the index buffer expects
const QUAD_CORNERS: [[f32; 2]; VERTICES_PER_SPRITE] =
    [[-0.5, -0.5], [0.5, -0.5], [0.5, 0.5], [-0.5, 0.5]];

// SpriteBatcher turns an ordered slice of sprites into a single mesh. Sprites are emitted in
// slice order, so the caller decides the paint order.
pub struct SpriteBatcher {
    sheet: SpriteSheet,

    // sprites per parallel vertex job
    vertex_batch_size: usize,
    // sprites per parallel index job
    index_batch_size: usize,
}

impl SpriteBatcher {
    pub fn new(sheet: SpriteSheet, vertex_batch_size: usize, index_batch_size: usize) -> Self {
        SpriteBatcher {
            sheet,
            vertex_batch_size: vertex_batch_size.max(1),
            index_batch_size: index_batch_size.max(1),
        }
    }

    pub fn sheet(&self) -> &SpriteSheet {
        &self.sheet
    }

    // build streams the sprites into `mesh` in chunks on the current rayon pool
    pub fn build<R>(&self, sprites: &[R], mesh: &mut SpriteMesh)
    where
        R: Renderable + Sync,
    {
        let rebuild_indices = mesh.resize(sprites.len());

        let visible = mesh
            .vertices
            .par_chunks_mut(self.vertex_batch_size * VERTICES_PER_SPRITE)
            .zip(sprites.par_chunks(self.vertex_batch_size))
            .map(|(vertices, sprites)| write_sprite_vertices(&self.sheet, sprites, vertices))
            .sum();
        mesh.set_visible_count(visible);

        // Quad indices only depend on the sprite count
        if rebuild_indices {
            let batch = self.index_batch_size;
            mesh.indices
                .par_chunks_mut(batch * INDICES_PER_SPRITE)
                .enumerate()
                .for_each(|(chunk, indices)| write_quad_indices(chunk * batch, indices));
        }
    }

    // build_sequential produces the same mesh as build without touching a thread pool
    pub fn build_sequential<R>(&self, sprites: &[R], mesh: &mut SpriteMesh)
    where
        R: Renderable,
    {
        let rebuild_indices = mesh.resize(sprites.len());

        let visible = mesh
            .vertices
            .chunks_mut(self.vertex_batch_size * VERTICES_PER_SPRITE)
            .zip(sprites.chunks(self.vertex_batch_size))
            .map(|(vertices, sprites)| write_sprite_vertices(&self.sheet, sprites, vertices))
            .sum();
        mesh.set_visible_count(visible);

        if rebuild_indices {
            write_quad_indices(0, &mut mesh.indices);
        }
    }
}

// Returns the number of visible sprites written
fn write_sprite_vertices<R: Renderable>(
    sheet: &SpriteSheet,
    sprites: &[R],
    vertices: &mut [SpriteVertex],
) -> usize {
    let mut visible = 0;

    for (sprite, quad) in sprites.iter().zip(vertices.chunks_mut(VERTICES_PER_SPRITE)) {
        let position = sprite.position();

        if !sprite.is_visible() {
            // Collapse to a zero area quad so the index buffer can stay static
            quad.fill(SpriteVertex {
                position: [position.x, position.y],
                uv: [0.0, 0.0],
                color: [0.0; 4],
            });
            continue;
        }

        let transform =
            SpriteTransform::new(position, sprite.rotation_angle(), sprite.scale()).to_homogeneous();
        let (uv_min, uv_max) = sheet.uv_rect(sprite.sprite_index());
        let uvs = [
            [uv_min.x, uv_max.y],
            [uv_max.x, uv_max.y],
            [uv_max.x, uv_min.y],
            [uv_min.x, uv_min.y],
        ];
        let color = sprite.color();

        for ((vertex, corner), uv) in quad.iter_mut().zip(QUAD_CORNERS).zip(uvs) {
            let p = transform.transform_point(&Point2::from(corner));

            *vertex = SpriteVertex {
                position: [p.x, p.y],
                uv,
                color: [color.x, color.y, color.z, color.w],
            };
        }

        visible += 1;
    }

    visible
}
