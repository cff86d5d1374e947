pub const VERTICES_PER_SPRITE: usize = 4;
pub const INDICES_PER_SPRITE: usize = 6;

// Two counter-clockwise triangles over the quad corners (bl, br, tr, tl)
const QUAD_INDICES: [u32; INDICES_PER_SPRITE] = [0, 1, 2, 0, 2, 3];

#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

// CPU side geometry for one frame of sprites. The buffers are reused between frames, they only
// grow when the sprite count does.
#[derive(Debug, Default)]
pub struct SpriteMesh {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
    sprite_count: usize,
    visible_count: usize,
}

impl SpriteMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(sprites: usize) -> Self {
        SpriteMesh {
            vertices: Vec::with_capacity(sprites * VERTICES_PER_SPRITE),
            indices: Vec::with_capacity(sprites * INDICES_PER_SPRITE),
            sprite_count: 0,
            visible_count: 0,
        }
    }

    pub fn sprite_count(&self) -> usize {
        self.sprite_count
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub(crate) fn set_visible_count(&mut self, visible_count: usize) {
        self.visible_count = visible_count
    }

    // Sizes both buffers for `sprites` quads. Returns true when the index buffer has to be
    // regenerated.
    pub(crate) fn resize(&mut self, sprites: usize) -> bool {
        let changed = sprites != self.sprite_count || self.indices.len() != sprites * INDICES_PER_SPRITE;

        self.vertices
            .resize(sprites * VERTICES_PER_SPRITE, SpriteVertex::default());
        self.indices.resize(sprites * INDICES_PER_SPRITE, 0);
        self.sprite_count = sprites;

        changed
    }
}

// Fills `indices` for the quads starting at sprite `first_sprite`
pub(crate) fn write_quad_indices(first_sprite: usize, indices: &mut [u32]) {
    for (i, quad) in indices.chunks_mut(INDICES_PER_SPRITE).enumerate() {
        let base = ((first_sprite + i) * VERTICES_PER_SPRITE) as u32;

        for (index, offset) in quad.iter_mut().zip(QUAD_INDICES) {
            *index = base + offset;
        }
    }
}
