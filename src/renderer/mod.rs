//! Software raycasting renderer
//!
//! Draws a `GameState` into a flat 0xRRGGBB pixel buffer. Each frame is
//! fully overwritten: sky/floor prefill, wall strips with floor casting,
//! depth-tested sprites, then the damage flash overlay. Rendering only
//! reads the state.

pub mod atlas;
pub mod raycast;
pub mod sprites;
pub mod texture;

pub use atlas::PatternAtlas;
pub use raycast::{RayHit, Side, cast_ray};
pub use sprites::{Sprite, collect_sprites};
pub use texture::{TEXTURE_SIZE, TRANSPARENT, Texture, TextureError, TextureId, TextureSource};

use thiserror::Error;

use crate::sim::GameState;

pub const SKY_COLOR: u32 = 0x87CEEB;
pub const FLOOR_COLOR: u32 = 0xD2B48C;
/// Damage overlay colour and its alpha out of 255
pub const FLASH_COLOR: u32 = 0xFF0000;
pub const FLASH_ALPHA: u32 = 100;

/// Largest accepted viewport side
pub const MAX_DIMENSION: usize = 8192;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RenderConfigError {
    #[error("viewport must be at least 1x1, got {width}x{height}")]
    Empty { width: usize, height: usize },
    #[error("viewport {width}x{height} exceeds {max} pixels per side")]
    TooLarge {
        width: usize,
        height: usize,
        max: usize,
    },
}

/// Viewport dimensions, validated once and handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    width: usize,
    height: usize,
}

impl RenderConfig {
    pub fn new(width: usize, height: usize) -> Result<Self, RenderConfigError> {
        if width == 0 || height == 0 {
            return Err(RenderConfigError::Empty { width, height });
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(RenderConfigError::TooLarge {
                width,
                height,
                max: MAX_DIMENSION,
            });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

/// Row-major RGB frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            pixels: vec![0; config.width * config.height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, color: u32) {
        self.pixels[y * self.width + x] = color;
    }

    /// Sky over the top half, sand under it
    fn prefill(&mut self) {
        let half = self.pixels.len() / 2;
        self.pixels[..half].fill(SKY_COLOR);
        self.pixels[half..].fill(FLOOR_COLOR);
    }

    /// Blend a translucent colour over every pixel
    fn tint(&mut self, color: u32, alpha: u32) {
        for p in &mut self.pixels {
            *p = blend(*p, color, alpha);
        }
    }

    /// Binary PPM (P6) encoding of the frame
    pub fn to_ppm(&self) -> Vec<u8> {
        let mut out = format!("P6\n{} {}\n255\n", self.width, self.height).into_bytes();
        out.reserve(self.pixels.len() * 3);
        for &p in &self.pixels {
            out.extend_from_slice(&[(p >> 16) as u8, (p >> 8) as u8, p as u8]);
        }
        out
    }
}

/// `alpha`/255 of `over` on top of `base`, per channel
fn blend(base: u32, over: u32, alpha: u32) -> u32 {
    let mix = |shift: u32| {
        let b = (base >> shift) & 0xFF;
        let o = (over >> shift) & 0xFF;
        ((o * alpha + b * (255 - alpha)) / 255) << shift
    };
    mix(16) | mix(8) | mix(0)
}

/// Raycaster bound to a viewport and a texture supplier
pub struct Renderer<T: TextureSource> {
    config: RenderConfig,
    textures: T,
    /// Wall depth per screen column from the last frame
    z_buffer: Vec<f32>,
}

impl<T: TextureSource> Renderer<T> {
    pub fn new(config: RenderConfig, textures: T) -> Self {
        Self {
            config,
            textures,
            z_buffer: vec![f32::MAX; config.width],
        }
    }

    pub fn config(&self) -> RenderConfig {
        self.config
    }

    /// A blank frame of the right size
    pub fn new_frame(&self) -> FrameBuffer {
        FrameBuffer::new(self.config)
    }

    pub fn z_buffer(&self) -> &[f32] {
        &self.z_buffer
    }

    /// Draw one frame of `state`, offset vertically by `bob` pixels
    pub fn render(&mut self, state: &GameState, bob: f32, frame: &mut FrameBuffer) {
        if frame.width != self.config.width || frame.height != self.config.height {
            *frame = self.new_frame();
        }
        frame.prefill();

        let camera = &state.camera;
        for x in 0..self.config.width {
            let hit = raycast::draw_column(frame, x, camera, &state.grid, &self.textures, bob);
            self.z_buffer[x] = hit.perp_dist;
        }

        let sprites = collect_sprites(state);
        sprites::draw_sprites(frame, &sprites, camera, &self.z_buffer, &self.textures, bob);

        if state.damage_flash > 0 {
            frame.tint(FLASH_COLOR, FLASH_ALPHA);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Camera, Cell, GridMap};
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const WALL: u32 = 0x102030;
    const SAND: u32 = 0x405060;
    const SPIKES: u32 = 0x203020;
    const FOE: u32 = 0x00FF00;

    /// Solid colour per slot; the emperor is fully transparent
    struct Solid(Vec<Texture>);

    impl Solid {
        fn new() -> Self {
            Self(
                TextureId::ALL
                    .iter()
                    .map(|id| match id {
                        TextureId::Crowd | TextureId::Gate => Texture::solid(WALL),
                        TextureId::Sand => Texture::solid(SAND),
                        TextureId::Spikes => Texture::solid(SPIKES),
                        TextureId::Emperor => Texture::solid(TRANSPARENT),
                        _ => Texture::solid(FOE),
                    })
                    .collect(),
            )
        }
    }

    impl TextureSource for Solid {
        fn texture(&self, id: TextureId) -> &Texture {
            &self.0[id.index()]
        }
    }

    /// 16x16 walled room with the camera in the middle looking down +x
    fn room_state() -> GameState {
        let size = 16;
        let mut cells = vec![Cell::Floor; size * size];
        for y in 0..size {
            for x in 0..size {
                if x == 0 || y == 0 || x == size - 1 || y == size - 1 {
                    cells[y * size + x] = Cell::Wall;
                }
            }
        }
        let grid = GridMap::from_cells(size, size, cells);
        let mut state = GameState::with_grid(1, Pcg32::seed_from_u64(1), grid);
        state.camera = Camera::new(Vec2::new(8.5, 8.5), Vec2::X, 0.66);
        state
    }

    fn renderer() -> Renderer<Solid> {
        Renderer::new(RenderConfig::new(64, 48).unwrap(), Solid::new())
    }

    #[test]
    fn test_config_rejects_bad_sizes() {
        assert_eq!(
            RenderConfig::new(0, 10),
            Err(RenderConfigError::Empty {
                width: 0,
                height: 10
            })
        );
        assert!(matches!(
            RenderConfig::new(10, MAX_DIMENSION + 1),
            Err(RenderConfigError::TooLarge { .. })
        ));
        assert!(RenderConfig::new(800, 600).is_ok());
    }

    #[test]
    fn test_wall_sky_and_floor() {
        let state = room_state();
        let mut r = renderer();
        let mut frame = r.new_frame();
        r.render(&state, 0.0, &mut frame);

        assert_eq!(frame.get(32, 24), WALL);
        assert_eq!(frame.get(32, 0), SKY_COLOR);
        let floor = frame.get(32, 47);
        assert!(floor == SAND || floor == texture::darken(SAND));
        assert!((r.z_buffer()[32] - 6.5).abs() < 1e-4);
    }

    #[test]
    fn test_y_faces_are_darker() {
        let mut state = room_state();
        state.camera = Camera::new(Vec2::new(8.5, 8.5), Vec2::Y, 0.66);
        let mut r = renderer();
        let mut frame = r.new_frame();
        r.render(&state, 0.0, &mut frame);
        assert_eq!(frame.get(32, 24), texture::darken(WALL));
    }

    #[test]
    fn test_bob_shifts_the_view() {
        let state = room_state();
        let mut r = renderer();
        let mut level = r.new_frame();
        let mut bobbed = r.new_frame();
        r.render(&state, 0.0, &mut level);
        r.render(&state, 6.0, &mut bobbed);
        // the wall strip moves down with a positive offset
        assert_eq!(level.get(32, 22), WALL);
        assert_eq!(bobbed.get(32, 22), SKY_COLOR);
        assert_eq!(bobbed.get(32, 30), WALL);
    }

    #[test]
    fn test_extreme_bob_stays_in_frame() {
        let state = room_state();
        let mut r = renderer();
        let mut frame = r.new_frame();
        for bob in [-1000.0, -48.0, -24.0, -23.5, 23.5, 24.0, 48.0, 1000.0, f32::NAN] {
            r.render(&state, bob, &mut frame);
            assert_eq!(frame.pixels().len(), 64 * 48);
        }

        // horizon pushed to the bottom edge: the sand prefill is left alone
        r.render(&state, 24.0, &mut frame);
        assert_eq!(frame.get(32, 45), WALL);
        assert_eq!(frame.get(32, 47), FLOOR_COLOR);
    }

    #[test]
    fn test_bob_moves_sprites_with_walls() {
        let mut state = room_state();
        // 2.9 ahead: a 16 pixel sprite over rows 16..32
        state.add_enemy(Vec2::new(11.4, 8.5));
        let mut r = renderer();
        let mut frame = r.new_frame();

        let first_foe_row =
            |frame: &FrameBuffer| (0..frame.height()).find(|&y| frame.get(32, y) == FOE);
        r.render(&state, 0.0, &mut frame);
        assert_eq!(first_foe_row(&frame), Some(16));
        r.render(&state, 6.0, &mut frame);
        assert_eq!(first_foe_row(&frame), Some(22));
    }

    #[test]
    fn test_trap_floor_is_hatched() {
        let mut state = room_state();
        let mut cells = Vec::new();
        for y in 0..16 {
            for x in 0..16 {
                cells.push(state.grid.cell(x, y));
            }
        }
        for c in cells.iter_mut() {
            if *c == Cell::Floor {
                *c = Cell::Trap;
            }
        }
        state.grid = GridMap::from_cells(16, 16, cells);

        let mut r = renderer();
        let mut frame = r.new_frame();
        r.render(&state, 0.0, &mut frame);
        let bottom: Vec<u32> = (0..64).map(|x| frame.get(x, 47)).collect();
        assert!(bottom.iter().all(|&c| c == SPIKES || c == 0x111111));
        assert!(bottom.contains(&SPIKES));
    }

    #[test]
    fn test_enemy_in_view_is_drawn() {
        let mut state = room_state();
        state.add_enemy(Vec2::new(11.5, 8.5));
        let mut r = renderer();
        let mut frame = r.new_frame();
        r.render(&state, 0.0, &mut frame);
        assert_eq!(frame.get(32, 24), FOE);
    }

    #[test]
    fn test_enemy_behind_wall_is_hidden() {
        let mut state = room_state();
        let mut cells = Vec::new();
        for y in 0..16 {
            for x in 0..16 {
                cells.push(state.grid.cell(x, y));
            }
        }
        // pillar between camera and enemy
        cells[8 * 16 + 10] = Cell::Wall;
        state.grid = GridMap::from_cells(16, 16, cells);
        state.add_enemy(Vec2::new(12.5, 8.5));

        let mut r = renderer();
        let mut frame = r.new_frame();
        r.render(&state, 0.0, &mut frame);
        assert!(!frame.pixels().contains(&FOE));
    }

    #[test]
    fn test_enemy_behind_camera_is_skipped() {
        let mut state = room_state();
        state.add_enemy(Vec2::new(5.5, 8.5));
        let mut r = renderer();
        let mut frame = r.new_frame();
        r.render(&state, 0.0, &mut frame);
        assert!(!frame.pixels().contains(&FOE));
    }

    #[test]
    fn test_transparent_sprite_leaves_background() {
        let mut state = room_state();
        state.emperor.pos = Vec2::new(11.5, 8.5);
        let mut r = renderer();
        let mut with = r.new_frame();
        r.render(&state, 0.0, &mut with);

        state.emperor.pos = Vec2::new(8.0, 1.5);
        let mut without = r.new_frame();
        r.render(&state, 0.0, &mut without);
        assert_eq!(with, without);
    }

    #[test]
    fn test_damage_flash_tints_red() {
        let mut state = room_state();
        state.damage_flash = 3;
        let mut r = renderer();
        let mut frame = r.new_frame();
        r.render(&state, 0.0, &mut frame);
        assert_eq!(frame.get(32, 0), blend(SKY_COLOR, FLASH_COLOR, FLASH_ALPHA));
        assert!(frame.get(32, 0) >> 16 > SKY_COLOR >> 16);
    }

    #[test]
    fn test_wrong_sized_frame_is_replaced() {
        let state = room_state();
        let mut r = renderer();
        let mut frame = FrameBuffer::new(RenderConfig::new(4, 4).unwrap());
        r.render(&state, 0.0, &mut frame);
        assert_eq!((frame.width(), frame.height()), (64, 48));
    }

    #[test]
    fn test_ppm_header_and_size() {
        let mut frame = FrameBuffer::new(RenderConfig::new(2, 1).unwrap());
        frame.set(0, 0, 0x0A0B0C);
        let ppm = frame.to_ppm();
        let header = b"P6\n2 1\n255\n";
        assert_eq!(&ppm[..header.len()], header);
        assert_eq!(&ppm[header.len()..], &[0x0A, 0x0B, 0x0C, 0, 0, 0]);
    }
}
