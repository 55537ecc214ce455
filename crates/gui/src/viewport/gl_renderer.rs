use std::collections::HashMap;

use glam::Mat4;
use glow::HasContext;

use shared::ElementId;

use super::camera::ArcBallCamera;
use super::host::{ContextState, RenderHostState, SnapshotPixels};
use crate::asset::GarmentAsset;
use crate::state::design::DecodedImage;
use crate::viewport::mesh::VERTEX_STRIDE;

// ── Render parameters ────────────────────────────────────────

/// Parameters for rendering one frame of the garment viewport
pub struct RenderParams {
    /// Viewport rectangle [x, y, width, height] in pixels
    pub viewport: [f32; 4],
    /// Background color RGB
    pub bg_color: [u8; 3],
    /// Garment base color, linearized
    pub garment_color: [f32; 3],
}

/// One printed-image element, resolved for drawing
pub struct DecalDraw {
    pub id: ElementId,
    pub pixels: DecodedImage,
    /// Decal box local -> world
    pub model: Mat4,
}

// ── GPU handles ──────────────────────────────────────────────

struct GpuMesh {
    vao: glow::VertexArray,
    _vbo: glow::Buffer,
    ibo: glow::Buffer,
    index_count: i32,
}

struct GpuPiece {
    mesh: GpuMesh,
    model: Mat4,
}

// ── Main GL renderer ─────────────────────────────────────────

pub struct GlRenderer {
    host: RenderHostState,
    piece_program: glow::Program,
    decal_program: glow::Program,
    /// Garment pieces uploaded once per context generation
    pieces: Vec<GpuPiece>,
    target_piece: usize,
    /// Decal textures keyed by element ID
    textures: HashMap<ElementId, glow::Texture>,
    /// Context generation the GPU resources above belong to
    resources_generation: u64,
    snapshot_requested: bool,
    pending_snapshot: Option<SnapshotPixels>,
}

impl GlRenderer {
    pub fn new(gl: &glow::Context) -> Self {
        let piece_program = compile_program(gl, PIECE_VERT, PIECE_FRAG);
        let decal_program = compile_program(gl, DECAL_VERT, DECAL_FRAG);

        Self {
            host: RenderHostState::new(),
            piece_program,
            decal_program,
            pieces: Vec::new(),
            target_piece: 0,
            textures: HashMap::new(),
            resources_generation: 0,
            snapshot_requested: false,
            pending_snapshot: None,
        }
    }

    pub fn host_state(&self) -> ContextState {
        self.host.state()
    }

    /// Ask for a pixel readback at the end of the next painted frame
    pub fn request_snapshot(&mut self) {
        self.snapshot_requested = true;
    }

    pub fn take_snapshot(&mut self) -> Option<SnapshotPixels> {
        self.pending_snapshot.take()
    }

    /// Check context health and rebuild GPU resources after a restore.
    /// Returns false when the frame must be skipped.
    pub fn begin_frame(&mut self, gl: &glow::Context) -> bool {
        let err = unsafe { gl.get_error() };
        if err == glow::CONTEXT_LOST {
            self.host.context_lost();
            return false;
        }

        if self.host.state() == ContextState::Lost {
            // Error flag cleared, the driver gave us a working context back
            self.host.context_restored();
        }

        if self.host.generation() != self.resources_generation {
            self.rebuild_programs(gl);
            // Old handles died with the lost context, just forget them
            self.pieces.clear();
            self.textures.clear();
            self.resources_generation = self.host.generation();
        }

        self.host.should_draw()
    }

    fn rebuild_programs(&mut self, gl: &glow::Context) {
        self.piece_program = compile_program(gl, PIECE_VERT, PIECE_FRAG);
        self.decal_program = compile_program(gl, DECAL_VERT, DECAL_FRAG);
    }

    /// Upload garment piece geometry if not resident yet
    pub fn sync_pieces(&mut self, gl: &glow::Context, asset: &GarmentAsset) {
        if !self.pieces.is_empty() {
            return;
        }
        for piece in &asset.pieces {
            let mesh = upload_mesh(gl, &piece.mesh.vertices, &piece.mesh.indices);
            self.pieces.push(GpuPiece {
                mesh,
                model: piece.transform,
            });
        }
        self.target_piece = asset.target_piece_index;
    }

    /// Upload textures for new decals and release retired ones
    pub fn sync_textures(&mut self, gl: &glow::Context, decals: &[DecalDraw], retired: &[ElementId]) {
        for id in retired {
            if let Some(tex) = self.textures.remove(id) {
                unsafe { gl.delete_texture(tex) };
            }
        }

        for decal in decals {
            if self.textures.contains_key(&decal.id) {
                continue;
            }
            let tex = upload_texture(gl, &decal.pixels);
            self.textures.insert(decal.id.clone(), tex);
        }
    }

    /// Render the garment and decals
    pub fn paint(
        &mut self,
        gl: &glow::Context,
        camera: &ArcBallCamera,
        params: &RenderParams,
        decals: &[DecalDraw],
    ) {
        let aspect = params.viewport[2] / params.viewport[3];
        let vp = camera.view_projection(aspect);

        unsafe {
            gl.viewport(
                params.viewport[0] as i32,
                params.viewport[1] as i32,
                params.viewport[2] as i32,
                params.viewport[3] as i32,
            );
            gl.scissor(
                params.viewport[0] as i32,
                params.viewport[1] as i32,
                params.viewport[2] as i32,
                params.viewport[3] as i32,
            );
            gl.enable(glow::SCISSOR_TEST);

            gl.clear_color(
                params.bg_color[0] as f32 / 255.0,
                params.bg_color[1] as f32 / 255.0,
                params.bg_color[2] as f32 / 255.0,
                1.0,
            );
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);

            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LESS);

            let light_dir = glam::Vec3::new(0.3, 0.8, 0.5).normalize();

            // Base pass: all pieces in the shared garment color
            gl.use_program(Some(self.piece_program));
            set_uniform_vec3(gl, self.piece_program, "u_light_dir", &light_dir);
            set_uniform_vec3(
                gl,
                self.piece_program,
                "u_color",
                &glam::Vec3::from_array(params.garment_color),
            );
            for piece in &self.pieces {
                let mvp = vp * piece.model;
                set_uniform_mat4(gl, self.piece_program, "u_mvp", &mvp);
                set_uniform_mat4(gl, self.piece_program, "u_model", &piece.model);
                draw_mesh(gl, &piece.mesh);
            }

            // Decal pass: re-draw the target piece once per printed image,
            // projecting the texture through the element's oriented box
            if let Some(target) = self.pieces.get(self.target_piece) {
                gl.use_program(Some(self.decal_program));
                set_uniform_vec3(gl, self.decal_program, "u_light_dir", &light_dir);

                gl.depth_func(glow::LEQUAL);
                gl.depth_mask(false);
                gl.enable(glow::POLYGON_OFFSET_FILL);
                gl.polygon_offset(-1.0, -1.0);
                gl.enable(glow::BLEND);
                gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);

                let mvp = vp * target.model;
                set_uniform_mat4(gl, self.decal_program, "u_mvp", &mvp);
                set_uniform_mat4(gl, self.decal_program, "u_model", &target.model);

                for decal in decals {
                    let Some(tex) = self.textures.get(&decal.id) else {
                        continue;
                    };
                    let decal_inv = decal.model.inverse();
                    let decal_dir = decal.model.transform_vector3(glam::Vec3::Z).normalize_or_zero();
                    set_uniform_mat4(gl, self.decal_program, "u_decal_inv", &decal_inv);
                    set_uniform_vec3(gl, self.decal_program, "u_decal_dir", &decal_dir);

                    gl.active_texture(glow::TEXTURE0);
                    gl.bind_texture(glow::TEXTURE_2D, Some(*tex));
                    set_uniform_i32(gl, self.decal_program, "u_texture", 0);

                    draw_mesh(gl, &target.mesh);
                }

                gl.disable(glow::BLEND);
                gl.disable(glow::POLYGON_OFFSET_FILL);
                gl.depth_mask(true);
                gl.depth_func(glow::LESS);
            }

            if self.snapshot_requested {
                self.snapshot_requested = false;
                self.pending_snapshot = Some(read_snapshot(gl, params.viewport));
            }

            gl.disable(glow::DEPTH_TEST);
            gl.disable(glow::SCISSOR_TEST);
            gl.use_program(None);
        }

        self.host.frame_presented();
    }

    #[allow(dead_code)]
    pub fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.piece_program);
            gl.delete_program(self.decal_program);
            for piece in &self.pieces {
                gl.delete_vertex_array(piece.mesh.vao);
                gl.delete_buffer(piece.mesh._vbo);
                gl.delete_buffer(piece.mesh.ibo);
            }
            for tex in self.textures.values() {
                gl.delete_texture(*tex);
            }
        }
    }
}

// ── GPU upload ───────────────────────────────────────────────

fn upload_mesh(gl: &glow::Context, vertices: &[f32], indices: &[u32]) -> GpuMesh {
    unsafe {
        let vao = gl.create_vertex_array().unwrap();
        gl.bind_vertex_array(Some(vao));

        let vbo = gl.create_buffer().unwrap();
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
        gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, cast_slice(vertices), glow::STATIC_DRAW);

        let stride = (VERTEX_STRIDE * 4) as i32;
        // position: location 0
        gl.enable_vertex_attrib_array(0);
        gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
        // normal: location 1
        gl.enable_vertex_attrib_array(1);
        gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 3 * 4);
        // uv: location 2
        gl.enable_vertex_attrib_array(2);
        gl.vertex_attrib_pointer_f32(2, 2, glow::FLOAT, false, stride, 6 * 4);

        let ibo = gl.create_buffer().unwrap();
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ibo));
        gl.buffer_data_u8_slice(
            glow::ELEMENT_ARRAY_BUFFER,
            cast_slice(indices),
            glow::STATIC_DRAW,
        );

        gl.bind_vertex_array(None);

        GpuMesh {
            vao,
            _vbo: vbo,
            ibo,
            index_count: indices.len() as i32,
        }
    }
}

fn upload_texture(gl: &glow::Context, pixels: &DecodedImage) -> glow::Texture {
    unsafe {
        let tex = gl.create_texture().unwrap();
        gl.bind_texture(glow::TEXTURE_2D, Some(tex));
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MIN_FILTER,
            glow::LINEAR as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_MAG_FILTER,
            glow::LINEAR as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_S,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_parameter_i32(
            glow::TEXTURE_2D,
            glow::TEXTURE_WRAP_T,
            glow::CLAMP_TO_EDGE as i32,
        );
        gl.tex_image_2d(
            glow::TEXTURE_2D,
            0,
            glow::RGBA8 as i32,
            pixels.width as i32,
            pixels.height as i32,
            0,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            glow::PixelUnpackData::Slice(Some(pixels.rgba.as_ref())),
        );
        gl.bind_texture(glow::TEXTURE_2D, None);
        tex
    }
}

/// Read back the viewport framebuffer. Rows come out bottom-up.
unsafe fn read_snapshot(gl: &glow::Context, viewport: [f32; 4]) -> SnapshotPixels {
    let width = viewport[2] as i32;
    let height = viewport[3] as i32;
    let mut rgba = vec![0u8; (width * height * 4) as usize];
    gl.read_pixels(
        viewport[0] as i32,
        viewport[1] as i32,
        width,
        height,
        glow::RGBA,
        glow::UNSIGNED_BYTE,
        glow::PixelPackData::Slice(Some(&mut rgba)),
    );
    SnapshotPixels {
        width: width as u32,
        height: height as u32,
        rgba,
    }
}

// ── Draw calls ───────────────────────────────────────────────

unsafe fn draw_mesh(gl: &glow::Context, mesh: &GpuMesh) {
    gl.bind_vertex_array(Some(mesh.vao));
    gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(mesh.ibo));
    gl.draw_elements(glow::TRIANGLES, mesh.index_count, glow::UNSIGNED_INT, 0);
    gl.bind_vertex_array(None);
}

// ── Shader compilation ───────────────────────────────────────

fn compile_program(gl: &glow::Context, vert_src: &str, frag_src: &str) -> glow::Program {
    unsafe {
        let program = gl.create_program().unwrap();

        let vert = gl.create_shader(glow::VERTEX_SHADER).unwrap();
        gl.shader_source(vert, vert_src);
        gl.compile_shader(vert);
        if !gl.get_shader_compile_status(vert) {
            let log = gl.get_shader_info_log(vert);
            tracing::error!("Vertex shader error: {log}");
        }

        let frag = gl.create_shader(glow::FRAGMENT_SHADER).unwrap();
        gl.shader_source(frag, frag_src);
        gl.compile_shader(frag);
        if !gl.get_shader_compile_status(frag) {
            let log = gl.get_shader_info_log(frag);
            tracing::error!("Fragment shader error: {log}");
        }

        gl.attach_shader(program, vert);
        gl.attach_shader(program, frag);
        gl.link_program(program);
        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            tracing::error!("Program link error: {log}");
        }

        gl.delete_shader(vert);
        gl.delete_shader(frag);

        program
    }
}

// ── Uniform setters ──────────────────────────────────────────

fn set_uniform_mat4(gl: &glow::Context, program: glow::Program, name: &str, mat: &glam::Mat4) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_matrix_4_f32_slice(loc.as_ref(), false, &mat.to_cols_array());
    }
}

fn set_uniform_vec3(gl: &glow::Context, program: glow::Program, name: &str, v: &glam::Vec3) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_3_f32(loc.as_ref(), v.x, v.y, v.z);
    }
}

fn set_uniform_i32(gl: &glow::Context, program: glow::Program, name: &str, value: i32) {
    unsafe {
        let loc = gl.get_uniform_location(program, name);
        gl.uniform_1_i32(loc.as_ref(), value);
    }
}

// ── Byte cast helper ─────────────────────────────────────────

fn cast_slice<T: Copy>(slice: &[T]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(
            slice.as_ptr() as *const u8,
            std::mem::size_of_val(slice),
        )
    }
}

// ── Shaders ──────────────────────────────────────────────────

const PIECE_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;
uniform mat4 u_model;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec2 a_uv;

out vec3 v_normal;

void main() {
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_normal = mat3(u_model) * a_normal;
}
"#;

const PIECE_FRAG: &str = r#"#version 330 core
uniform vec3 u_light_dir;
uniform vec3 u_color;

in vec3 v_normal;

out vec4 frag_color;

void main() {
    vec3 n = normalize(v_normal);
    float diffuse = max(dot(n, u_light_dir), 0.0);
    float ambient = 0.3;
    float light = ambient + diffuse * 0.7;
    vec3 c = u_color * light;
    frag_color = vec4(pow(c, vec3(1.0 / 2.2)), 1.0);
}
"#;

const DECAL_VERT: &str = r#"#version 330 core
uniform mat4 u_mvp;
uniform mat4 u_model;
uniform mat4 u_decal_inv;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec2 a_uv;

out vec3 v_decal;
out vec3 v_normal;

void main() {
    vec4 world = u_model * vec4(a_position, 1.0);
    gl_Position = u_mvp * vec4(a_position, 1.0);
    v_decal = (u_decal_inv * world).xyz;
    v_normal = mat3(u_model) * a_normal;
}
"#;

const DECAL_FRAG: &str = r#"#version 330 core
uniform vec3 u_light_dir;
uniform vec3 u_decal_dir;
uniform sampler2D u_texture;

in vec3 v_decal;
in vec3 v_normal;

out vec4 frag_color;

void main() {
    if (abs(v_decal.x) > 0.5 || abs(v_decal.y) > 0.5 || abs(v_decal.z) > 0.5) {
        discard;
    }
    vec3 n = normalize(v_normal);
    // Only surfaces facing the decal receive the print
    if (dot(n, u_decal_dir) < 0.05) {
        discard;
    }
    vec2 uv = vec2(v_decal.x + 0.5, 0.5 - v_decal.y);
    vec4 texel = texture(u_texture, uv);
    if (texel.a < 0.01) {
        discard;
    }
    float diffuse = max(dot(n, u_light_dir), 0.0);
    float light = 0.3 + diffuse * 0.7;
    vec3 c = pow(texel.rgb, vec3(2.2)) * light;
    frag_color = vec4(pow(c, vec3(1.0 / 2.2)), texel.a);
}
"#;
