use web_sys::{
    WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram, WebGlUniformLocation,
    WebGlVertexArrayObject,
};
use crate::error::Result;
use crate::math::{Mat4, Vec3};
use crate::mesh::{box_mesh, octahedron_mesh, sphere_mesh, Mesh, VERTEX_STRIDE};
use crate::ornaments::{OrnamentKind, TOPPER_COLOR, TOPPER_RADIUS};
use crate::particles::{FoliageLayer, FoliageUniforms, PARTICLE_STRIDE};
use crate::scene::{CameraRig, FrameOutput, InstanceBatch, SceneComposer};
use super::shaders::*;
use super::webgl::{RenderTarget, WebGLContext};

const GIFT_EDGE: f32 = 0.25;
const BAUBLE_RADIUS: f32 = 0.15;
const ORNAMENT_METALNESS: f32 = 0.9;
const ORNAMENT_ROUGHNESS: f32 = 0.15;
const SPARKLE_SIZE_SCALE: f32 = 25.0;

/// Cached uniform locations for the foliage shader
struct FoliageUniformLocations {
    model: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
    progress: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    alpha: Option<WebGlUniformLocation>,
}

/// Cached uniform locations for the lit ornament shader
struct OrnamentUniformLocations {
    model: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    camera_pos: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    emissive: Option<WebGlUniformLocation>,
    metalness: Option<WebGlUniformLocation>,
    roughness: Option<WebGlUniformLocation>,
    ambient: Option<WebGlUniformLocation>,
    key_position: Option<WebGlUniformLocation>,
    key_color: Option<WebGlUniformLocation>,
    key_intensity: Option<WebGlUniformLocation>,
    key_cos_outer: Option<WebGlUniformLocation>,
    key_cos_inner: Option<WebGlUniformLocation>,
    fill_position: Option<WebGlUniformLocation>,
    fill_color: Option<WebGlUniformLocation>,
    fill_intensity: Option<WebGlUniformLocation>,
    star_position: Option<WebGlUniformLocation>,
    star_color: Option<WebGlUniformLocation>,
    star_intensity: Option<WebGlUniformLocation>,
    star_distance: Option<WebGlUniformLocation>,
    star_decay: Option<WebGlUniformLocation>,
}

/// Cached uniform locations for sparkles and stars
struct ParticleUniformLocations {
    model: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    size_scale: Option<WebGlUniformLocation>,
    fade: Option<WebGlUniformLocation>,
}

/// Cached uniform locations for post-processing
struct PostUniformLocations {
    extract_texture: Option<WebGlUniformLocation>,
    threshold: Option<WebGlUniformLocation>,
    blur_texture: Option<WebGlUniformLocation>,
    direction: Option<WebGlUniformLocation>,
    radius: Option<WebGlUniformLocation>,
    scene: Option<WebGlUniformLocation>,
    bloom: Option<WebGlUniformLocation>,
    bloom_strength: Option<WebGlUniformLocation>,
    exposure: Option<WebGlUniformLocation>,
    noise: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
    vignette_offset: Option<WebGlUniformLocation>,
    vignette_darkness: Option<WebGlUniformLocation>,
}

/// Static foliage arrays: target, scatter, random
struct FoliageBatch {
    vao: WebGlVertexArrayObject,
    _buffers: [WebGlBuffer; 3],
    count: i32,
}

/// One mesh drawn once per instance matrix
struct MeshBatch {
    vao: WebGlVertexArrayObject,
    _vertex_buffer: WebGlBuffer,
    _index_buffer: WebGlBuffer,
    instance_buffer: WebGlBuffer,
    index_count: i32,
    instance_count: i32,
}

/// Points in the shared 8-float particle layout
struct PointBatch {
    vao: WebGlVertexArrayObject,
    buffer: WebGlBuffer,
    count: i32,
}

/// Render pipeline for the tree scene: stars, ornaments, foliage and
/// sparkles into an offscreen target, then bloom and a composite pass
pub struct RenderPipeline {
    ctx: WebGLContext,

    foliage_program: WebGlProgram,
    ornament_program: WebGlProgram,
    particle_program: WebGlProgram,
    bloom_extract_program: WebGlProgram,
    blur_program: WebGlProgram,
    composite_program: WebGlProgram,

    foliage_uniforms: FoliageUniformLocations,
    ornament_uniforms: OrnamentUniformLocations,
    particle_uniforms: ParticleUniformLocations,
    post_uniforms: PostUniformLocations,

    body: Option<FoliageBatch>,
    glow: Option<FoliageBatch>,
    gifts: Option<MeshBatch>,
    baubles: Option<MeshBatch>,
    topper: Option<MeshBatch>,
    sparkles: Option<PointBatch>,
    stars: Option<PointBatch>,
    star_fade: bool,

    scene_target: Option<RenderTarget>,
    bloom_targets: Vec<RenderTarget>,

    width: i32,
    height: i32,
}

impl RenderPipeline {
    pub fn new(gl: Gl, width: i32, height: i32) -> Result<Self> {
        let ctx = WebGLContext::new(gl);

        let foliage_program = ctx.create_program(FOLIAGE_VERTEX_SHADER, FOLIAGE_FRAGMENT_SHADER)?;
        let ornament_program = ctx.create_program(ORNAMENT_VERTEX_SHADER, ORNAMENT_FRAGMENT_SHADER)?;
        let particle_program = ctx.create_program(PARTICLE_VERTEX_SHADER, PARTICLE_FRAGMENT_SHADER)?;
        let bloom_extract_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, BLOOM_EXTRACT_SHADER)?;
        let blur_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, BLUR_SHADER)?;
        let composite_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, COMPOSITE_SHADER)?;

        let loc = |program: &WebGlProgram, name: &str| ctx.get_uniform_location(program, name);

        let foliage_uniforms = FoliageUniformLocations {
            model: loc(&foliage_program, "u_model"),
            view: loc(&foliage_program, "u_view"),
            projection: loc(&foliage_program, "u_projection"),
            time: loc(&foliage_program, "u_time"),
            progress: loc(&foliage_program, "u_progress"),
            color: loc(&foliage_program, "u_color"),
            alpha: loc(&foliage_program, "u_alpha"),
        };

        let ornament_uniforms = OrnamentUniformLocations {
            model: loc(&ornament_program, "u_model"),
            view: loc(&ornament_program, "u_view"),
            projection: loc(&ornament_program, "u_projection"),
            camera_pos: loc(&ornament_program, "u_camera_pos"),
            color: loc(&ornament_program, "u_color"),
            emissive: loc(&ornament_program, "u_emissive"),
            metalness: loc(&ornament_program, "u_metalness"),
            roughness: loc(&ornament_program, "u_roughness"),
            ambient: loc(&ornament_program, "u_ambient"),
            key_position: loc(&ornament_program, "u_key_position"),
            key_color: loc(&ornament_program, "u_key_color"),
            key_intensity: loc(&ornament_program, "u_key_intensity"),
            key_cos_outer: loc(&ornament_program, "u_key_cos_outer"),
            key_cos_inner: loc(&ornament_program, "u_key_cos_inner"),
            fill_position: loc(&ornament_program, "u_fill_position"),
            fill_color: loc(&ornament_program, "u_fill_color"),
            fill_intensity: loc(&ornament_program, "u_fill_intensity"),
            star_position: loc(&ornament_program, "u_star_position"),
            star_color: loc(&ornament_program, "u_star_color"),
            star_intensity: loc(&ornament_program, "u_star_intensity"),
            star_distance: loc(&ornament_program, "u_star_distance"),
            star_decay: loc(&ornament_program, "u_star_decay"),
        };

        let particle_uniforms = ParticleUniformLocations {
            model: loc(&particle_program, "u_model"),
            view: loc(&particle_program, "u_view"),
            projection: loc(&particle_program, "u_projection"),
            size_scale: loc(&particle_program, "u_size_scale"),
            fade: loc(&particle_program, "u_fade"),
        };

        let post_uniforms = PostUniformLocations {
            extract_texture: loc(&bloom_extract_program, "u_texture"),
            threshold: loc(&bloom_extract_program, "u_threshold"),
            blur_texture: loc(&blur_program, "u_texture"),
            direction: loc(&blur_program, "u_direction"),
            radius: loc(&blur_program, "u_radius"),
            scene: loc(&composite_program, "u_scene"),
            bloom: loc(&composite_program, "u_bloom"),
            bloom_strength: loc(&composite_program, "u_bloom_strength"),
            exposure: loc(&composite_program, "u_exposure"),
            noise: loc(&composite_program, "u_noise"),
            time: loc(&composite_program, "u_time"),
            vignette_offset: loc(&composite_program, "u_vignette_offset"),
            vignette_darkness: loc(&composite_program, "u_vignette_darkness"),
        };

        let mut pipeline = Self {
            ctx,
            foliage_program,
            ornament_program,
            particle_program,
            bloom_extract_program,
            blur_program,
            composite_program,
            foliage_uniforms,
            ornament_uniforms,
            particle_uniforms,
            post_uniforms,
            body: None,
            glow: None,
            gifts: None,
            baubles: None,
            topper: None,
            sparkles: None,
            stars: None,
            star_fade: true,
            scene_target: None,
            bloom_targets: Vec::new(),
            width,
            height,
        };

        pipeline.create_framebuffers()?;
        log::info!("render pipeline ready at {}x{}", width, height);

        Ok(pipeline)
    }

    fn create_framebuffers(&mut self) -> Result<()> {
        if let Some(target) = self.scene_target.take() {
            self.ctx.delete_render_target(&target);
        }
        for target in self.bloom_targets.drain(..) {
            self.ctx.delete_render_target(&target);
        }

        self.scene_target = Some(self.ctx.create_render_target(self.width, self.height, true)?);

        // Bloom ping-pong at half resolution
        for _ in 0..2 {
            let target = self.ctx.create_render_target(self.width / 2, self.height / 2, false)?;
            self.bloom_targets.push(target);
        }

        Ok(())
    }

    /// Upload everything generated at mount time. Call once after
    /// `SceneComposer::on_create`.
    pub fn upload_scene(&mut self, scene: &SceneComposer) -> Result<()> {
        self.body = self.foliage_batch(scene.body())?;
        self.glow = self.foliage_batch(scene.glow())?;

        self.gifts = Some(self.mesh_batch(&ornament_mesh(scene.gifts().kind()), scene.gifts().instance_matrices())?);
        self.baubles = Some(self.mesh_batch(&ornament_mesh(scene.baubles().kind()), scene.baubles().instance_matrices())?);
        self.topper = Some(self.mesh_batch(
            &octahedron_mesh(TOPPER_RADIUS),
            scene.topper().transform().as_slice(),
        )?);

        self.stars = Some(self.point_batch(scene.stars().particle_data(), Gl::STATIC_DRAW)?);
        self.star_fade = scene.stars().params().fade;
        self.sparkles = Some(self.point_batch(&[], Gl::DYNAMIC_DRAW)?);

        log::debug!("scene geometry uploaded");
        Ok(())
    }

    fn foliage_batch(&self, layer: &FoliageLayer) -> Result<Option<FoliageBatch>> {
        let Some(cloud) = layer.cloud() else {
            return Ok(None);
        };
        let gl = &self.ctx.gl;

        let vao = self.ctx.create_vao()?;
        gl.bind_vertex_array(Some(&vao));

        let target = self.ctx.create_buffer_f32(&cloud.target_data(), Gl::STATIC_DRAW)?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&target));
        self.ctx.float_attribute(0, 3, 3, 0);

        let scatter = self.ctx.create_buffer_f32(&cloud.scatter_data(), Gl::STATIC_DRAW)?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&scatter));
        self.ctx.float_attribute(1, 3, 3, 0);

        let random = self.ctx.create_buffer_f32(&cloud.randoms, Gl::STATIC_DRAW)?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&random));
        self.ctx.float_attribute(2, 1, 1, 0);

        gl.bind_vertex_array(None);
        gl.bind_buffer(Gl::ARRAY_BUFFER, None);

        Ok(Some(FoliageBatch {
            vao,
            _buffers: [target, scatter, random],
            count: cloud.len() as i32,
        }))
    }

    fn mesh_batch(&self, mesh: &Mesh, instances: &[f32]) -> Result<MeshBatch> {
        let gl = &self.ctx.gl;
        let stride = VERTEX_STRIDE as i32;

        let vao = self.ctx.create_vao()?;
        gl.bind_vertex_array(Some(&vao));

        let vertex_buffer = self.ctx.create_buffer_f32(&mesh.vertex_data(), Gl::STATIC_DRAW)?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&vertex_buffer));
        self.ctx.float_attribute(0, 3, stride, 0);
        self.ctx.float_attribute(1, 3, stride, 3);

        let index_buffer = self.ctx.create_index_buffer(mesh.index_data(), Gl::STATIC_DRAW)?;

        let instance_buffer = self.ctx.create_buffer_f32(instances, Gl::DYNAMIC_DRAW)?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&instance_buffer));
        self.ctx.instance_matrix_attribute(2);

        gl.bind_vertex_array(None);
        gl.bind_buffer(Gl::ARRAY_BUFFER, None);

        Ok(MeshBatch {
            vao,
            _vertex_buffer: vertex_buffer,
            _index_buffer: index_buffer,
            instance_buffer,
            index_count: mesh.index_data().len() as i32,
            instance_count: (instances.len() / 16) as i32,
        })
    }

    fn point_batch(&self, data: &[f32], usage: u32) -> Result<PointBatch> {
        let gl = &self.ctx.gl;
        let stride = PARTICLE_STRIDE as i32;

        let vao = self.ctx.create_vao()?;
        gl.bind_vertex_array(Some(&vao));

        let buffer = self.ctx.create_buffer_f32(data, usage)?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
        self.ctx.float_attribute(0, 3, stride, 0);
        self.ctx.float_attribute(1, 1, stride, 3);
        self.ctx.float_attribute(2, 1, stride, 4);
        self.ctx.float_attribute(3, 3, stride, 5);

        gl.bind_vertex_array(None);
        gl.bind_buffer(Gl::ARRAY_BUFFER, None);

        Ok(PointBatch {
            vao,
            buffer,
            count: (data.len() / PARTICLE_STRIDE) as i32,
        })
    }

    /// Push the per-frame data that changed. Instance buffers are only
    /// re-uploaded when their population moved.
    fn sync(&mut self, frame: &FrameOutput<'_>) {
        let ctx = &self.ctx;

        for (batch, instances) in [(&mut self.gifts, &frame.gifts), (&mut self.baubles, &frame.baubles)] {
            if let Some(batch) = batch {
                upload_instances(ctx, batch, instances);
            }
        }

        if let Some(topper) = &mut self.topper {
            ctx.write_buffer_f32(&topper.instance_buffer, frame.topper.transform.as_slice(), Gl::DYNAMIC_DRAW);
            topper.instance_count = 1;
        }

        if let Some(sparkles) = &mut self.sparkles {
            if !frame.sparkles.is_empty() {
                ctx.write_buffer_f32(&sparkles.buffer, &frame.sparkles, Gl::DYNAMIC_DRAW);
            }
            sparkles.count = (frame.sparkles.len() / PARTICLE_STRIDE) as i32;
        }
    }

    /// Render a frame
    pub fn render(&mut self, frame: &FrameOutput<'_>, camera: &CameraRig, time: f32) {
        self.sync(frame);

        let (Some(scene_target), [bloom_a, bloom_b]) = (&self.scene_target, self.bloom_targets.as_slice()) else {
            return;
        };
        let gl = &self.ctx.gl;

        let aspect = self.width as f32 / self.height.max(1) as f32;
        let projection = camera.projection(aspect);
        let view = camera.view();

        // === Pass 1: scene into the HDR target ===
        gl.bind_framebuffer(Gl::FRAMEBUFFER, Some(&scene_target.framebuffer));
        self.ctx.viewport(scene_target.width, scene_target.height);
        self.ctx.clear(frame.post.clear_color);

        if let Some(stars) = &self.stars {
            self.ctx.enable_depth_test(false);
            self.ctx.enable_additive_blending();
            self.draw_points(stars, &Mat4::identity(), &view, &projection, frame.star_twinkle, self.star_fade);
        }

        self.ctx.enable_depth_test(true);
        self.ctx.disable_blending();
        self.draw_ornaments(frame, camera.eye(), &view, &projection);

        self.ctx.enable_depth_test(false);
        self.ctx.enable_additive_blending();
        for (batch, uniforms) in [(&self.body, &frame.body), (&self.glow, &frame.glow)] {
            if let Some(batch) = batch {
                self.draw_foliage(batch, uniforms, &frame.group, &view, &projection);
            }
        }

        if let Some(sparkles) = self.sparkles.as_ref().filter(|s| s.count > 0) {
            self.draw_points(sparkles, &frame.group, &view, &projection, SPARKLE_SIZE_SCALE, true);
        }

        gl.disable(Gl::DEPTH_TEST);
        self.ctx.disable_blending();

        // === Pass 2: bright-pass extract ===
        let post = &frame.post;
        gl.bind_framebuffer(Gl::FRAMEBUFFER, Some(&bloom_a.framebuffer));
        self.ctx.viewport(bloom_a.width, bloom_a.height);
        gl.use_program(Some(&self.bloom_extract_program));
        gl.active_texture(Gl::TEXTURE0);
        gl.bind_texture(Gl::TEXTURE_2D, Some(&scene_target.texture));
        self.ctx.uniform_1i(self.post_uniforms.extract_texture.as_ref(), 0);
        self.ctx.uniform_1f(self.post_uniforms.threshold.as_ref(), post.bloom.luminance_threshold);
        gl.draw_arrays(Gl::TRIANGLES, 0, 3);

        // === Pass 3-4: separable blur ===
        gl.use_program(Some(&self.blur_program));
        self.ctx.uniform_1i(self.post_uniforms.blur_texture.as_ref(), 0);
        self.ctx.uniform_1f(self.post_uniforms.radius.as_ref(), post.bloom.radius);
        for (src, dst, direction) in [(bloom_a, bloom_b, (1.0, 0.0)), (bloom_b, bloom_a, (0.0, 1.0))] {
            gl.bind_framebuffer(Gl::FRAMEBUFFER, Some(&dst.framebuffer));
            gl.bind_texture(Gl::TEXTURE_2D, Some(&src.texture));
            self.ctx.uniform_2f(self.post_uniforms.direction.as_ref(), direction.0, direction.1);
            gl.draw_arrays(Gl::TRIANGLES, 0, 3);
        }

        // === Pass 5: composite to the canvas ===
        gl.bind_framebuffer(Gl::FRAMEBUFFER, None);
        self.ctx.viewport(self.width, self.height);
        gl.use_program(Some(&self.composite_program));

        gl.active_texture(Gl::TEXTURE0);
        gl.bind_texture(Gl::TEXTURE_2D, Some(&scene_target.texture));
        self.ctx.uniform_1i(self.post_uniforms.scene.as_ref(), 0);

        gl.active_texture(Gl::TEXTURE1);
        gl.bind_texture(Gl::TEXTURE_2D, Some(&bloom_a.texture));
        self.ctx.uniform_1i(self.post_uniforms.bloom.as_ref(), 1);

        self.ctx.uniform_1f(self.post_uniforms.bloom_strength.as_ref(), post.bloom.intensity);
        self.ctx.uniform_1f(self.post_uniforms.exposure.as_ref(), post.exposure);
        self.ctx.uniform_1f(self.post_uniforms.noise.as_ref(), post.noise_opacity);
        self.ctx.uniform_1f(self.post_uniforms.time.as_ref(), time);
        self.ctx.uniform_1f(self.post_uniforms.vignette_offset.as_ref(), post.vignette.offset);
        self.ctx.uniform_1f(self.post_uniforms.vignette_darkness.as_ref(), post.vignette.darkness);

        gl.draw_arrays(Gl::TRIANGLES, 0, 3);
        gl.active_texture(Gl::TEXTURE0);
    }

    fn draw_foliage(&self, batch: &FoliageBatch, uniforms: &FoliageUniforms, model: &Mat4, view: &Mat4, projection: &Mat4) {
        let gl = &self.ctx.gl;
        let u = &self.foliage_uniforms;

        gl.use_program(Some(&self.foliage_program));
        self.ctx.uniform_matrix4fv(u.model.as_ref(), model.as_slice());
        self.ctx.uniform_matrix4fv(u.view.as_ref(), view.as_slice());
        self.ctx.uniform_matrix4fv(u.projection.as_ref(), projection.as_slice());
        self.ctx.uniform_1f(u.time.as_ref(), uniforms.time);
        self.ctx.uniform_1f(u.progress.as_ref(), uniforms.progress);
        self.ctx.uniform_color(u.color.as_ref(), uniforms.color, 1.0);
        self.ctx.uniform_1f(u.alpha.as_ref(), uniforms.alpha);

        gl.bind_vertex_array(Some(&batch.vao));
        gl.draw_arrays(Gl::POINTS, 0, batch.count);
        gl.bind_vertex_array(None);
    }

    fn draw_ornaments(&self, frame: &FrameOutput<'_>, eye: Vec3, view: &Mat4, projection: &Mat4) {
        let gl = &self.ctx.gl;
        let u = &self.ornament_uniforms;
        let lights = &frame.lighting;

        gl.use_program(Some(&self.ornament_program));
        self.ctx.uniform_matrix4fv(u.model.as_ref(), frame.group.as_slice());
        self.ctx.uniform_matrix4fv(u.view.as_ref(), view.as_slice());
        self.ctx.uniform_matrix4fv(u.projection.as_ref(), projection.as_slice());
        self.ctx.uniform_vec3(u.camera_pos.as_ref(), eye);
        self.ctx.uniform_1f(u.metalness.as_ref(), ORNAMENT_METALNESS);
        self.ctx.uniform_1f(u.roughness.as_ref(), ORNAMENT_ROUGHNESS);

        self.ctx.uniform_1f(u.ambient.as_ref(), lights.ambient_intensity);
        let key = &lights.key;
        self.ctx.uniform_vec3(u.key_position.as_ref(), key.position);
        self.ctx.uniform_color(u.key_color.as_ref(), key.color, 1.0);
        self.ctx.uniform_1f(u.key_intensity.as_ref(), key.intensity);
        self.ctx.uniform_1f(u.key_cos_outer.as_ref(), key.angle.cos());
        self.ctx.uniform_1f(u.key_cos_inner.as_ref(), (key.angle * (1.0 - key.penumbra)).cos());
        let fill = &lights.fill;
        self.ctx.uniform_vec3(u.fill_position.as_ref(), fill.position);
        self.ctx.uniform_color(u.fill_color.as_ref(), fill.color, 1.0);
        self.ctx.uniform_1f(u.fill_intensity.as_ref(), fill.intensity);

        match frame.topper.light {
            Some(light) => {
                let local = frame.topper.transform.transform_point(light.position);
                self.ctx.uniform_vec3(u.star_position.as_ref(), frame.group.transform_point(local));
                self.ctx.uniform_color(u.star_color.as_ref(), light.color, 1.0);
                self.ctx.uniform_1f(u.star_intensity.as_ref(), light.intensity);
                self.ctx.uniform_1f(u.star_distance.as_ref(), light.distance);
                self.ctx.uniform_1f(u.star_decay.as_ref(), light.decay);
            }
            None => self.ctx.uniform_1f(u.star_intensity.as_ref(), 0.0),
        }

        for (batch, color) in [(&self.gifts, frame.gifts.color), (&self.baubles, frame.baubles.color)] {
            if let Some(batch) = batch {
                self.ctx.uniform_color(u.color.as_ref(), color, 1.0);
                self.ctx.uniform_color(u.emissive.as_ref(), color, 0.0);
                self.draw_instances(batch);
            }
        }

        if let Some(topper) = &self.topper {
            self.ctx.uniform_color(u.color.as_ref(), TOPPER_COLOR, 1.0);
            self.ctx.uniform_color(u.emissive.as_ref(), TOPPER_COLOR, frame.topper.emissive_intensity);
            self.draw_instances(topper);
        }
    }

    fn draw_instances(&self, batch: &MeshBatch) {
        let gl = &self.ctx.gl;
        gl.bind_vertex_array(Some(&batch.vao));
        gl.draw_elements_instanced_with_i32(
            Gl::TRIANGLES,
            batch.index_count,
            Gl::UNSIGNED_INT,
            0,
            batch.instance_count,
        );
        gl.bind_vertex_array(None);
    }

    fn draw_points(&self, batch: &PointBatch, model: &Mat4, view: &Mat4, projection: &Mat4, size_scale: f32, fade: bool) {
        let gl = &self.ctx.gl;
        let u = &self.particle_uniforms;

        gl.use_program(Some(&self.particle_program));
        self.ctx.uniform_matrix4fv(u.model.as_ref(), model.as_slice());
        self.ctx.uniform_matrix4fv(u.view.as_ref(), view.as_slice());
        self.ctx.uniform_matrix4fv(u.projection.as_ref(), projection.as_slice());
        self.ctx.uniform_1f(u.size_scale.as_ref(), size_scale);
        self.ctx.uniform_1i(u.fade.as_ref(), fade as i32);

        gl.bind_vertex_array(Some(&batch.vao));
        gl.draw_arrays(Gl::POINTS, 0, batch.count);
        gl.bind_vertex_array(None);
    }

    pub fn resize(&mut self, width: i32, height: i32) -> Result<()> {
        self.width = width.max(1);
        self.height = height.max(1);
        self.create_framebuffers()
    }
}

fn ornament_mesh(kind: OrnamentKind) -> Mesh {
    match kind {
        OrnamentKind::Box => box_mesh(GIFT_EDGE),
        OrnamentKind::Sphere => sphere_mesh(BAUBLE_RADIUS, 16, 16),
    }
}

fn upload_instances(ctx: &WebGLContext, batch: &mut MeshBatch, instances: &InstanceBatch<'_>) {
    if !instances.dirty {
        return;
    }
    ctx.write_buffer_f32(&batch.instance_buffer, instances.matrices, Gl::DYNAMIC_DRAW);
    batch.instance_count = (instances.matrices.len() / 16) as i32;
}
