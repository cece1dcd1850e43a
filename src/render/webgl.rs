use web_sys::{
    WebGl2RenderingContext as Gl, WebGlBuffer, WebGlFramebuffer, WebGlProgram,
    WebGlRenderbuffer, WebGlShader, WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject,
};
use crate::error::{Result, SceneError};
use crate::math::{Color, Vec3};

fn gl_error(what: &str) -> SceneError {
    SceneError::Gl(format!("failed to create {what}"))
}

/// Offscreen color target, optionally with depth
pub struct RenderTarget {
    pub texture: WebGlTexture,
    pub framebuffer: WebGlFramebuffer,
    pub depth: Option<WebGlRenderbuffer>,
    pub width: i32,
    pub height: i32,
}

/// Wrapper around WebGL2 context with helper methods
pub struct WebGLContext {
    pub gl: Gl,
    /// Float color attachments are renderable, so HDR values survive until
    /// tone mapping
    hdr: bool,
}

impl WebGLContext {
    pub fn new(gl: Gl) -> Self {
        let hdr = matches!(gl.get_extension("EXT_color_buffer_float"), Ok(Some(_)));
        if !hdr {
            log::warn!("EXT_color_buffer_float unavailable, bloom falls back to 8-bit targets");
        }
        Self { gl, hdr }
    }

    pub fn supports_hdr(&self) -> bool {
        self.hdr
    }

    pub fn compile_shader(&self, shader_type: u32, source: &str) -> Result<WebGlShader> {
        let gl = &self.gl;

        let shader = gl.create_shader(shader_type).ok_or_else(|| gl_error("shader"))?;
        gl.shader_source(&shader, source);
        gl.compile_shader(&shader);

        if gl
            .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
            .as_bool()
            .unwrap_or(false)
        {
            Ok(shader)
        } else {
            let log = gl.get_shader_info_log(&shader).unwrap_or_default();
            gl.delete_shader(Some(&shader));
            Err(SceneError::Gl(format!("shader compilation failed: {log}")))
        }
    }

    /// Create a shader program from vertex and fragment shaders
    pub fn create_program(&self, vert_src: &str, frag_src: &str) -> Result<WebGlProgram> {
        let gl = &self.gl;

        let vert_shader = self.compile_shader(Gl::VERTEX_SHADER, vert_src)?;
        let frag_shader = self.compile_shader(Gl::FRAGMENT_SHADER, frag_src)?;

        let program = gl.create_program().ok_or_else(|| gl_error("program"))?;
        gl.attach_shader(&program, &vert_shader);
        gl.attach_shader(&program, &frag_shader);
        gl.link_program(&program);

        // Linked into the program now
        gl.delete_shader(Some(&vert_shader));
        gl.delete_shader(Some(&frag_shader));

        if gl
            .get_program_parameter(&program, Gl::LINK_STATUS)
            .as_bool()
            .unwrap_or(false)
        {
            Ok(program)
        } else {
            let log = gl.get_program_info_log(&program).unwrap_or_default();
            gl.delete_program(Some(&program));
            Err(SceneError::Gl(format!("program linking failed: {log}")))
        }
    }

    /// Create an array buffer and upload data
    pub fn create_buffer_f32(&self, data: &[f32], usage: u32) -> Result<WebGlBuffer> {
        let gl = &self.gl;

        let buffer = gl.create_buffer().ok_or_else(|| gl_error("buffer"))?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));

        // Safety: the view is consumed by buffer_data before any allocation
        unsafe {
            let array = js_sys::Float32Array::view(data);
            gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &array, usage);
        }

        gl.bind_buffer(Gl::ARRAY_BUFFER, None);
        Ok(buffer)
    }

    /// Replace the contents of an array buffer, growing it if needed
    pub fn write_buffer_f32(&self, buffer: &WebGlBuffer, data: &[f32], usage: u32) {
        let gl = &self.gl;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(buffer));
        unsafe {
            let array = js_sys::Float32Array::view(data);
            gl.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &array, usage);
        }
        gl.bind_buffer(Gl::ARRAY_BUFFER, None);
    }

    pub fn create_index_buffer(&self, data: &[u32], usage: u32) -> Result<WebGlBuffer> {
        let gl = &self.gl;

        let buffer = gl.create_buffer().ok_or_else(|| gl_error("index buffer"))?;
        gl.bind_buffer(Gl::ELEMENT_ARRAY_BUFFER, Some(&buffer));

        unsafe {
            let array = js_sys::Uint32Array::view(data);
            gl.buffer_data_with_array_buffer_view(Gl::ELEMENT_ARRAY_BUFFER, &array, usage);
        }

        // The element binding is VAO state, so it stays bound here
        Ok(buffer)
    }

    pub fn create_vao(&self) -> Result<WebGlVertexArrayObject> {
        self.gl.create_vertex_array().ok_or_else(|| gl_error("VAO"))
    }

    /// Float attribute at `location` reading `size` floats from the bound
    /// array buffer
    pub fn float_attribute(&self, location: u32, size: i32, stride_floats: i32, offset_floats: i32) {
        self.gl.enable_vertex_attrib_array(location);
        self.gl.vertex_attrib_pointer_with_i32(
            location,
            size,
            Gl::FLOAT,
            false,
            stride_floats * 4,
            offset_floats * 4,
        );
    }

    /// Per-instance mat4 spread over four consecutive locations
    pub fn instance_matrix_attribute(&self, location: u32) {
        for column in 0..4 {
            let loc = location + column;
            self.float_attribute(loc, 4, 16, column as i32 * 4);
            self.gl.vertex_attrib_divisor(loc, 1);
        }
    }

    /// Color target texture, half-float when the context allows it
    pub fn create_texture(&self, width: i32, height: i32) -> Result<WebGlTexture> {
        let gl = &self.gl;

        let texture = gl.create_texture().ok_or_else(|| gl_error("texture"))?;
        gl.bind_texture(Gl::TEXTURE_2D, Some(&texture));

        let (internal_format, data_type) = if self.hdr {
            (Gl::RGBA16F, Gl::HALF_FLOAT)
        } else {
            (Gl::RGBA8, Gl::UNSIGNED_BYTE)
        };

        gl.tex_image_2d_with_i32_and_i32_and_i32_and_format_and_type_and_opt_u8_array(
            Gl::TEXTURE_2D,
            0,
            internal_format as i32,
            width,
            height,
            0,
            Gl::RGBA,
            data_type,
            None,
        )
        .map_err(|e| SceneError::Gl(format!("failed to allocate texture: {e:?}")))?;

        for (param, value) in [
            (Gl::TEXTURE_MIN_FILTER, Gl::LINEAR),
            (Gl::TEXTURE_MAG_FILTER, Gl::LINEAR),
            (Gl::TEXTURE_WRAP_S, Gl::CLAMP_TO_EDGE),
            (Gl::TEXTURE_WRAP_T, Gl::CLAMP_TO_EDGE),
        ] {
            gl.tex_parameteri(Gl::TEXTURE_2D, param, value as i32);
        }

        gl.bind_texture(Gl::TEXTURE_2D, None);
        Ok(texture)
    }

    /// Framebuffer with a color texture and, if asked, a depth renderbuffer
    pub fn create_render_target(&self, width: i32, height: i32, with_depth: bool) -> Result<RenderTarget> {
        let gl = &self.gl;
        let width = width.max(1);
        let height = height.max(1);

        let texture = self.create_texture(width, height)?;
        let framebuffer = gl.create_framebuffer().ok_or_else(|| gl_error("framebuffer"))?;
        gl.bind_framebuffer(Gl::FRAMEBUFFER, Some(&framebuffer));
        gl.framebuffer_texture_2d(
            Gl::FRAMEBUFFER,
            Gl::COLOR_ATTACHMENT0,
            Gl::TEXTURE_2D,
            Some(&texture),
            0,
        );

        let depth = if with_depth {
            let rb = gl.create_renderbuffer().ok_or_else(|| gl_error("renderbuffer"))?;
            gl.bind_renderbuffer(Gl::RENDERBUFFER, Some(&rb));
            gl.renderbuffer_storage(Gl::RENDERBUFFER, Gl::DEPTH_COMPONENT24, width, height);
            gl.framebuffer_renderbuffer(Gl::FRAMEBUFFER, Gl::DEPTH_ATTACHMENT, Gl::RENDERBUFFER, Some(&rb));
            gl.bind_renderbuffer(Gl::RENDERBUFFER, None);
            Some(rb)
        } else {
            None
        };

        let status = gl.check_framebuffer_status(Gl::FRAMEBUFFER);
        gl.bind_framebuffer(Gl::FRAMEBUFFER, None);
        if status != Gl::FRAMEBUFFER_COMPLETE {
            return Err(SceneError::Gl(format!("framebuffer incomplete: {status}")));
        }

        Ok(RenderTarget { texture, framebuffer, depth, width, height })
    }

    pub fn delete_render_target(&self, target: &RenderTarget) {
        self.gl.delete_framebuffer(Some(&target.framebuffer));
        self.gl.delete_texture(Some(&target.texture));
        if let Some(rb) = &target.depth {
            self.gl.delete_renderbuffer(Some(rb));
        }
    }

    pub fn get_uniform_location(&self, program: &WebGlProgram, name: &str) -> Option<WebGlUniformLocation> {
        self.gl.get_uniform_location(program, name)
    }

    pub fn uniform_1f(&self, location: Option<&WebGlUniformLocation>, value: f32) {
        self.gl.uniform1f(location, value);
    }

    pub fn uniform_2f(&self, location: Option<&WebGlUniformLocation>, x: f32, y: f32) {
        self.gl.uniform2f(location, x, y);
    }

    pub fn uniform_vec3(&self, location: Option<&WebGlUniformLocation>, v: Vec3) {
        self.gl.uniform3f(location, v.x, v.y, v.z);
    }

    /// Color uniform, scaled (for light or emissive intensity)
    pub fn uniform_color(&self, location: Option<&WebGlUniformLocation>, color: Color, scale: f32) {
        let [r, g, b] = color.to_rgb_f32();
        self.gl.uniform3f(location, r * scale, g * scale, b * scale);
    }

    pub fn uniform_matrix4fv(&self, location: Option<&WebGlUniformLocation>, data: &[f32; 16]) {
        self.gl.uniform_matrix4fv_with_f32_array(location, false, data);
    }

    pub fn uniform_1i(&self, location: Option<&WebGlUniformLocation>, value: i32) {
        self.gl.uniform1i(location, value);
    }

    pub fn clear(&self, color: Color) {
        let [r, g, b] = color.to_rgb_f32();
        self.gl.clear_color(r, g, b, 1.0);
        self.gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
    }

    pub fn enable_depth_test(&self, write: bool) {
        self.gl.enable(Gl::DEPTH_TEST);
        self.gl.depth_mask(write);
    }

    pub fn disable_blending(&self) {
        self.gl.disable(Gl::BLEND);
    }

    /// Additive blending for glowing points
    pub fn enable_additive_blending(&self) {
        self.gl.enable(Gl::BLEND);
        self.gl.blend_func(Gl::SRC_ALPHA, Gl::ONE);
    }

    pub fn viewport(&self, width: i32, height: i32) {
        self.gl.viewport(0, 0, width, height);
    }
}
