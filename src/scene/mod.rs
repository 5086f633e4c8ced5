use glam::{Mat3, Mat4};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, WebGl2RenderingContext, WebGlBuffer, WebGlProgram, WebGlShader,
    WebGlUniformLocation, WebGlVertexArrayObject,
};

use crate::{
    camera::{canvas_size, OrthoCamera},
    card::Card,
    config::{BookConfig, Lighting},
    geometry::{self, Mesh, FLOATS_PER_VERTEX},
    log,
};

type Gl = WebGl2RenderingContext;

const AXES_LENGTH: f32 = 5.0;

const VERTEX_SHADER: &str = r##"#version 300 es
in vec3 a_position;
in vec3 a_normal;

uniform mat4 u_projection;
uniform mat4 u_view;
uniform mat4 u_model;
uniform mat3 u_normal_matrix;

out vec3 v_normal;

void main() {
  v_normal = u_normal_matrix * a_normal;
  gl_Position = u_projection * u_view * u_model * vec4(a_position, 1.0);
}
"##;

const FRAGMENT_SHADER: &str = r##"#version 300 es
precision mediump float;

in vec3 v_normal;

uniform vec3 u_color;
uniform vec3 u_ambient;
uniform vec3 u_light_color;
uniform vec3 u_light_direction;
uniform bool u_unlit;

out vec4 out_color;

void main() {
  if (u_unlit) {
    out_color = vec4(u_color, 1.0);
    return;
  }
  vec3 normal = normalize(v_normal);
  if (!gl_FrontFacing) {
    normal = -normal;
  }
  float diffuse = max(dot(normal, u_light_direction), 0.0);
  vec3 light = u_ambient + u_light_color * diffuse;
  out_color = vec4(u_color * light, 1.0);
}
"##;

struct Uniforms {
    projection: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    model: Option<WebGlUniformLocation>,
    normal_matrix: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    ambient: Option<WebGlUniformLocation>,
    light_color: Option<WebGlUniformLocation>,
    light_direction: Option<WebGlUniformLocation>,
    unlit: Option<WebGlUniformLocation>,
}

impl Uniforms {
    fn locate(context: &Gl, program: &WebGlProgram) -> Self {
        let at = |name: &str| context.get_uniform_location(program, name);
        Uniforms {
            projection: at("u_projection"),
            view: at("u_view"),
            model: at("u_model"),
            normal_matrix: at("u_normal_matrix"),
            color: at("u_color"),
            ambient: at("u_ambient"),
            light_color: at("u_light_color"),
            light_direction: at("u_light_direction"),
            unlit: at("u_unlit"),
        }
    }
}

/// A vertex array holding interleaved position/normal data.
struct GpuMesh {
    vao: WebGlVertexArrayObject,
    buffer: WebGlBuffer,
    vertex_count: i32,
}

impl GpuMesh {
    fn upload(context: &Gl, program: &WebGlProgram, data: &[f32]) -> Result<GpuMesh, String> {
        let vao = context
            .create_vertex_array()
            .ok_or_else(|| String::from("Unable to create vertex array object"))?;
        let buffer = context
            .create_buffer()
            .ok_or_else(|| String::from("Failed to create buffer"))?;

        context.bind_vertex_array(Some(&vao));
        context.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
        let array = js_sys::Float32Array::from(data);
        context.buffer_data_with_array_buffer_view(Gl::ARRAY_BUFFER, &array, Gl::STATIC_DRAW);

        let stride = (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as i32;
        for (name, offset) in [("a_position", 0), ("a_normal", 3)] {
            let location = context.get_attrib_location(program, name);
            if location < 0 {
                return Err(format!("attribute {} missing from shader program", name));
            }
            context.vertex_attrib_pointer_with_i32(
                location as u32,
                3,
                Gl::FLOAT,
                false,
                stride,
                offset * std::mem::size_of::<f32>() as i32,
            );
            context.enable_vertex_attrib_array(location as u32);
        }
        context.bind_vertex_array(None);

        Ok(GpuMesh {
            vao,
            buffer,
            vertex_count: (data.len() / FLOATS_PER_VERTEX) as i32,
        })
    }

    fn release(&self, context: &Gl) {
        context.delete_vertex_array(Some(&self.vao));
        context.delete_buffer(Some(&self.buffer));
    }
}

/// WebGL2 state for one mounted book: shader program, the card mesh shared
/// by every page and the optional debug axes.
pub struct Renderer {
    context: Gl,
    program: WebGlProgram,
    uniforms: Uniforms,
    card_mesh: GpuMesh,
    axes: Option<(GpuMesh, [[f32; 3]; 3])>,
}

impl Renderer {
    pub fn new(canvas: &HtmlCanvasElement, mesh: &Mesh, debug_overlay: bool) -> Result<Renderer, JsValue> {
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"alpha".into(), &JsValue::from_bool(true))?;
        js_sys::Reflect::set(&options, &"antialias".into(), &JsValue::from_bool(true))?;
        let context = canvas
            .get_context_with_context_options("webgl2", &options)?
            .ok_or("WebGL2 is not available in this browser")?
            .dyn_into::<Gl>()?;

        let vert_shader = compile_shader(&context, Gl::VERTEX_SHADER, VERTEX_SHADER)?;
        let frag_shader = compile_shader(&context, Gl::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
        let program = link_program(&context, &vert_shader, &frag_shader);
        // the program keeps what it needs once linked
        context.delete_shader(Some(&vert_shader));
        context.delete_shader(Some(&frag_shader));
        let program = program?;

        let uniforms = Uniforms::locate(&context, &program);
        let card_mesh = GpuMesh::upload(&context, &program, &mesh.data)?;

        let axes = if debug_overlay {
            let mut data = Vec::with_capacity(3 * 2 * FLOATS_PER_VERTEX);
            let mut colors = [[0.0; 3]; 3];
            for (i, (color, line)) in geometry::axes(AXES_LENGTH).iter().enumerate() {
                colors[i] = *color;
                data.extend_from_slice(&line[0..3]);
                data.extend_from_slice(&[0.0; 3]);
                data.extend_from_slice(&line[3..6]);
                data.extend_from_slice(&[0.0; 3]);
            }
            Some((GpuMesh::upload(&context, &program, &data)?, colors))
        } else {
            None
        };

        context.clear_color(0.0, 0.0, 0.0, 0.0);
        context.enable(Gl::DEPTH_TEST);
        context.disable(Gl::CULL_FACE);

        Ok(Renderer {
            context,
            program,
            uniforms,
            card_mesh,
            axes,
        })
    }

    pub fn draw(
        &self,
        canvas_width: u32,
        canvas_height: u32,
        camera: &OrthoCamera,
        lighting: &Lighting,
        cards: &[Card],
    ) {
        let gl = &self.context;
        let u = &self.uniforms;
        gl.viewport(0, 0, canvas_width as i32, canvas_height as i32);
        gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
        gl.use_program(Some(&self.program));

        gl.uniform_matrix4fv_with_f32_array(
            u.projection.as_ref(),
            false,
            &camera.projection_matrix().to_cols_array(),
        );
        gl.uniform_matrix4fv_with_f32_array(
            u.view.as_ref(),
            false,
            &camera.view_matrix().to_cols_array(),
        );

        let ambient = lighting.ambient.color.to_array().map(|c| c * lighting.ambient.intensity);
        let directional = lighting
            .directional
            .color
            .to_array()
            .map(|c| c * lighting.directional.intensity);
        let towards_light = lighting.directional_position.normalize_or_zero();
        gl.uniform3fv_with_f32_array(u.ambient.as_ref(), &ambient);
        gl.uniform3fv_with_f32_array(u.light_color.as_ref(), &directional);
        gl.uniform3fv_with_f32_array(u.light_direction.as_ref(), &towards_light.to_array());

        gl.uniform1i(u.unlit.as_ref(), 0);
        gl.bind_vertex_array(Some(&self.card_mesh.vao));
        for card in cards {
            let model = card.model_matrix();
            let normal_matrix = Mat3::from_mat4(model).inverse().transpose();
            gl.uniform_matrix4fv_with_f32_array(u.model.as_ref(), false, &model.to_cols_array());
            gl.uniform_matrix3fv_with_f32_array(
                u.normal_matrix.as_ref(),
                false,
                &normal_matrix.to_cols_array(),
            );
            gl.uniform3fv_with_f32_array(u.color.as_ref(), &card.color.to_array());
            gl.draw_arrays(Gl::TRIANGLES, 0, self.card_mesh.vertex_count);
        }

        if let Some((axes, colors)) = &self.axes {
            gl.uniform1i(u.unlit.as_ref(), 1);
            gl.uniform_matrix4fv_with_f32_array(
                u.model.as_ref(),
                false,
                &Mat4::IDENTITY.to_cols_array(),
            );
            gl.bind_vertex_array(Some(&axes.vao));
            for (i, color) in colors.iter().enumerate() {
                gl.uniform3fv_with_f32_array(u.color.as_ref(), color);
                gl.draw_arrays(Gl::LINES, (i * 2) as i32, 2);
            }
        }
        gl.bind_vertex_array(None);
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        self.card_mesh.release(&self.context);
        if let Some((axes, _)) = &self.axes {
            axes.release(&self.context);
        }
        self.context.delete_program(Some(&self.program));
    }
}

/// Camera, renderer and lights for one mounted book.
pub struct Scene {
    canvas: HtmlCanvasElement,
    camera: OrthoCamera,
    lighting: Lighting,
    viewport_fraction: f64,
    renderer: Renderer,
}

impl Scene {
    pub fn new(
        canvas: HtmlCanvasElement,
        config: &BookConfig,
        inner_width: f64,
        inner_height: f64,
    ) -> Result<Scene, JsValue> {
        let mesh = geometry::card_mesh(&config.dimensions, &config.extrude);
        log!(
            "card mesh: {} triangles, {} pages",
            mesh.triangle_count(),
            config.page_count()
        );
        let renderer = Renderer::new(&canvas, &mesh, config.debug_overlay)?;
        let mut scene = Scene {
            canvas,
            camera: OrthoCamera::new(config.camera, inner_width, inner_height),
            lighting: config.lighting,
            viewport_fraction: config.camera.viewport_fraction,
            renderer,
        };
        scene.resize(inner_width, inner_height)?;
        Ok(scene)
    }

    /// Recomputes the camera bounds and the canvas size for a new window size.
    pub fn resize(&mut self, inner_width: f64, inner_height: f64) -> Result<(), JsValue> {
        self.camera.resize(inner_width, inner_height);
        let (width, height) = canvas_size(inner_width, inner_height, self.viewport_fraction);
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        let style = self.canvas.style();
        style.set_property("width", &format!("{}px", width))?;
        style.set_property("height", &format!("{}px", height))?;
        Ok(())
    }

    pub fn draw(&self, cards: &[Card]) {
        self.renderer.draw(
            self.canvas.width(),
            self.canvas.height(),
            &self.camera,
            &self.lighting,
            cards,
        );
    }
}

pub fn compile_shader(
    context: &Gl,
    shader_type: u32,
    source: &str,
) -> Result<WebGlShader, String> {
    let shader = context
        .create_shader(shader_type)
        .ok_or_else(|| String::from("Unable to create shader object"))?;
    context.shader_source(&shader, source);
    context.compile_shader(&shader);

    if context
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let message = context
            .get_shader_info_log(&shader)
            .unwrap_or_else(|| String::from("Unknown error creating shader"));
        context.delete_shader(Some(&shader));
        Err(message)
    }
}

pub fn link_program(
    context: &Gl,
    vert_shader: &WebGlShader,
    frag_shader: &WebGlShader,
) -> Result<WebGlProgram, String> {
    let program = context
        .create_program()
        .ok_or_else(|| String::from("Unable to create shader object"))?;

    context.attach_shader(&program, vert_shader);
    context.attach_shader(&program, frag_shader);
    context.link_program(&program);

    if context
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let message = context
            .get_program_info_log(&program)
            .unwrap_or_else(|| String::from("Unknown error creating program object"));
        context.delete_program(Some(&program));
        Err(message)
    }
}
