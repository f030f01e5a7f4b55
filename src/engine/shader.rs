use std::ffi::CString;
use std::fmt;

use gl::types::{GLchar, GLenum, GLint, GLsizei, GLuint};

use crate::engine::config::GlVersion;

/// Colour written by the fragment shader, RGBA.
pub const TRIANGLE_COLOR: [f32; 4] = [1.0, 0.5, 0.2, 1.0];

/// Pipeline stage a shader object belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "VERTEX",
            ShaderStage::Fragment => "FRAGMENT",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShaderError {
    #[error("ERROR::SHADER::{stage}::COMPILATION_FAILED\n{log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("ERROR::SHADER::PROGRAM::LINKING_FAILED\n{log}")]
    Link { log: String },

    #[error("ERROR::SHADER::{stage}::INVALID_SOURCE\nsource contains an interior NUL byte")]
    InvalidSource { stage: ShaderStage },
}

/// GLSL for the vertex stage: passes `aPos` (attribute 0) straight through.
pub fn vertex_source(version: GlVersion) -> String {
    format!(
        "#version {} core\n\
         layout (location = 0) in vec3 aPos;\n\
         \n\
         void main()\n\
         {{\n\
         \tgl_Position = vec4(aPos.x, aPos.y, aPos.z, 1.0);\n\
         }}\n",
        version.glsl()
    )
}

/// GLSL for the fragment stage: a constant [`TRIANGLE_COLOR`].
pub fn fragment_source(version: GlVersion) -> String {
    let [r, g, b, a] = TRIANGLE_COLOR;
    format!(
        "#version {} core\n\
         out vec4 FragColor;\n\
         \n\
         void main()\n\
         {{\n\
         \tFragColor = vec4({r:?}, {g:?}, {b:?}, {a:?});\n\
         }}\n",
        version.glsl()
    )
}

/// A compiled shader object. Deleted on drop.
#[derive(Debug)]
pub struct Shader {
    id: GLuint,
}

impl Shader {
    /// Compiles `source` for `stage`. Requires a current GL context.
    pub fn compile(stage: ShaderStage, source: &str) -> Result<Self, ShaderError> {
        let source = CString::new(source).map_err(|_| ShaderError::InvalidSource { stage })?;

        unsafe {
            let id = gl::CreateShader(stage.gl_enum());
            gl::ShaderSource(id, 1, &source.as_ptr(), std::ptr::null());
            gl::CompileShader(id);

            let mut status = gl::FALSE as GLint;
            gl::GetShaderiv(id, gl::COMPILE_STATUS, &mut status);
            if status != gl::TRUE as GLint {
                let log = read_info_log(id, gl::GetShaderiv, gl::GetShaderInfoLog);
                gl::DeleteShader(id);
                return Err(ShaderError::Compile { stage, log });
            }

            log::debug!("compiled {} shader", stage);
            Ok(Self { id })
        }
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteShader(self.id);
        }
    }
}

/// A linked program object. Deleted on drop.
#[derive(Debug)]
pub struct ShaderProgram {
    id: GLuint,
}

impl ShaderProgram {
    /// Links already compiled shaders into a program.
    ///
    /// Taking `Shader` values (rather than sources) means every stage has
    /// been compiled successfully before linking is attempted.
    pub fn link(shaders: &[Shader]) -> Result<Self, ShaderError> {
        unsafe {
            let id = gl::CreateProgram();
            for shader in shaders {
                gl::AttachShader(id, shader.id);
            }
            gl::LinkProgram(id);
            // Detach so the shader objects are freed once the caller drops them.
            for shader in shaders {
                gl::DetachShader(id, shader.id);
            }

            let mut status = gl::FALSE as GLint;
            gl::GetProgramiv(id, gl::LINK_STATUS, &mut status);
            if status != gl::TRUE as GLint {
                let log = read_info_log(id, gl::GetProgramiv, gl::GetProgramInfoLog);
                gl::DeleteProgram(id);
                return Err(ShaderError::Link { log });
            }

            Ok(Self { id })
        }
    }

    /// Compiles a vertex and a fragment stage and links them.
    pub fn from_sources(vertex: &str, fragment: &str) -> Result<Self, ShaderError> {
        let vs = Shader::compile(ShaderStage::Vertex, vertex)?;
        let fs = Shader::compile(ShaderStage::Fragment, fragment)?;
        Self::link(&[vs, fs])
    }

    /// Makes this program current for subsequent draw calls.
    pub fn bind(&self) {
        unsafe {
            gl::UseProgram(self.id);
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteProgram(self.id);
        }
    }
}

type GetParam = unsafe fn(GLuint, GLenum, *mut GLint);
type GetInfoLog = unsafe fn(GLuint, GLsizei, *mut GLsizei, *mut GLchar);

/// Fetches the info log of a shader or program object.
fn read_info_log(id: GLuint, get_param: GetParam, get_log: GetInfoLog) -> String {
    let mut len: GLint = 0;
    unsafe {
        get_param(id, gl::INFO_LOG_LENGTH, &mut len);
    }

    let mut buf = vec![0u8; len.max(0) as usize];
    let mut written: GLsizei = 0;
    if !buf.is_empty() {
        unsafe {
            get_log(id, len, &mut written, buf.as_mut_ptr() as *mut GLchar);
        }
    }
    buf.truncate(written.max(0) as usize);

    decode_info_log(&buf)
}

/// Turns a raw driver info log into a printable string.
pub fn decode_info_log(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim_end_matches('\0').trim_end();
    if text.is_empty() {
        "(no info log)".to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_maps_to_gl_enum() {
        assert_eq!(ShaderStage::Vertex.gl_enum(), gl::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.gl_enum(), gl::FRAGMENT_SHADER);
    }

    #[test]
    fn sources_carry_core_version_header() {
        let version = GlVersion::new(4, 6);
        assert!(vertex_source(version).starts_with("#version 460 core\n"));
        assert!(fragment_source(version).starts_with("#version 460 core\n"));
        assert!(vertex_source(GlVersion::new(3, 3)).starts_with("#version 330 core\n"));
    }

    #[test]
    fn vertex_source_reads_attribute_zero() {
        let src = vertex_source(GlVersion::default());
        assert!(src.contains("layout (location = 0) in vec3 aPos;"));
        assert!(src.contains("gl_Position = vec4(aPos.x, aPos.y, aPos.z, 1.0);"));
        assert!(!src.contains('\0'));
    }

    #[test]
    fn fragment_source_writes_triangle_color() {
        let src = fragment_source(GlVersion::default());
        assert!(src.contains("out vec4 FragColor;"));
        assert!(src.contains("FragColor = vec4(1.0, 0.5, 0.2, 1.0);"));
    }

    #[test]
    fn compile_error_is_tagged_with_stage() {
        let err = ShaderError::Compile {
            stage: ShaderStage::Fragment,
            log: "0:1(10): error: syntax error".into(),
        };
        assert_eq!(
            err.to_string(),
            "ERROR::SHADER::FRAGMENT::COMPILATION_FAILED\n0:1(10): error: syntax error"
        );
    }

    #[test]
    fn link_error_format() {
        let err = ShaderError::Link { log: "missing main".into() };
        assert_eq!(err.to_string(), "ERROR::SHADER::PROGRAM::LINKING_FAILED\nmissing main");
    }

    #[test]
    fn interior_nul_is_rejected_before_touching_gl() {
        let err = Shader::compile(ShaderStage::Vertex, "void main() {}\0trailing").unwrap_err();
        assert_eq!(err, ShaderError::InvalidSource { stage: ShaderStage::Vertex });
    }

    #[test]
    fn info_log_strips_terminator_and_whitespace() {
        assert_eq!(decode_info_log(b"error: bad token\n\0"), "error: bad token");
        assert_eq!(decode_info_log(b"line 1\nline 2\0\0"), "line 1\nline 2");
    }

    #[test]
    fn empty_info_log_is_labelled() {
        assert_eq!(decode_info_log(b""), "(no info log)");
        assert_eq!(decode_info_log(b"\0"), "(no info log)");
    }
}
