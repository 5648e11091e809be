//! GLSL ES 1.0 sources for the pass-through effect and the built-in presets.
//!
//! Every vertex shader receives the base render parameters (`progress`, `duration`,
//! `source_resolution`, `output_resolution`) as uniforms and forwards them as varyings.

/// Pass-through vertex shader used when an effect supplies none.
pub const DEFAULT_VERTEX_SHADER: &str = r#"
uniform float progress;
uniform float duration;
uniform vec2 source_resolution;
uniform vec2 output_resolution;
attribute vec2 a_position;
attribute vec2 a_texCoord;
varying vec2 v_texCoord;
varying float v_progress;
varying float v_duration;
varying vec2 v_source_resolution;
varying vec2 v_output_resolution;
void main() {
    v_progress = progress;
    v_duration = duration;
    v_source_resolution = source_resolution;
    v_output_resolution = output_resolution;
    gl_Position = vec4(vec2(2.0, 2.0) * a_position - vec2(1.0, 1.0), 0.0, 1.0);
    v_texCoord = a_texCoord;
}
"#;

/// Pass-through fragment shader used when an effect supplies none.
pub const DEFAULT_FRAGMENT_SHADER: &str = r#"
precision mediump float;
uniform sampler2D u_image;
varying vec2 v_texCoord;
void main() {
    gl_FragColor = texture2D(u_image, v_texCoord);
}
"#;

pub(crate) const OFFSET_SCALE_VERTEX_SHADER: &str = r#"
uniform float progress;
uniform float duration;
uniform vec2 source_resolution;
uniform vec2 output_resolution;
uniform float scaleX;
uniform float scaleY;
uniform float offsetX;
uniform float offsetY;
attribute vec2 a_position;
attribute vec2 a_texCoord;
varying vec2 v_texCoord;
varying float v_progress;
varying float v_duration;
varying vec2 v_source_resolution;
varying vec2 v_output_resolution;
void main() {
    v_progress = progress;
    v_duration = duration;
    v_source_resolution = source_resolution;
    v_output_resolution = output_resolution;
    gl_Position = vec4(vec2(2.0 * scaleX, 2.0 * scaleY) * a_position - vec2(1.0 + offsetX, 1.0 + offsetY), 0.0, 1.0);
    v_texCoord = a_texCoord;
}
"#;

pub(crate) const IN_OUT_VERTEX_SHADER: &str = r#"
uniform float progress;
uniform float duration;
uniform vec2 source_resolution;
uniform vec2 output_resolution;
uniform float inTime;
uniform float outTime;
attribute vec2 a_position;
attribute vec2 a_texCoord;
varying vec2 v_texCoord;
varying float v_progress;
varying float v_duration;
varying float v_inTime;
varying float v_outTime;
varying vec2 v_source_resolution;
varying vec2 v_output_resolution;
void main() {
    v_progress = progress;
    v_duration = duration;
    v_inTime = inTime;
    v_outTime = outTime;
    v_source_resolution = source_resolution;
    v_output_resolution = output_resolution;
    gl_Position = vec4(vec2(2.0, 2.0) * a_position - vec2(1.0, 1.0), 0.0, 1.0);
    v_texCoord = a_texCoord;
}
"#;

pub(crate) const FADE_IN_OUT_FRAGMENT_SHADER: &str = r#"
precision mediump float;
uniform sampler2D u_image;
varying vec2 v_texCoord;
varying float v_progress;
varying float v_duration;
varying float v_inTime;
varying float v_outTime;
void main() {
    float alpha = 1.0;
    float t = v_progress * v_duration;
    if (v_inTime > 0.0 && t < v_inTime) {
        alpha = t / v_inTime;
    }
    if (v_outTime > 0.0 && t > v_duration - v_outTime) {
        alpha = (v_duration - t) / v_outTime;
    }
    vec4 pixel = texture2D(u_image, v_texCoord);
    gl_FragColor = vec4(pixel.rgb, pixel.a * clamp(alpha, 0.0, 1.0));
}
"#;

pub(crate) const MONOCHROME_FRAGMENT_SHADER: &str = r#"
precision mediump float;
uniform sampler2D u_image;
varying vec2 v_texCoord;
void main() {
    vec4 pixel = texture2D(u_image, v_texCoord);
    float avg = (pixel.r * 0.2125 + pixel.g * 0.7154 + pixel.b * 0.0721) / 3.0;
    gl_FragColor = vec4(avg * 1.5, avg * 1.5, avg * 1.5, pixel.a);
}
"#;

pub(crate) const SEPIA_FRAGMENT_SHADER: &str = r#"
precision mediump float;
uniform sampler2D u_image;
varying vec2 v_texCoord;
void main() {
    vec4 pixel = texture2D(u_image, v_texCoord);
    float avg = (pixel.r * 0.2125 + pixel.g * 0.7154 + pixel.b * 0.0721) / 3.0;
    gl_FragColor = vec4(avg * 2.0, avg * 1.6, avg, pixel.a);
}
"#;

pub(crate) const BITCRUNCH_FRAGMENT_SHADER: &str = r#"
precision mediump float;
uniform sampler2D u_image;
varying vec2 v_texCoord;
void main() {
    vec4 pixel = texture2D(u_image, v_texCoord);
    pixel = floor(pixel * vec4(8.0, 8.0, 8.0, 8.0)) / vec4(8.0, 8.0, 8.0, 8.0);
    gl_FragColor = pixel;
}
"#;

pub(crate) const GREEN_SCREEN_VERTEX_SHADER: &str = r#"
uniform float progress;
uniform float duration;
uniform vec2 source_resolution;
uniform vec2 output_resolution;
uniform float yLowerThreshold;
uniform float yUpperThreshold;
attribute vec2 a_position;
attribute vec2 a_texCoord;
varying vec2 v_texCoord;
varying float v_progress;
varying float v_duration;
varying float v_yLowerThreshold;
varying float v_yUpperThreshold;
varying vec2 v_source_resolution;
varying vec2 v_output_resolution;
void main() {
    v_progress = progress;
    v_duration = duration;
    v_yLowerThreshold = yLowerThreshold;
    v_yUpperThreshold = yUpperThreshold;
    v_source_resolution = source_resolution;
    v_output_resolution = output_resolution;
    gl_Position = vec4(vec2(2.0, 2.0) * a_position - vec2(1.0, 1.0), 0.0, 1.0);
    v_texCoord = a_texCoord;
}
"#;

pub(crate) const GREEN_SCREEN_FRAGMENT_SHADER: &str = r#"
precision mediump float;
uniform sampler2D u_image;
varying vec2 v_texCoord;
varying float v_yLowerThreshold;
varying float v_yUpperThreshold;
void main() {
    vec4 pixel = texture2D(u_image, v_texCoord);
    float y = 0.299 * pixel.r + 0.587 * pixel.g + 0.114 * pixel.b;
    float u = -0.147 * pixel.r - 0.289 * pixel.g + 0.436 * pixel.b;
    float v = 0.615 * pixel.r - 0.515 * pixel.g - 0.100 * pixel.b;
    float alpha = 1.0;
    if (y > v_yLowerThreshold && y < v_yUpperThreshold) {
        alpha = (v + u) * 40.0 + 2.0;
    }
    gl_FragColor = vec4(pixel.rgb, pixel.a * clamp(alpha, 0.0, 1.0));
}
"#;

pub(crate) const PRESERVE_ASPECT_RATIO_FRAGMENT_SHADER: &str = r#"
precision mediump float;
uniform sampler2D u_image;
varying vec2 v_texCoord;
varying vec2 v_source_resolution;
varying vec2 v_output_resolution;
void main() {
    float scale = 1.0;
    float source_aspect = v_source_resolution.x / v_source_resolution.y;
    float output_aspect = v_output_resolution.x / v_output_resolution.y;
    if (output_aspect > source_aspect) {
        scale = v_output_resolution.y / v_source_resolution.y;
    } else {
        scale = v_output_resolution.x / v_source_resolution.x;
    }
    vec2 fitted = v_source_resolution * scale;
    vec2 o = v_texCoord * v_output_resolution;
    vec2 s = o - (v_output_resolution / 2.0 - fitted / 2.0);
    if (s.x < 0.0 || s.x > fitted.x || s.y < 0.0 || s.y > fitted.y) {
        gl_FragColor = vec4(0.0, 0.0, 0.0, 0.0);
    } else {
        gl_FragColor = texture2D(u_image, s / fitted);
    }
}
"#;
