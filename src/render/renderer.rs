use crate::{
    effects::params::ParamMap,
    foundation::core::{ProgramHandle, Resolution, TextureRef},
    foundation::error::PlaybackResult,
};

/// One textured-quad draw issued by a media source.
#[derive(Clone, Copy, Debug)]
pub struct DrawCall<'a> {
    /// Linked program to draw with.
    pub program: ProgramHandle,
    /// The source's current frame, bound to the first texture unit.
    pub source: &'a TextureRef,
    /// Fully merged uniform values.
    pub params: &'a ParamMap,
    /// Extra sampler inputs, bound after the source in this order.
    pub textures: &'a [TextureRef],
}

/// Drawing surface and shader compiler the compositor renders through.
///
/// Implementations own the GPU context (or stand-in). The compositor clears once per rendered
/// tick and then lets each currently-playing source issue its own [`DrawCall`].
pub trait Renderer {
    /// Compile and link a program from GLSL sources.
    ///
    /// Fails with [`PlaybackError::ShaderCompile`](crate::PlaybackError::ShaderCompile) or
    /// [`PlaybackError::ShaderLink`](crate::PlaybackError::ShaderLink).
    fn compile_program(&mut self, vertex: &str, fragment: &str) -> PlaybackResult<ProgramHandle>;

    /// Clear the output surface before a frame.
    fn clear(&mut self);

    /// Draw one source quad.
    fn draw(&mut self, call: DrawCall<'_>) -> PlaybackResult<()>;

    /// Output surface size.
    fn output_resolution(&self) -> Resolution;
}
