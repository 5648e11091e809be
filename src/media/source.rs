use crate::{
    effects::params::ParamMap,
    foundation::core::{ElementHandle, ProgramHandle, Resolution, TextureRef},
    foundation::error::PlaybackResult,
    render::renderer::Renderer,
};

/// A loadable, seekable, drawable media source backing one segment.
///
/// The compositor drives sources only through this trait. Loading may complete on a later tick
/// than [`MediaSource::load`]; the compositor polls [`MediaSource::is_ready`] and never blocks.
pub trait MediaSource {
    /// Begin loading. Returns `true` when the source is already usable.
    fn load(&mut self) -> PlaybackResult<bool>;

    /// Start or resume media-clock playback.
    fn play(&mut self);

    /// Pause media-clock playback.
    fn pause(&mut self);

    /// Jump to `source_time` seconds in source media time.
    fn seek(&mut self, source_time: f64);

    /// `true` once a frame can be drawn.
    fn is_ready(&self) -> bool;

    /// Release the underlying media. Host-supplied elements are left to the host.
    fn destroy(&mut self);

    /// Draw the current frame through `renderer`.
    fn render(
        &mut self,
        renderer: &mut dyn Renderer,
        program: ProgramHandle,
        params: &ParamMap,
        textures: &[TextureRef],
    ) -> PlaybackResult<()>;

    /// Intrinsic media size.
    fn resolution(&self) -> Resolution;

    /// Element whose audio can be routed, if the source has sound.
    fn audio_element(&self) -> Option<ElementHandle> {
        None
    }
}
