use std::cell::RefCell;
use std::rc::Rc;

use crate::{
    effects::params::ParamMap,
    foundation::core::{ProgramHandle, Resolution, TextureRef},
    foundation::error::{PlaybackError, PlaybackResult, ShaderStage},
    render::renderer::{DrawCall, Renderer},
};

/// Owned copy of a [`DrawCall`].
#[derive(Clone, Debug, PartialEq)]
pub struct DrawRecord {
    /// Program used.
    pub program: ProgramHandle,
    /// Source texture key.
    pub source: String,
    /// Merged uniforms.
    pub params: ParamMap,
    /// Extra sampler inputs.
    pub textures: Vec<TextureRef>,
}

/// Everything a [`HeadlessRenderer`] has been asked to do.
#[derive(Clone, Debug, Default)]
pub struct RenderLog {
    /// Number of successful program compilations.
    pub compiled: usize,
    /// Number of clears (one per rendered frame).
    pub clears: usize,
    /// Draws per frame; a new frame starts at each clear.
    pub frames: Vec<Vec<DrawRecord>>,
}

impl RenderLog {
    /// Draws of the most recent frame.
    pub fn last_frame(&self) -> &[DrawRecord] {
        self.frames.last().map(Vec::as_slice).unwrap_or_default()
    }

    /// Source keys of the most recent frame, in draw order.
    pub fn last_frame_sources(&self) -> Vec<String> {
        self.last_frame().iter().map(|d| d.source.clone()).collect()
    }
}

/// In-memory renderer that records calls instead of drawing.
///
/// Any non-empty shader source compiles. A source containing `#error` fails to compile for
/// that stage, and a fragment shader without `main` fails to link.
pub struct HeadlessRenderer {
    resolution: Resolution,
    next_program: u64,
    log: Rc<RefCell<RenderLog>>,
}

impl HeadlessRenderer {
    /// Renderer with an output of `resolution`.
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            next_program: 1,
            log: Rc::new(RefCell::new(RenderLog::default())),
        }
    }

    /// Shared handle to the call log; stays valid after the renderer is moved into a compositor.
    pub fn log(&self) -> Rc<RefCell<RenderLog>> {
        Rc::clone(&self.log)
    }
}

fn check_stage(stage: ShaderStage, src: &str) -> PlaybackResult<()> {
    if src.trim().is_empty() {
        return Err(PlaybackError::shader_compile(stage, "empty shader source"));
    }
    if let Some(line) = src.lines().find(|l| l.trim_start().starts_with("#error")) {
        return Err(PlaybackError::shader_compile(stage, line.trim()));
    }
    Ok(())
}

impl Renderer for HeadlessRenderer {
    fn compile_program(&mut self, vertex: &str, fragment: &str) -> PlaybackResult<ProgramHandle> {
        check_stage(ShaderStage::Vertex, vertex)?;
        check_stage(ShaderStage::Fragment, fragment)?;
        if !fragment.contains("main") {
            return Err(PlaybackError::shader_link("fragment shader has no entry point"));
        }
        let handle = ProgramHandle(self.next_program);
        self.next_program += 1;
        self.log.borrow_mut().compiled += 1;
        Ok(handle)
    }

    fn clear(&mut self) {
        let mut log = self.log.borrow_mut();
        log.clears += 1;
        log.frames.push(Vec::new());
    }

    fn draw(&mut self, call: DrawCall<'_>) -> PlaybackResult<()> {
        let record = DrawRecord {
            program: call.program,
            source: call.source.texture.clone(),
            params: call.params.clone(),
            textures: call.textures.to_vec(),
        };
        let mut log = self.log.borrow_mut();
        if log.frames.is_empty() {
            log.frames.push(Vec::new());
        }
        if let Some(frame) = log.frames.last_mut() {
            frame.push(record);
        }
        Ok(())
    }

    fn output_resolution(&self) -> Resolution {
        self.resolution
    }
}
