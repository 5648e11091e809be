use std::collections::HashMap;

use xxhash_rust::xxh3::Xxh3;

use crate::{
    foundation::core::ProgramHandle, foundation::error::PlaybackResult,
    playlist::model::EffectDef, render::renderer::Renderer,
};

const XXH3_SEED: u64 = 0x5eed_0fe4_4ec7_a11d;

/// Stable identity of an effect's shader pair.
///
/// Two effects with identical vertex and fragment sources share one key, and therefore one
/// compiled program, whatever binding ids they sit under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct EffectKey {
    /// High 64 bits of the xxh3-128 digest.
    pub hi: u64,
    /// Low 64 bits of the xxh3-128 digest.
    pub lo: u64,
}

impl EffectKey {
    /// Fingerprint the shader sources of `effect`.
    pub fn of(effect: &EffectDef) -> Self {
        Self::from_sources(&effect.vertex_shader, &effect.fragment_shader)
    }

    /// Fingerprint a vertex/fragment pair.
    pub fn from_sources(vertex: &str, fragment: &str) -> Self {
        let mut h = StableHasher::new();
        h.write_str(vertex);
        h.write_str(fragment);
        h.finish()
    }
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    // Length-prefixed so ("ab", "c") and ("a", "bc") differ.
    fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> EffectKey {
        let v = self.inner.digest128();
        EffectKey {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

/// Linked programs keyed by [`EffectKey`].
#[derive(Debug, Default)]
pub struct ProgramCache {
    programs: HashMap<EffectKey, ProgramHandle>,
}

impl ProgramCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Program for `effect`, compiling it through `renderer` on first use.
    pub fn get_or_compile(
        &mut self,
        renderer: &mut dyn Renderer,
        effect: &EffectDef,
    ) -> PlaybackResult<(EffectKey, ProgramHandle)> {
        let key = EffectKey::of(effect);
        if let Some(p) = self.programs.get(&key) {
            return Ok((key, *p));
        }
        let program = renderer.compile_program(&effect.vertex_shader, &effect.fragment_shader)?;
        tracing::debug!(?key, ?program, "compiled effect program");
        self.programs.insert(key, program);
        Ok((key, program))
    }

    /// Cached program for `key`, if any.
    pub fn get(&self, key: &EffectKey) -> Option<ProgramHandle> {
        self.programs.get(key).copied()
    }

    /// Number of distinct programs.
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// `true` when nothing has been compiled.
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}
