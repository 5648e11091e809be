use crate::{
    effects::params::{ParamMap, overlay, texture_refs},
    effects::program::{EffectKey, ProgramCache},
    foundation::core::{ProgramHandle, TextureRef},
    foundation::error::PlaybackResult,
    foundation::ordered::OrderedMap,
    playlist::model::{EffectBinding, EffectDef},
    render::renderer::Renderer,
};

/// Binding id reported for segments that no binding lists.
pub const DEFAULT_EFFECT_ID: &str = "default";

/// An effect binding with its program linked.
#[derive(Clone, Debug, PartialEq)]
pub struct CompiledEffect {
    /// Binding id (or [`DEFAULT_EFFECT_ID`]).
    pub id: String,
    /// Segment ids this binding applies to.
    pub inputs: Vec<String>,
    /// Shader identity.
    pub key: EffectKey,
    /// Linked program.
    pub program: ProgramHandle,
    /// Effect defaults.
    pub default_parameters: ParamMap,
    /// Live overrides.
    pub parameters: ParamMap,
    /// Texture inputs referenced by defaults and overrides, in uniform-name order.
    pub textures: Vec<TextureRef>,
}

impl CompiledEffect {
    /// Layer `base`, then the effect defaults, then the live overrides.
    pub fn merged_params(&self, base: &ParamMap) -> ParamMap {
        let mut out = base.clone();
        overlay(&mut out, &self.default_parameters);
        overlay(&mut out, &self.parameters);
        out
    }

    fn applies_to(&self, segment_id: &str) -> bool {
        self.inputs.iter().any(|i| i == segment_id)
    }

    fn refresh_textures(&mut self) {
        let mut all = self.default_parameters.clone();
        overlay(&mut all, &self.parameters);
        self.textures = texture_refs(&all);
    }
}

/// Maps segment ids to compiled effects.
///
/// Bindings are matched first-wins in playlist declaration order. Programs are shared between
/// bindings with the same [`EffectKey`].
#[derive(Debug)]
pub struct EffectResolver {
    default: CompiledEffect,
    effects: OrderedMap<CompiledEffect>,
    cache: ProgramCache,
}

impl EffectResolver {
    /// Resolver holding only the pass-through default, compiled through `renderer`.
    pub fn new(renderer: &mut dyn Renderer) -> PlaybackResult<Self> {
        let mut cache = ProgramCache::new();
        let def = EffectDef::passthrough();
        let (key, program) = cache.get_or_compile(renderer, &def)?;
        let default = CompiledEffect {
            id: DEFAULT_EFFECT_ID.to_owned(),
            inputs: Vec::new(),
            key,
            program,
            default_parameters: def.default_parameters,
            parameters: ParamMap::new(),
            textures: Vec::new(),
        };
        Ok(Self {
            default,
            effects: OrderedMap::new(),
            cache,
        })
    }

    /// Effect for `segment_id`: the first binding listing it, else the default.
    pub fn resolve(&self, segment_id: &str) -> &CompiledEffect {
        self.effects
            .iter()
            .map(|(_, e)| e)
            .find(|e| e.applies_to(segment_id))
            .unwrap_or(&self.default)
    }

    /// The pass-through effect.
    pub fn default_effect(&self) -> &CompiledEffect {
        &self.default
    }

    /// Compiled binding by id.
    pub fn get(&self, binding_id: &str) -> Option<&CompiledEffect> {
        self.effects.get(binding_id)
    }

    /// Known binding ids in match order.
    pub fn binding_ids(&self) -> impl Iterator<Item = &str> {
        self.effects.keys()
    }

    /// Compile and add a new binding at the end of the match order.
    pub fn create(
        &mut self,
        renderer: &mut dyn Renderer,
        binding_id: &str,
        binding: &EffectBinding,
    ) -> PlaybackResult<()> {
        let compiled = self.compile(renderer, binding_id, binding)?;
        self.effects.insert(binding_id, compiled);
        Ok(())
    }

    /// Update a known binding in place, recompiling only when its shader identity changed.
    ///
    /// Unknown ids are created.
    pub fn update(
        &mut self,
        renderer: &mut dyn Renderer,
        binding_id: &str,
        binding: &EffectBinding,
    ) -> PlaybackResult<()> {
        let key = EffectKey::of(&binding.effect);
        let program = match self.effects.get(binding_id) {
            None => return self.create(renderer, binding_id, binding),
            Some(existing) if existing.key == key => existing.program,
            Some(_) => self.cache.get_or_compile(renderer, &binding.effect)?.1,
        };
        if let Some(existing) = self.effects.get_mut(binding_id) {
            existing.key = key;
            existing.program = program;
            if existing.inputs != binding.inputs {
                existing.inputs.clone_from(&binding.inputs);
            }
            if existing.default_parameters != binding.effect.default_parameters
                || existing.parameters != binding.parameters
            {
                existing
                    .default_parameters
                    .clone_from(&binding.effect.default_parameters);
                existing.parameters.clone_from(&binding.parameters);
                existing.refresh_textures();
            }
        }
        Ok(())
    }

    /// Reconcile with the playlist's bindings: create new ones, update known ones, drop the
    /// rest. Match order follows `bindings`.
    pub fn sync(
        &mut self,
        renderer: &mut dyn Renderer,
        bindings: &OrderedMap<EffectBinding>,
    ) -> PlaybackResult<()> {
        let stale: Vec<String> = self
            .effects
            .keys()
            .filter(|id| !bindings.contains_key(id))
            .map(str::to_owned)
            .collect();
        for id in &stale {
            tracing::debug!(binding = %id, "dropping effect binding");
            self.effects.remove(id);
        }

        for (id, binding) in bindings.iter() {
            self.update(renderer, id, binding)?;
        }

        if !self.effects.keys().eq(bindings.keys()) {
            let mut reordered = OrderedMap::new();
            for id in bindings.keys() {
                if let Some(e) = self.effects.remove(id) {
                    reordered.insert(id, e);
                }
            }
            self.effects = reordered;
        }
        Ok(())
    }

    /// Distinct compiled programs, including the default.
    pub fn program_count(&self) -> usize {
        self.cache.len()
    }

    fn compile(
        &mut self,
        renderer: &mut dyn Renderer,
        binding_id: &str,
        binding: &EffectBinding,
    ) -> PlaybackResult<CompiledEffect> {
        let (key, program) = self.cache.get_or_compile(renderer, &binding.effect)?;
        let mut compiled = CompiledEffect {
            id: binding_id.to_owned(),
            inputs: binding.inputs.clone(),
            key,
            program,
            default_parameters: binding.effect.default_parameters.clone(),
            parameters: binding.parameters.clone(),
            textures: Vec::new(),
        };
        compiled.refresh_textures();
        tracing::debug!(binding = %binding_id, ?key, "created effect binding");
        Ok(compiled)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/resolver.rs"]
mod tests;
