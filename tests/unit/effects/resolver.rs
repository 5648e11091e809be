use super::*;
use crate::effects::params::ParamValue;
use crate::effects::presets::EffectPreset;
use crate::foundation::core::Resolution;
use crate::render::headless::HeadlessRenderer;

fn binding(inputs: &[&str], effect: EffectDef) -> EffectBinding {
    EffectBinding {
        inputs: inputs.iter().map(|s| (*s).to_owned()).collect(),
        effect,
        parameters: ParamMap::new(),
    }
}

fn setup() -> (HeadlessRenderer, EffectResolver) {
    let mut r = HeadlessRenderer::new(Resolution::new(16, 9));
    let resolver = EffectResolver::new(&mut r).unwrap();
    (r, resolver)
}

#[test]
fn unbound_segment_gets_default() {
    let (_r, resolver) = setup();
    let e = resolver.resolve("anything");
    assert_eq!(e.id, DEFAULT_EFFECT_ID);
    assert_eq!(e.key, EffectKey::of(&EffectDef::passthrough()));
}

#[test]
fn first_binding_in_order_wins() {
    let (mut r, mut resolver) = setup();
    let bindings: OrderedMap<EffectBinding> = [
        ("mono", binding(&["a"], EffectPreset::Monochrome.definition())),
        ("sepia", binding(&["a", "b"], EffectPreset::Sepia.definition())),
    ]
    .into_iter()
    .collect();
    resolver.sync(&mut r, &bindings).unwrap();
    assert_eq!(resolver.resolve("a").id, "mono");
    assert_eq!(resolver.resolve("b").id, "sepia");
    assert_eq!(resolver.resolve("c").id, DEFAULT_EFFECT_ID);
}

#[test]
fn shared_identity_compiles_once() {
    let (mut r, mut resolver) = setup();
    let log = r.log();
    let bindings: OrderedMap<EffectBinding> = [
        ("f1", binding(&["a"], EffectPreset::FadeInOut.definition())),
        ("f2", binding(&["b"], EffectPreset::FadeOut2Sec.definition())),
    ]
    .into_iter()
    .collect();
    resolver.sync(&mut r, &bindings).unwrap();
    // Default plus one shared fade program.
    assert_eq!(log.borrow().compiled, 2);
    assert_eq!(resolver.program_count(), 2);
    assert_eq!(
        resolver.get("f1").unwrap().program,
        resolver.get("f2").unwrap().program
    );
}

#[test]
fn update_changes_params_without_recompiling() {
    let (mut r, mut resolver) = setup();
    let log = r.log();
    let mut b = binding(&["a"], EffectPreset::FadeInOut.definition());
    resolver.create(&mut r, "fade", &b).unwrap();
    let before = log.borrow().compiled;

    b.parameters.insert("inTime".into(), 0.25.into());
    b.inputs.push("b".into());
    resolver.update(&mut r, "fade", &b).unwrap();
    assert_eq!(log.borrow().compiled, before);
    let e = resolver.get("fade").unwrap();
    assert_eq!(e.parameters["inTime"], ParamValue::Number(0.25));
    assert_eq!(resolver.resolve("b").id, "fade");

    b.effect = EffectPreset::Sepia.definition();
    resolver.update(&mut r, "fade", &b).unwrap();
    assert_eq!(log.borrow().compiled, before + 1);
    assert_eq!(resolver.get("fade").unwrap().key, EffectKey::of(&b.effect));
}

#[test]
fn sync_drops_stale_and_follows_new_order() {
    let (mut r, mut resolver) = setup();
    let first: OrderedMap<EffectBinding> = [
        ("x", binding(&["a"], EffectPreset::Sepia.definition())),
        ("y", binding(&["a"], EffectPreset::Monochrome.definition())),
    ]
    .into_iter()
    .collect();
    resolver.sync(&mut r, &first).unwrap();
    assert_eq!(resolver.resolve("a").id, "x");

    let second: OrderedMap<EffectBinding> = [
        ("y", binding(&["a"], EffectPreset::Monochrome.definition())),
        ("z", binding(&["b"], EffectPreset::BitCrunch.definition())),
    ]
    .into_iter()
    .collect();
    resolver.sync(&mut r, &second).unwrap();
    assert_eq!(resolver.binding_ids().collect::<Vec<_>>(), ["y", "z"]);
    assert_eq!(resolver.resolve("a").id, "y");
    assert!(resolver.get("x").is_none());
    assert_eq!(resolver.default_effect().id, DEFAULT_EFFECT_ID);
}

#[test]
fn merge_order_is_base_then_defaults_then_overrides() {
    let (mut r, mut resolver) = setup();
    let mut b = binding(&["a"], EffectPreset::FadeInOut.definition());
    b.parameters.insert("outTime".into(), 3.0.into());
    b.parameters
        .insert("lut".into(), TextureRef::new("lut.png").into());
    resolver.create(&mut r, "fade", &b).unwrap();

    let mut base = ParamMap::new();
    base.insert("progress".into(), 0.5.into());
    base.insert("inTime".into(), 9.0.into());
    let e = resolver.resolve("a");
    let merged = e.merged_params(&base);
    assert_eq!(merged["progress"].as_number(), Some(0.5));
    assert_eq!(merged["inTime"].as_number(), Some(1.0));
    assert_eq!(merged["outTime"].as_number(), Some(3.0));
    assert_eq!(e.textures, [TextureRef::new("lut.png")]);
}

#[test]
fn shader_failure_surfaces_synchronously() {
    let (mut r, mut resolver) = setup();
    let bad = EffectDef {
        fragment_shader: "#error broken".into(),
        ..EffectDef::passthrough()
    };
    let err = resolver
        .create(&mut r, "bad", &binding(&["a"], bad))
        .unwrap_err();
    assert!(matches!(err, crate::PlaybackError::ShaderCompile { .. }));
    assert!(resolver.get("bad").is_none());
}
