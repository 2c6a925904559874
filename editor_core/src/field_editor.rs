//! Range-checked edits of a single template field.

use campaign_runtime::{
    clamp_saturating, CatalogLimits, CharacterTemplate, ClampPolicy, Field, FieldSelector, Row,
};

/// Step the field addressed by `selector` by `delta` steps of its own size.
///
/// Returns `false` without touching the template when the selector does not
/// address a field.
pub fn apply_change(
    template: &mut CharacterTemplate,
    selector: FieldSelector,
    delta: i32,
    limits: &CatalogLimits,
) -> bool {
    let Some(field) = selector.field() else {
        return false;
    };
    step_field(template, field, delta, limits);
    true
}

pub fn step_field(
    template: &mut CharacterTemplate,
    field: Field,
    delta: i32,
    limits: &CatalogLimits,
) {
    let spec = field.spec(limits);
    match (spec.policy, field) {
        (ClampPolicy::Toggle, Field::Trait(flag)) => {
            if delta != 0 {
                template.flags.toggle(flag);
            }
        }
        _ => {
            let next = field
                .read(template)
                .saturating_add(delta.saturating_mul(spec.step));
            field.write(template, spec.clamp(next));
        }
    }
}

/// Set a field to an absolute value. Out-of-range values saturate at the
/// nearest bound regardless of the field's step policy.
pub fn apply_value(
    template: &mut CharacterTemplate,
    field: Field,
    value: i32,
    limits: &CatalogLimits,
) {
    let spec = field.spec(limits);
    let value = match spec.policy {
        ClampPolicy::Toggle => i32::from(value != 0),
        ClampPolicy::Saturate | ClampPolicy::Wrap => clamp_saturating(value, spec.min, spec.max),
    };
    field.write(template, value);
}

/// Pull every numeric field of a loaded template into range.
///
/// Returns `true` when anything had to be adjusted.
pub fn sanitize(template: &mut CharacterTemplate, limits: &CatalogLimits) -> bool {
    let mut adjusted = false;
    for field in Row::ALL.iter().flat_map(|row| row.fields()) {
        let spec = field.spec(limits);
        if spec.policy == ClampPolicy::Toggle {
            continue;
        }
        let value = field.read(template);
        if !spec.contains(value) {
            field.write(template, clamp_saturating(value, spec.min, spec.max));
            adjusted = true;
        }
    }
    adjusted
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_runtime::{CharacterFlags, ShadeSlot};
    use rand::{rngs::SmallRng, Rng, SeedableRng};

    fn limits() -> CatalogLimits {
        CatalogLimits::default()
    }

    #[test]
    fn speed_saturates_at_top() {
        let mut template = CharacterTemplate::default_enemy();
        template.speed = 480;
        assert!(apply_change(
            &mut template,
            FieldSelector::new(Row::Attributes, 0),
            1,
            &limits()
        ));
        assert_eq!(template.speed, 512);
        apply_change(&mut template, FieldSelector::new(Row::Attributes, 0), 1, &limits());
        assert_eq!(template.speed, 512);
    }

    #[test]
    fn face_wraps_past_last_entry() {
        let mut template = CharacterTemplate::default_enemy();
        template.face = 10;
        apply_change(&mut template, FieldSelector::new(Row::Appearance, 0), 1, &limits());
        assert_eq!(template.face, 0);
        apply_change(&mut template, FieldSelector::new(Row::Appearance, 0), -1, &limits());
        assert_eq!(template.face, 10);
    }

    #[test]
    fn shades_and_gun_wrap_both_ways() {
        let mut template = CharacterTemplate::default_enemy();
        template.shades.legs = 0;
        step_field(&mut template, Field::Shade(ShadeSlot::Legs), -1, &limits());
        assert_eq!(template.shades.legs, 13);

        template.gun = 15;
        apply_change(&mut template, FieldSelector::new(Row::Weapon, 0), 1, &limits());
        assert_eq!(template.gun, 0);
    }

    #[test]
    fn health_and_chances_step_by_their_own_size() {
        let mut template = CharacterTemplate::default_enemy();
        step_field(&mut template, Field::Health, 2, &limits());
        assert_eq!(template.health, 60);
        step_field(&mut template, Field::ShootChance, -1, &limits());
        assert_eq!(template.probability_to_shoot, 0);
        step_field(&mut template, Field::ActionDelay, -20, &limits());
        assert_eq!(template.action_delay, 0);
    }

    #[test]
    fn trait_change_toggles_regardless_of_sign() {
        let mut template = CharacterTemplate::default_enemy();
        let asbestos = FieldSelector::new(Row::FlagsA, 0);
        apply_change(&mut template, asbestos, -1, &limits());
        assert!(template.has_flag(CharacterFlags::ASBESTOS));
        apply_change(&mut template, asbestos, 1, &limits());
        assert!(!template.has_flag(CharacterFlags::ASBESTOS));
        assert!(template.has_flag(CharacterFlags::IMMUNITY));
    }

    #[test]
    fn selector_outside_row_is_a_no_op() {
        let mut template = CharacterTemplate::default_enemy();
        let before = template;
        assert!(!apply_change(
            &mut template,
            FieldSelector::new(Row::Weapon, 3),
            1,
            &limits()
        ));
        assert_eq!(template, before);
    }

    #[test]
    fn absolute_values_saturate() {
        let mut template = CharacterTemplate::default_enemy();
        apply_value(&mut template, Field::Speed, 9000, &limits());
        assert_eq!(template.speed, 512);
        apply_value(&mut template, Field::Face, -4, &limits());
        assert_eq!(template.face, 0);
        apply_value(&mut template, Field::Trait(CharacterFlags::SLEEPING), 7, &limits());
        assert!(template.has_flag(CharacterFlags::SLEEPING));
        apply_value(&mut template, Field::Trait(CharacterFlags::IMMUNITY), 0, &limits());
        assert!(!template.has_flag(CharacterFlags::IMMUNITY));
    }

    #[test]
    fn sanitize_clamps_loaded_values() {
        let mut template = CharacterTemplate::zeroed();
        template.health = 9999;
        template.face = 40;
        assert!(sanitize(&mut template, &limits()));
        assert_eq!(template.speed, 128);
        assert_eq!(template.health, 500);
        assert_eq!(template.face, 10);

        let mut stock = CharacterTemplate::default_enemy();
        assert!(!sanitize(&mut stock, &limits()));
    }

    #[test]
    fn random_edits_never_leave_range() {
        let limits = limits();
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let mut template = CharacterTemplate::default_enemy();
        for _ in 0..2_000 {
            let row = Row::ALL[rng.gen_range(0..Row::ALL.len())];
            let column = rng.gen_range(0..row.column_count());
            let delta = rng.gen_range(-6..=6);
            apply_change(&mut template, FieldSelector::new(row, column), delta, &limits);

            for field in Row::ALL.iter().flat_map(|row| row.fields()) {
                let spec = field.spec(&limits);
                assert!(
                    spec.contains(field.read(&template)),
                    "{field:?} left range after delta {delta}"
                );
            }
        }
    }
}
