//! Tests for weapon combo tables.

#[cfg(test)]
mod tests {
    use super::super::WeaponConfig;

    #[test]
    fn test_step_lookup_in_range() {
        let weapon = WeaponConfig::training_sword();
        assert_eq!(weapon.combo_len(), 3);
        assert_eq!(weapon.step(0).unwrap().animation, "Attack_0");
        assert_eq!(weapon.step(2).unwrap().animation, "Attack_2");
    }

    #[test]
    fn test_step_lookup_clamps_to_last() {
        let weapon = WeaponConfig::training_sword();
        // Index past the end clamps instead of panicking or wrapping.
        assert_eq!(weapon.step(3).unwrap().animation, "Attack_2");
        assert_eq!(weapon.step(99).unwrap().animation, "Attack_2");
    }

    #[test]
    fn test_empty_table_has_no_steps() {
        let weapon = WeaponConfig::default();
        assert!(weapon.step(0).is_none());
        assert_eq!(weapon.combo_len(), 0);
    }

    #[test]
    fn test_training_sword_windows_ordered() {
        let weapon = WeaponConfig::training_sword();
        for step in &weapon.combo_steps {
            assert!(step.damage_active_time < step.damage_end_time);
            assert!(step.damage_end_time < step.recovery_time);
        }
    }
}
