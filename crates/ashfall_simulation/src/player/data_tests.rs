//! Тесты блэкборда и буфера атаки.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::data::{AttackBuffer, PlayerStateData};
    use crate::combat::WeaponConfig;

    #[test]
    fn buffer_holds_signal_inside_window() {
        let mut buffer = AttackBuffer::new(0.5);
        buffer.signal(10.0);

        assert!(buffer.wants_attack(10.0));
        assert!(buffer.wants_attack(10.49));
        assert!(buffer.wants_attack(10.5));
        assert!(!buffer.wants_attack(10.51));
    }

    #[test]
    fn buffer_consume_expires_signal() {
        let mut buffer = AttackBuffer::new(0.5);
        buffer.signal(3.0);
        buffer.consume();

        assert!(!buffer.wants_attack(3.0));
        assert!(!buffer.wants_attack(3.1));
    }

    #[test]
    fn fresh_buffer_wants_nothing() {
        let buffer = AttackBuffer::new(0.5);
        assert!(!buffer.wants_attack(0.0));
        assert!(!buffer.wants_attack(100.0));
    }

    #[test]
    fn resignal_after_consume_works() {
        let mut buffer = AttackBuffer::new(0.5);
        buffer.signal(1.0);
        buffer.consume();
        buffer.signal(2.0);

        assert!(buffer.wants_attack(2.3));
    }

    #[test]
    fn final_modifier_is_product() {
        let mut data = PlayerStateData::default();
        data.movement_speed_modifier = 0.8;
        data.action_movement_multiplier = 0.5;

        assert!((data.final_move_speed_modifier() - 0.4).abs() < 1e-6);

        // Brake at zero roots the character regardless of throttle.
        data.action_movement_multiplier = 0.0;
        assert_eq!(data.final_move_speed_modifier(), 0.0);
    }

    #[test]
    fn unarmed_has_no_attack_step() {
        let data = PlayerStateData::default();
        assert!(data.current_attack_step().is_none());
        assert!(!data.attack_serviceable(0.0));
    }

    #[test]
    fn armed_intent_is_serviceable() {
        let mut data = PlayerStateData::default();
        data.weapon = Some(Arc::new(WeaponConfig::training_sword()));
        data.attack_buffer.signal(5.0);

        assert!(data.attack_serviceable(5.2));
        assert!(!data.attack_serviceable(6.0));
    }

    #[test]
    fn combo_step_clamps_past_table_end() {
        let mut data = PlayerStateData::default();
        let weapon = Arc::new(WeaponConfig::training_sword());
        let last = weapon.step(weapon.combo_len() - 1).cloned().unwrap();
        data.weapon = Some(weapon);
        data.combo_index = 99;

        let step = data.current_attack_step().unwrap();
        assert_eq!(step.animation, last.animation);
    }

    #[test]
    fn reset_combat_flags_leaves_buffer_alone() {
        let mut data = PlayerStateData::default();
        data.attack_windup_finished = true;
        data.attack_swing_finished = true;
        data.attack_combo_window_finished = true;
        data.attack_buffer.signal(1.0);

        data.reset_combat_flags();

        assert!(!data.attack_windup_finished);
        assert!(!data.attack_swing_finished);
        assert!(!data.attack_combo_window_finished);
        assert!(data.attack_buffer.wants_attack(1.2));
    }
}
