//! Tests for the melee combo leaves and the hit reaction.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use bevy::prelude::*;

    use super::super::combat::{AttackIdle, Hit, Recovery, Swing, Windup};
    use crate::animation::AnimationEvent;
    use crate::combat::{CombatNotice, WeaponConfig};
    use crate::player::data::RotationMode;
    use crate::player::machine::StateNode;
    use crate::player::test_util::TestRig;

    fn armed_rig() -> TestRig {
        let mut rig = TestRig::new();
        rig.data.weapon = Some(Arc::new(WeaponConfig::training_sword()));
        rig
    }

    #[test]
    fn windup_consumes_intent_and_applies_step_throttles() {
        let mut rig = armed_rig();
        rig.data.attack_buffer.signal(1.0);
        rig.now = 1.1;
        let mut windup = Windup;

        {
            let mut ctx = rig.ctx();
            windup.on_enter(&mut ctx);
        }

        assert!(!rig.data.attack_buffer.wants_attack(1.1));
        assert!(rig.data.is_attacking_action);
        assert_eq!(rig.data.rotation_mode, RotationMode::OrientToCursor);
        assert_eq!(rig.data.action_movement_multiplier, 0.0);
        assert!((rig.data.rotation_speed_multiplier - 0.3).abs() < 1e-6);
        assert_eq!(rig.animator.last_cross_fade(), Some("Attack_0"));
    }

    #[test]
    fn unarmed_windup_stalls_without_panicking() {
        let mut rig = TestRig::new();
        let mut windup = Windup;

        {
            let mut ctx = rig.ctx();
            windup.on_enter(&mut ctx);
        }

        assert!(rig.animator.cross_fades.is_empty());
    }

    #[test]
    fn swing_opens_and_closes_hit_window() {
        let mut rig = armed_rig();
        let mut swing = Swing;

        {
            let mut ctx = rig.ctx();
            swing.on_enter(&mut ctx);
        }

        assert_eq!(
            rig.notices,
            vec![CombatNotice::HitWindowOpened {
                combo_index: 0,
                damage_multiplier: 1.0,
            }]
        );

        {
            let mut ctx = rig.ctx();
            swing.on_exit(&mut ctx);
        }

        assert_eq!(rig.notices.last(), Some(&CombatNotice::HitWindowClosed));
    }

    #[test]
    fn swing_lunges_along_facing() {
        let mut rig = armed_rig();
        rig.body.move_rotation(Quat::from_rotation_y(90f32.to_radians()));
        let mut swing = Swing;

        {
            let mut ctx = rig.ctx();
            swing.on_enter(&mut ctx);
        }

        // step 0 impulse is 1.5 forward; facing +X after the turn
        assert!((rig.body.velocity.x - 1.5).abs() < 1e-4);
        assert!(rig.body.velocity.z.abs() < 1e-4);
        assert_eq!(rig.data.action_movement_multiplier, 0.0);
        assert_eq!(rig.data.rotation_speed_multiplier, 0.0);
    }

    #[test]
    fn swing_lunge_survives_physics_ticks() {
        let mut rig = armed_rig();
        rig.data.movement_input = Vec2::new(0.0, 1.0);
        rig.data.movement_speed_modifier = 1.0;
        let mut swing = Swing;

        {
            let mut ctx = rig.ctx();
            swing.on_enter(&mut ctx);
        }
        let lunge = rig.body.velocity;
        assert!(lunge.z > 0.0);

        // Swing roots the character (action multiplier 0); the lunge
        // impulse must not be steered away on the next physics step.
        rig.physics_tick(&mut swing);
        rig.physics_tick(&mut swing);

        assert_eq!(rig.body.velocity, lunge);
    }

    #[test]
    fn recovery_exit_advances_combo() {
        let mut rig = armed_rig();
        let mut recovery = Recovery;

        let mut ctx = rig.ctx();
        recovery.on_enter(&mut ctx);
        recovery.on_exit(&mut ctx);

        assert_eq!(ctx.data.combo_index, 1);
    }

    #[test]
    fn attack_idle_restores_mobility() {
        let mut rig = armed_rig();
        rig.data.action_movement_multiplier = 0.0;
        rig.data.rotation_speed_multiplier = 0.0;
        rig.data.rotation_mode = RotationMode::OrientToCursor;
        let mut idle = AttackIdle;

        let mut ctx = rig.ctx();
        idle.on_enter(&mut ctx);

        assert_eq!(ctx.data.action_movement_multiplier, 1.0);
        assert_eq!(ctx.data.rotation_speed_multiplier, 1.0);
        assert_eq!(ctx.data.rotation_mode, RotationMode::OrientToMovement);
    }

    #[test]
    fn hit_roots_until_clip_exits() {
        let mut rig = TestRig::new();
        rig.data.is_under_attack = true;
        let mut hit = Hit;

        {
            let mut ctx = rig.ctx();
            hit.on_enter(&mut ctx);
        }

        assert!(!rig.data.is_under_attack);
        assert!(!rig.data.has_recovered_from_hit);
        assert_eq!(rig.data.action_movement_multiplier, 0.0);
        assert_eq!(rig.animator.last_cross_fade(), Some("Hit_Light"));

        let mut ctx = rig.ctx();
        hit.handle_animation_event(&mut ctx, AnimationEvent::Exit);
        assert!(ctx.data.has_recovered_from_hit);

        hit.on_exit(&mut ctx);
        assert_eq!(ctx.data.action_movement_multiplier, 1.0);
    }
}
