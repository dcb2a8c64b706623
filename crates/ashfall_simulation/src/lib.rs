//! Ashfall Simulation Core
//!
//! ECS-симуляция персонажа на Bevy 0.16: иерархическая машина состояний
//! (локомоция, воздушная фаза, melee-комбо, реакция на удар) поверх
//! общего блэкборда, с физикой через bevy_rapier3d.
//!
//! Логика тикает в Update, силы и поворот — в FixedUpdate (60Hz) между
//! sync-системами rapier. Анимация абстрагирована за `AnimationDriver`,
//! поэтому ядро работает headless.

use bevy::prelude::*;

// Публичные модули
pub mod animation;
pub mod combat;
pub mod config;
pub mod input;
pub mod logger;
pub mod math;
pub mod physics;
pub mod player;

// Re-export базовых типов для удобства
pub use animation::{AnimationCallback, AnimationDriver, AnimationEvent, AnimationParams, Animator};
pub use combat::{AttackStep, HitWindowClosed, HitWindowOpened, WeaponConfig};
pub use config::PlayerConfig;
pub use input::{AimInput, CameraYaw, PlayerInput};
pub use logger::init_logger;
pub use physics::{GroundLayer, GroundSensor, PhysicsBody};
pub use player::{Player, PlayerHfsm, PlayerPlugin, PlayerStateData, RotationMode};

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для физики (легче считать интервалы)
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .add_plugins(PlayerPlugin);
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins).add_plugins(SimulationPlugin);
    app
}
