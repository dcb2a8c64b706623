//! Physics-body abstraction and rapier plumbing.
//!
//! The state machine never touches rapier directly: it reads and writes a
//! `PhysicsBody` component, and sync systems shuttle that state into rapier
//! each fixed step. Collision checks stay on the rapier side; we only
//! integrate intent (forces, rotation commands) here.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{CollisionEvent, Velocity};

use crate::logger;

/// Earth gravity (m/s²).
pub const GRAVITY: f32 = -9.81;

/// How a force is applied to the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceMode {
    /// Instant velocity delta, ignoring mass.
    VelocityChange,
    /// Instant momentum delta, scaled by 1/mass.
    Impulse,
}

/// Мост между state machine и rigid body.
///
/// Authoritative velocity живёт здесь (как в kinematic контроллере);
/// rapier получает её через sync системы и возвращает результат solver'а
/// после шага. Rotation задаётся командой `move_rotation`, не прямой
/// записью в Transform — коллизии остаются консистентными.
#[derive(Component, Debug, Clone)]
pub struct PhysicsBody {
    pub velocity: Vec3,
    pub rotation: Quat,
    pub mass: f32,
    rotation_dirty: bool,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            mass: 1.0,
            rotation_dirty: false,
        }
    }
}

impl PhysicsBody {
    pub fn add_force(&mut self, force: Vec3, mode: ForceMode) {
        match mode {
            ForceMode::VelocityChange => self.velocity += force,
            ForceMode::Impulse => self.velocity += force / self.mass.max(f32::EPSILON),
        }
    }

    /// Queue a rotation command for the physics step.
    pub fn move_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.rotation_dirty = true;
    }

    /// Horizontal part of the current velocity (Y zeroed).
    pub fn horizontal_velocity(&self) -> Vec3 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z)
    }

    pub fn reset_velocity(&mut self) {
        self.velocity = Vec3::ZERO;
    }

    pub fn reset_vertical_velocity(&mut self) {
        self.velocity.y = 0.0;
    }

    /// Current yaw in degrees, [0, 360).
    pub fn yaw_degrees(&self) -> f32 {
        let forward = self.rotation * Vec3::Z;
        crate::math::wrap_angle(forward.x.atan2(forward.z).to_degrees())
    }

    pub(crate) fn take_rotation_dirty(&mut self) -> bool {
        std::mem::take(&mut self.rotation_dirty)
    }
}

/// Marker: collider belongs to the ground layer.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct GroundLayer;

/// Счётчик контактов с ground layer (аналог trigger volume).
///
/// grounded == true пока хотя бы один ground коллайдер пересекается
/// с сенсором. Events приходят от rapier (Started/Stopped).
#[derive(Component, Debug, Clone, Default)]
pub struct GroundSensor {
    overlaps: Vec<Entity>,
}

impl GroundSensor {
    pub fn is_grounded(&self) -> bool {
        !self.overlaps.is_empty()
    }

    pub fn begin_overlap(&mut self, ground: Entity) {
        if !self.overlaps.contains(&ground) {
            self.overlaps.push(ground);
        }
    }

    pub fn end_overlap(&mut self, ground: Entity) {
        self.overlaps.retain(|e| *e != ground);
    }

    /// Force the sensor state directly. Headless tests use this instead of
    /// synthesizing collision events.
    pub fn set_grounded_for_tests(&mut self, grounded: bool, ground: Entity) {
        if grounded {
            self.begin_overlap(ground);
        } else {
            self.end_overlap(ground);
        }
    }
}

/// System: fold rapier collision events into ground sensors.
pub fn update_ground_sensors(
    mut collision_events: EventReader<CollisionEvent>,
    mut sensors: Query<&mut GroundSensor>,
    grounds: Query<(), With<GroundLayer>>,
) {
    for event in collision_events.read() {
        let (a, b, started) = match event {
            CollisionEvent::Started(a, b, _) => (*a, *b, true),
            CollisionEvent::Stopped(a, b, _) => (*a, *b, false),
        };

        // Either side of the pair may be the sensor.
        for (sensor_entity, other) in [(a, b), (b, a)] {
            if !grounds.contains(other) {
                continue;
            }
            let Ok(mut sensor) = sensors.get_mut(sensor_entity) else {
                continue;
            };
            if started {
                sensor.begin_overlap(other);
                logger::log(&format!(
                    "ground sensor: contact begin ({:?}, total {})",
                    sensor_entity,
                    sensor.overlaps.len()
                ));
            } else {
                sensor.end_overlap(other);
            }
        }
    }
}

/// System: push authoritative body state into rapier.
///
/// Velocity goes to `Velocity.linvel` every step; rotation goes to the
/// kinematic transform only when a command was issued this step.
pub fn sync_bodies_to_rapier(
    mut query: Query<(&mut PhysicsBody, &mut Velocity, &mut Transform)>,
) {
    for (mut body, mut rapier_velocity, mut transform) in query.iter_mut() {
        rapier_velocity.linvel = body.velocity;
        if body.take_rotation_dirty() {
            transform.rotation = body.rotation;
        }
    }
}

/// System: gravity on airborne bodies. Velocity integration стоит на нашей
/// стороне, rapier получает готовую скорость.
pub fn apply_gravity(
    time: Res<Time>,
    mut query: Query<(&GroundSensor, &mut PhysicsBody)>,
) {
    let delta = time.delta_secs();
    for (sensor, mut body) in query.iter_mut() {
        if sensor.is_grounded() {
            if body.velocity.y < 0.0 {
                body.velocity.y = 0.0;
            }
        } else {
            body.velocity.y += GRAVITY * delta;
        }
    }
}

/// System: velocity → Transform для headless режима (rapier только для
/// коллизий).
pub fn integrate_velocity_to_transform(
    time: Res<Time>,
    mut query: Query<(&PhysicsBody, &mut Transform)>,
) {
    let delta = time.delta_secs();
    for (body, mut transform) in query.iter_mut() {
        transform.translation += body.velocity * delta;
    }
}
