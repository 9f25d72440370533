//! Ambient animal behaviour: a small decision table over three states.
//! Animals only consume terrain height and slope queries.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::constants::*;
use crate::core::content::{AnimalSpecies, ColliderProxy, ContentKind, Placement};
use crate::world::terrain::TerrainGenerator;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimalState {
    Idle,
    Wander,
    Flee,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Animal {
    pub species: AnimalSpecies,
    pub position: Vec3,
    /// Yaw in radians; the animal moves along (sin, cos) of it.
    pub heading: f32,
    pub scale: f32,
    pub state: AnimalState,
    timer: f32,
    id: u32,
    decisions: u32,
}

impl Animal {
    /// `id` must be stable for the placement so timers replay identically
    /// after an unload/reload.
    pub fn from_placement(placement: &Placement, species: AnimalSpecies, id: u32) -> Self {
        let mut animal = Animal {
            species,
            position: placement.position,
            heading: placement.rotation,
            scale: placement.scale,
            state: AnimalState::Idle,
            timer: 0.0,
            id,
            decisions: 0,
        };
        animal.timer = animal.next_duration(1.0, 4.0);
        animal
    }

    fn decision_hash(&self) -> u32 {
        let mut hash = self.id;
        hash = hash.wrapping_add(self.decisions).wrapping_mul(73856093);
        hash = hash.wrapping_add(self.species.salt()).wrapping_mul(19349663);
        hash ^ (hash >> 16)
    }

    fn next_duration(&mut self, min: f32, max: f32) -> f32 {
        self.decisions = self.decisions.wrapping_add(1);
        let t = (self.decision_hash() % 1000) as f32 / 1000.0;
        min + (max - min) * t
    }

    fn speed(&self) -> f32 {
        match self.state {
            AnimalState::Idle => 0.0,
            AnimalState::Wander => ANIMAL_WANDER_SPEED,
            AnimalState::Flee => ANIMAL_FLEE_SPEED,
        }
    }

    /// Advance one fixed step. The player position drives the flee rule.
    pub fn tick(&mut self, dt: f32, player: Vec3, terrain: &TerrainGenerator) {
        let to_player = Vec3::new(player.x - self.position.x, 0.0, player.z - self.position.z);
        let player_distance = to_player.length();

        match self.state {
            _ if player_distance < ANIMAL_FLEE_RADIUS => {
                self.state = AnimalState::Flee;
                if player_distance > f32::EPSILON {
                    self.heading = (-to_player.x).atan2(-to_player.z);
                }
            }
            AnimalState::Flee => {
                if player_distance > ANIMAL_CALM_RADIUS {
                    self.state = AnimalState::Idle;
                    self.timer = self.next_duration(1.0, 4.0);
                }
            }
            AnimalState::Idle => {
                self.timer -= dt;
                if self.timer <= 0.0 {
                    self.state = AnimalState::Wander;
                    self.timer = self.next_duration(2.0, 6.0);
                    let turn = (self.decision_hash() % 628) as f32 / 100.0 - PI;
                    self.heading = (self.heading + turn).rem_euclid(TAU);
                }
            }
            AnimalState::Wander => {
                self.timer -= dt;
                if self.timer <= 0.0 {
                    self.state = AnimalState::Idle;
                    self.timer = self.next_duration(1.0, 4.0);
                }
            }
        }

        let step = self.speed() * dt;
        if step <= 0.0 {
            return;
        }

        let dir = Vec3::new(self.heading.sin(), 0.0, self.heading.cos());
        let next = self.position + dir * step;
        let (nx, nz) = (next.x as f64, next.z as f64);
        if terrain.default_slope_at(nx, nz) > self.species.max_slope() {
            self.heading = (self.heading + PI).rem_euclid(TAU);
            return;
        }
        self.position = Vec3::new(next.x, terrain.height_at(nx, nz) as f32, next.z);
    }

    pub fn collider(&self) -> ColliderProxy {
        let kind = ContentKind::Animal(self.species);
        ColliderProxy {
            kind,
            position: self.position,
            radius: kind.collider_radius().unwrap_or(0.5) * self.scale,
        }
    }
}
