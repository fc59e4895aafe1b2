//! Gravity source registry
//!
//! Открытый набор источников гравитации (directional поля, point wells),
//! суммируемых обычной итерацией. Registry — Resource с явным lifecycle
//! (вставляется MovementPlugin), add/remove через handles.

use bevy::prelude::*;

use crate::logger;

/// Handle зарегистрированного источника (weak: источник может быть удалён)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GravitySourceHandle(u64);

/// Типизированный дескриптор источника — никакого virtual dispatch,
/// вся полиморфность в enum
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GravitySource {
    /// Однородное поле (планетарная гравитация)
    Directional { acceleration: Vec3 },
    /// Point well: тянет к центру, линейный falloff до radius
    Point {
        position: Vec3,
        strength: f32,
        radius: f32,
    },
}

impl GravitySource {
    /// Вклад источника в ускорение в точке `position`
    pub fn acceleration_at(&self, position: Vec3) -> Vec3 {
        match *self {
            GravitySource::Directional { acceleration } => acceleration,
            GravitySource::Point {
                position: center,
                strength,
                radius,
            } => {
                let to_center = center - position;
                let distance = to_center.length();
                if distance < 1e-4 || distance >= radius {
                    return Vec3::ZERO;
                }
                let falloff = 1.0 - distance / radius;
                to_center / distance * strength * falloff
            }
        }
    }
}

/// Суммарное гравитационное поле мира
#[derive(Resource, Debug, Clone)]
pub struct GravityField {
    sources: Vec<(GravitySourceHandle, GravitySource)>,
    next_handle: u64,
    /// Engine-default гравитация когда нет ни одного источника
    pub default_gravity: Vec3,
}

impl Default for GravityField {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            next_handle: 0,
            default_gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }
}

impl GravityField {
    pub fn add(&mut self, source: GravitySource) -> GravitySourceHandle {
        let handle = GravitySourceHandle(self.next_handle);
        self.next_handle += 1;
        self.sources.push((handle, source));
        handle
    }

    /// Удалить источник. Unknown handle — диагностика в лог, не паника.
    pub fn remove(&mut self, handle: GravitySourceHandle) -> bool {
        let before = self.sources.len();
        self.sources.retain(|(h, _)| *h != handle);
        if self.sources.len() == before {
            logger::log_error(&format!(
                "GravityField: removal of unknown gravity source {:?}",
                handle
            ));
            return false;
        }
        true
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Суммарное ускорение в точке
    pub fn gravity_at(&self, position: Vec3) -> Vec3 {
        if self.sources.is_empty() {
            return self.default_gravity;
        }
        self.sources
            .iter()
            .map(|(_, source)| source.acceleration_at(position))
            .sum()
    }

    /// Up axis (против гравитации); вырожденный случай → мировой up
    pub fn up_axis_at(&self, position: Vec3) -> Vec3 {
        let g = self.gravity_at(position);
        if g.length_squared() < 1e-6 {
            return Vec3::Y;
        }
        -g.normalize()
    }

    /// Направление падения; вырожденный случай → мировой down
    pub fn direction_at(&self, position: Vec3) -> Vec3 {
        let g = self.gravity_at(position);
        if g.length_squared() < 1e-6 {
            return Vec3::NEG_Y;
        }
        g.normalize()
    }
}
