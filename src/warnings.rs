use crate::catalog::{MAGMA_MATERIAL_ID, VOID_MATERIAL_ID};
use serde::Deserialize;
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    Kinetic,
    Thermal,
    Void,
}

impl WarningKind {
    pub fn label(self) -> &'static str {
        match self {
            WarningKind::Kinetic => "KINETIC",
            WarningKind::Thermal => "THERMAL",
            WarningKind::Void => "VOID",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationWarning {
    pub id: u64,
    pub kind: WarningKind,
    pub message: String,
    pub raised_at: f64,
    pub expires_at: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WarningConfig {
    #[serde(default = "WarningConfig::default_capacity")]
    pub capacity: usize,
    #[serde(default = "WarningConfig::default_lifetime_secs")]
    pub lifetime_secs: f64,
    #[serde(default = "WarningConfig::default_kinetic_threshold")]
    pub kinetic_threshold: f32,
    #[serde(default = "WarningConfig::default_thermal_threshold")]
    pub thermal_threshold: f32,
}

impl WarningConfig {
    const fn default_capacity() -> usize {
        3
    }

    const fn default_lifetime_secs() -> f64 {
        4.0
    }

    const fn default_kinetic_threshold() -> f32 {
        25.0
    }

    const fn default_thermal_threshold() -> f32 {
        5.0
    }
}

impl Default for WarningConfig {
    fn default() -> Self {
        Self {
            capacity: Self::default_capacity(),
            lifetime_secs: Self::default_lifetime_secs(),
            kinetic_threshold: Self::default_kinetic_threshold(),
            thermal_threshold: Self::default_thermal_threshold(),
        }
    }
}

/// Maps a contact on an object with `material_id` to the warning it raises, if any.
pub fn classify_stress(material_id: &str, force: f32, config: &WarningConfig) -> Option<(WarningKind, String)> {
    match material_id {
        VOID_MATERIAL_ID => {
            Some((WarningKind::Void, "Singularity interaction detected in local space.".to_string()))
        }
        MAGMA_MATERIAL_ID if force > config.thermal_threshold => {
            Some((WarningKind::Thermal, "Thermal transfer overflow during collision.".to_string()))
        }
        _ if force > config.kinetic_threshold => {
            Some((WarningKind::Kinetic, format!("Extreme Impact: {force:.2}N detected.")))
        }
        _ => None,
    }
}

/// Most recent warnings, oldest first. Each entry expires on its own deadline.
#[derive(Debug)]
pub struct WarningQueue {
    entries: VecDeque<SimulationWarning>,
    capacity: usize,
    lifetime: f64,
    next_id: u64,
}

impl WarningQueue {
    pub fn new(capacity: usize, lifetime_secs: f64) -> Self {
        let capacity = capacity.max(1);
        Self { entries: VecDeque::with_capacity(capacity), capacity, lifetime: lifetime_secs.max(0.0), next_id: 0 }
    }

    pub fn from_config(config: &WarningConfig) -> Self {
        Self::new(config.capacity, config.lifetime_secs)
    }

    pub fn push(&mut self, kind: WarningKind, message: impl Into<String>, now: f64) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(SimulationWarning {
            id,
            kind,
            message: message.into(),
            raised_at: now,
            expires_at: now + self.lifetime,
        });
        id
    }

    /// Drops every entry whose deadline has passed. Returns how many were removed.
    pub fn expire(&mut self, now: f64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|warning| warning.expires_at > now);
        before - self.entries.len()
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|warning| warning.id != id);
        before != self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimulationWarning> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn lifetime(&self) -> f64 {
        self.lifetime
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_keeps_most_recent_entries() {
        let mut queue = WarningQueue::new(3, 4.0);
        for i in 0..5 {
            queue.push(WarningKind::Kinetic, format!("impact {i}"), i as f64 * 0.1);
        }
        assert_eq!(queue.len(), 3);
        let messages: Vec<&str> = queue.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(messages, ["impact 2", "impact 3", "impact 4"]);
    }

    #[test]
    fn entries_expire_independently() {
        let mut queue = WarningQueue::new(3, 4.0);
        queue.push(WarningKind::Kinetic, "first", 0.0);
        queue.push(WarningKind::Thermal, "second", 2.0);
        assert_eq!(queue.expire(3.9), 0);
        assert_eq!(queue.expire(4.0), 1);
        assert_eq!(queue.iter().next().map(|w| w.kind), Some(WarningKind::Thermal));
        assert_eq!(queue.expire(6.0), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn stress_rules_follow_material() {
        let config = WarningConfig::default();
        assert_eq!(classify_stress("mat_default", 70.0, &config).map(|(k, _)| k), Some(WarningKind::Kinetic));
        assert_eq!(classify_stress("mat_default", 10.0, &config), None);
        assert_eq!(classify_stress(MAGMA_MATERIAL_ID, 10.0, &config).map(|(k, _)| k), Some(WarningKind::Thermal));
        assert_eq!(classify_stress(VOID_MATERIAL_ID, 0.0, &config).map(|(k, _)| k), Some(WarningKind::Void));
        let (_, message) = classify_stress("mat_gold", 70.0, &config).expect("kinetic warning");
        assert_eq!(message, "Extreme Impact: 70.00N detected.");
    }
}
