//! Live configuration reads for the hover controller.
//!
//! The controller never caches these values: the modifier gate is evaluated
//! on every hover event and the delay is read every time the debounce timer
//! is armed, so host-side preference changes take effect immediately.

use parking_lot::RwLock;

/// Which physical modifier must be held for a hover to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModifierMode {
    /// Always active, no key required.
    #[default]
    None,
    /// The platform's secondary modifier (ctrl/cmd).
    Secondary,
    Shift,
    Alt,
}

/// Modifier keys held when a hover event was delivered.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModifierState {
    pub secondary: bool,
    pub shift: bool,
    pub alt: bool,
}

impl ModifierMode {
    /// Whether the held modifiers satisfy this mode.
    pub fn is_satisfied(self, held: ModifierState) -> bool {
        match self {
            ModifierMode::None => true,
            ModifierMode::Secondary => held.secondary,
            ModifierMode::Shift => held.shift,
            ModifierMode::Alt => held.alt,
        }
    }
}

/// Configuration source consulted by the controller.
pub trait Settings: Send + Sync {
    /// Modifier gate for hover eligibility.
    fn modifier_mode(&self) -> ModifierMode;

    /// Debounce delay between hover start and preview trigger, in whole
    /// seconds. Zero means trigger immediately.
    fn delay_seconds(&self) -> u32;
}

#[derive(Debug, Default)]
struct MemorySettingsInner {
    modifier_mode: Option<ModifierMode>,
    delay_seconds: Option<u32>,
}

/// In-process settings store with permissive defaults for unset values:
/// no modifier required, no delay.
#[derive(Debug, Default)]
pub struct MemorySettings {
    inner: RwLock<MemorySettingsInner>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_modifier_mode(&self, mode: ModifierMode) {
        self.inner.write().modifier_mode = Some(mode);
    }

    pub fn set_delay_seconds(&self, seconds: u32) {
        self.inner.write().delay_seconds = Some(seconds);
    }

    pub fn clear(&self) {
        *self.inner.write() = MemorySettingsInner::default();
    }
}

impl Settings for MemorySettings {
    fn modifier_mode(&self) -> ModifierMode {
        self.inner.read().modifier_mode.unwrap_or_default()
    }

    fn delay_seconds(&self) -> u32 {
        self.inner.read().delay_seconds.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_permissive() {
        let settings = MemorySettings::new();
        assert_eq!(settings.modifier_mode(), ModifierMode::None);
        assert_eq!(settings.delay_seconds(), 0);
    }

    #[test]
    fn test_clear_restores_defaults() {
        let settings = MemorySettings::new();
        settings.set_modifier_mode(ModifierMode::Shift);
        settings.set_delay_seconds(2);
        settings.clear();
        assert_eq!(settings.modifier_mode(), ModifierMode::None);
        assert_eq!(settings.delay_seconds(), 0);
    }

    #[test]
    fn test_modifier_gate_table() {
        let held = ModifierState {
            secondary: true,
            shift: false,
            alt: false,
        };
        assert!(ModifierMode::None.is_satisfied(held));
        assert!(ModifierMode::Secondary.is_satisfied(held));
        assert!(!ModifierMode::Shift.is_satisfied(held));
        assert!(!ModifierMode::Alt.is_satisfied(held));

        let none_held = ModifierState::default();
        assert!(ModifierMode::None.is_satisfied(none_held));
        assert!(!ModifierMode::Secondary.is_satisfied(none_held));
    }
}
