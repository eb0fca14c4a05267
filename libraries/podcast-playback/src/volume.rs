//! Volume control with mute
//!
//! Volume is a linear level in 0.0-1.0 handed straight to the media resource.
//! Muting keeps the stored level so unmuting restores it.

/// Volume controller
#[derive(Debug, Clone)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f32,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller
    ///
    /// # Arguments
    /// * `level` - Initial volume, clamped into 0.0-1.0
    pub fn new(level: f32) -> Self {
        Self {
            level: Self::sanitize(level).unwrap_or(1.0),
            muted: false,
        }
    }

    /// Set volume level (0.0-1.0)
    ///
    /// Out-of-range values are clamped. Non-finite values are ignored.
    /// Returns the stored level.
    pub fn set_level(&mut self, level: f32) -> f32 {
        if let Some(level) = Self::sanitize(level) {
            self.level = level;
        }
        self.level
    }

    /// Get current volume level (0.0-1.0)
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Mute audio (preserves volume level)
    pub fn mute(&mut self) {
        self.muted = true;
    }

    /// Unmute audio (restores previous volume)
    pub fn unmute(&mut self) {
        self.muted = false;
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Gain the resource should actually output
    ///
    /// Returns 0.0 if muted, otherwise the stored level
    pub fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }

    fn sanitize(level: f32) -> Option<f32> {
        level.is_finite().then(|| level.clamp(0.0, 1.0))
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_volume() {
        let vol = Volume::new(0.8);
        assert_eq!(vol.level(), 0.8);
        assert!(!vol.is_muted());
    }

    #[test]
    fn set_volume_level() {
        let mut vol = Volume::new(0.5);
        assert_eq!(vol.level(), 0.5);

        vol.set_level(0.75);
        assert_eq!(vol.level(), 0.75);

        // Clamp to range
        vol.set_level(1.5);
        assert_eq!(vol.level(), 1.0);
        vol.set_level(-0.2);
        assert_eq!(vol.level(), 0.0);
    }

    #[test]
    fn non_finite_levels_are_ignored() {
        let mut vol = Volume::new(0.4);
        assert_eq!(vol.set_level(f32::NAN), 0.4);
        assert_eq!(vol.set_level(f32::INFINITY), 0.4);

        assert_eq!(Volume::new(f32::NAN).level(), 1.0);
    }

    #[test]
    fn mute_unmute() {
        let mut vol = Volume::new(0.8);
        assert!(!vol.is_muted());

        vol.mute();
        assert!(vol.is_muted());
        assert_eq!(vol.level(), 0.8); // Level preserved

        vol.unmute();
        assert!(!vol.is_muted());
        assert_eq!(vol.level(), 0.8);
    }

    #[test]
    fn toggle_mute() {
        let mut vol = Volume::new(0.8);
        vol.toggle_mute();
        assert!(vol.is_muted());

        vol.toggle_mute();
        assert!(!vol.is_muted());
    }

    #[test]
    fn muted_gain_is_zero() {
        let mut vol = Volume::new(0.8);
        assert_eq!(vol.gain(), 0.8);

        vol.mute();
        assert_eq!(vol.gain(), 0.0);

        // Level changes while muted are stored, not audible
        vol.set_level(0.3);
        assert_eq!(vol.gain(), 0.0);
        vol.unmute();
        assert_eq!(vol.gain(), 0.3);
    }
}
