//! World elements stored in the index
//!
//! Five kinds of element take part in audio queries. Each derives its
//! bounding region from its own data:
//! components and probes carry a box, microphones occupy a tiny point
//! region, speakers and meters cover a cube as wide as their range.

use super::layers::LayerMask;
use crate::collision::Aabb;
use crate::foundation::math::Vec3;

bitflags::bitflags! {
    /// Behaviour flags of a scene component
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ComponentFlags: u32 {
        /// Takes part in occlusion ray traces
        const AFFECTS_SOUND = 1 << 0;
        /// Never moves after registration
        const STATIC = 1 << 1;
        /// Lets part of the sound through
        const TRANSMISSIVE = 1 << 2;
    }
}

/// Scene geometry that may occlude sound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Component {
    /// World-space bounds
    pub bounds: Aabb,
    /// Layers the component belongs to
    pub layers: LayerMask,
    /// Behaviour flags
    pub flags: ComponentFlags,
}

/// Listener position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Microphone {
    /// World-space position
    pub position: Vec3,
    /// Layers the microphone belongs to
    pub layers: LayerMask,
}

/// Sound emitter with an audible range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Speaker {
    /// World-space position
    pub position: Vec3,
    /// Audible distance
    pub range: f64,
    /// Layers the speaker belongs to
    pub layers: LayerMask,
}

/// Region sampling the acoustic environment (reverb zones and the like)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentProbe {
    /// World-space bounds
    pub bounds: Aabb,
    /// Layers the probe belongs to
    pub layers: LayerMask,
}

/// Measures the sound level around a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundLevelMeter {
    /// World-space position
    pub position: Vec3,
    /// Measuring distance
    pub range: f64,
    /// Layers the meter belongs to
    pub layers: LayerMask,
}

/// Tag of an [`Element`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// [`Component`]
    Component,
    /// [`Microphone`]
    Microphone,
    /// [`Speaker`]
    Speaker,
    /// [`EnvironmentProbe`]
    EnvironmentProbe,
    /// [`SoundLevelMeter`]
    SoundLevelMeter,
}

/// Anything registered with a [`WorldOctree`](super::WorldOctree)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Element {
    /// Scene component
    Component(Component),
    /// Microphone
    Microphone(Microphone),
    /// Speaker
    Speaker(Speaker),
    /// Environment probe
    EnvironmentProbe(EnvironmentProbe),
    /// Sound level meter
    SoundLevelMeter(SoundLevelMeter),
}

impl Element {
    /// Scene component
    pub fn component(bounds: Aabb, layers: LayerMask, flags: ComponentFlags) -> Self {
        Self::Component(Component { bounds, layers, flags })
    }

    /// Microphone at `position`
    pub fn microphone(position: Vec3, layers: LayerMask) -> Self {
        Self::Microphone(Microphone { position, layers })
    }

    /// Speaker at `position`; `range` must not be negative
    pub fn speaker(position: Vec3, range: f64, layers: LayerMask) -> Self {
        assert!(range >= 0.0, "speaker range must be non-negative, got {range}");
        Self::Speaker(Speaker { position, range, layers })
    }

    /// Environment probe covering `bounds`
    pub fn environment_probe(bounds: Aabb, layers: LayerMask) -> Self {
        Self::EnvironmentProbe(EnvironmentProbe { bounds, layers })
    }

    /// Sound level meter at `position`; `range` must not be negative
    pub fn sound_level_meter(position: Vec3, range: f64, layers: LayerMask) -> Self {
        assert!(range >= 0.0, "meter range must be non-negative, got {range}");
        Self::SoundLevelMeter(SoundLevelMeter { position, range, layers })
    }

    /// Tag of this element
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Component(_) => ElementKind::Component,
            Self::Microphone(_) => ElementKind::Microphone,
            Self::Speaker(_) => ElementKind::Speaker,
            Self::EnvironmentProbe(_) => ElementKind::EnvironmentProbe,
            Self::SoundLevelMeter(_) => ElementKind::SoundLevelMeter,
        }
    }

    /// Layers the element belongs to
    pub fn layers(&self) -> LayerMask {
        match self {
            Self::Component(c) => c.layers,
            Self::Microphone(m) => m.layers,
            Self::Speaker(s) => s.layers,
            Self::EnvironmentProbe(p) => p.layers,
            Self::SoundLevelMeter(m) => m.layers,
        }
    }

    /// Region the index files the element under
    pub fn bounds(&self, point_half_size: f64) -> Aabb {
        match self {
            Self::Component(c) => c.bounds,
            Self::EnvironmentProbe(p) => p.bounds,
            Self::Microphone(m) => Aabb::from_center_half_size(m.position, Vec3::repeat(point_half_size)),
            Self::Speaker(s) => Aabb::from_center_half_size(s.position, Vec3::repeat(s.range)),
            Self::SoundLevelMeter(m) => Aabb::from_center_half_size(m.position, Vec3::repeat(m.range)),
        }
    }

    /// The component, if this element is one
    pub fn as_component(&self) -> Option<&Component> {
        match self {
            Self::Component(c) => Some(c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bounds_per_kind() {
        let speaker = Element::speaker(Vec3::new(1.0, 2.0, 3.0), 4.0, LayerMask::ALL);
        let bounds = speaker.bounds(1e-4);
        assert_relative_eq!(bounds.min, Vec3::new(-3.0, -2.0, -1.0));
        assert_relative_eq!(bounds.max, Vec3::new(5.0, 6.0, 7.0));

        let microphone = Element::microphone(Vec3::zeros(), LayerMask::ALL);
        assert_relative_eq!(microphone.bounds(0.5).half_size(), Vec3::repeat(0.5));

        let wall = Aabb::new(Vec3::zeros(), Vec3::repeat(2.0));
        let component = Element::component(wall, LayerMask::layer(1), ComponentFlags::AFFECTS_SOUND);
        assert_eq!(component.bounds(0.5), wall);
        assert_eq!(component.kind(), ElementKind::Component);
        assert_eq!(component.layers(), LayerMask::layer(1));
    }

    #[test]
    #[should_panic]
    fn test_negative_range_panics() {
        let _ = Element::speaker(Vec3::zeros(), -1.0, LayerMask::ALL);
    }

    #[test]
    fn test_flags() {
        let flags = ComponentFlags::AFFECTS_SOUND | ComponentFlags::STATIC;
        assert!(flags.contains(ComponentFlags::AFFECTS_SOUND));
        assert!(!flags.contains(ComponentFlags::TRANSMISSIVE));
        assert_eq!(ComponentFlags::default(), ComponentFlags::empty());
    }
}
