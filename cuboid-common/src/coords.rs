//! Coordinate transform between authoring space and target model space
//!
//! Authoring space is Z-up (the modelling tool's convention). Target space is
//! Y-up with the authoring Y axis folded onto target Z:
//!
//! ```text
//! target    = (x, -z,  y)
//! authoring = (x,  z, -y)
//! ```
//!
//! Both functions only permute and negate components, so they are exact
//! inverses for every finite input.

use glam::DVec3;

/// Map an authoring-space vector into target model space.
#[inline]
pub fn to_target(v: DVec3) -> DVec3 {
    DVec3::new(v.x, -v.z, v.y)
}

/// Map a target-space vector back into authoring space.
#[inline]
pub fn to_authoring(v: DVec3) -> DVec3 {
    DVec3::new(v.x, v.z, -v.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_target_axes() {
        assert_eq!(to_target(DVec3::X), DVec3::X);
        assert_eq!(to_target(DVec3::Y), DVec3::Z);
        assert_eq!(to_target(DVec3::Z), -DVec3::Y);
    }

    #[test]
    fn test_roundtrip_authoring() {
        let samples = [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.5, -2.25, 3.125),
            DVec3::new(-1e-12, 7e9, -0.1),
            DVec3::new(f64::MAX, f64::MIN, f64::MIN_POSITIVE),
        ];
        for p in samples {
            assert_eq!(to_authoring(to_target(p)), p);
            assert_eq!(to_target(to_authoring(p)), p);
        }
    }
}
