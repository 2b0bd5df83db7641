//! Construction parameters for the chains a [`Session`](crate::Session)
//! simulates.

use crate::{Vector2, Vector3};

/// The rotation applied per key press, in degrees.
pub const ROTATION_STEP: f32 = 10.;

/// The largest number of bones a chain can have.
#[allow(clippy::cast_lossless)]
pub const MAX_SEGMENTS: usize = u8::MAX as usize;

/// Describes a straight chain of equally sized bones.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct ChainConfig<V> {
    /// The world position of the root joint.
    pub origin: V,
    /// The length of every bone.
    pub segment_length: f32,
    /// The number of bones. The chain has one more joint than this.
    pub segments: usize,
}

impl Default for ChainConfig<Vector2> {
    fn default() -> Self {
        Self {
            origin: Vector2::new(150., 150.),
            segment_length: 100.,
            segments: 3,
        }
    }
}

impl Default for ChainConfig<Vector3> {
    fn default() -> Self {
        Self {
            origin: Vector3::new(10., 10., 10.),
            segment_length: 20.,
            segments: 3,
        }
    }
}

/// The configuration of a [`Session`](crate::Session).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SticklerConfig {
    /// The chain used in 2D mode.
    pub planar: ChainConfig<Vector2>,
    /// The chain used in 3D mode.
    pub spatial: ChainConfig<Vector3>,
    /// The rotation applied per key press, in degrees.
    pub rotation_step: f32,
}

impl Default for SticklerConfig {
    fn default() -> Self {
        Self {
            planar: ChainConfig::default(),
            spatial: ChainConfig::default(),
            rotation_step: ROTATION_STEP,
        }
    }
}

/// An error loading a [`SticklerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The file is not a valid configuration.
    #[cfg(feature = "app")]
    #[error(transparent)]
    Rsn(#[from] rsn::de::Error),
    /// A chain has more bones than can be addressed.
    #[error("{segments} segments requested, but at most {} are supported", MAX_SEGMENTS)]
    TooManySegments {
        /// The number of segments in the configuration.
        segments: usize,
    },
}

impl SticklerConfig {
    /// Checks that both chains can be built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for segments in [self.planar.segments, self.spatial.segments] {
            if segments > MAX_SEGMENTS {
                return Err(ConfigError::TooManySegments { segments });
            }
        }
        Ok(())
    }
}

#[cfg(feature = "app")]
mod file {
    use std::{fs, path::Path};

    use super::{ConfigError, SticklerConfig};

    impl SticklerConfig {
        /// Reads a configuration written in rsn from `path`.
        pub fn read_from(path: &Path) -> Result<Self, ConfigError> {
            let contents = fs::read(path)?;
            let config = rsn::from_slice::<SticklerConfig>(&contents)?;
            config.validate()?;
            log::debug!("loaded configuration from {}", path.display());
            Ok(config)
        }
    }
}

#[test]
fn reference_chains() {
    let config = SticklerConfig::default();
    assert_eq!(config.planar.origin, Vector2::new(150., 150.));
    assert_eq!(config.planar.segments, 3);
    assert_eq!(config.spatial.segment_length, 20.);
    assert_eq!(config.rotation_step, 10.);
}

#[test]
fn segment_limit() {
    let mut config = SticklerConfig::default();
    config.spatial.segments = MAX_SEGMENTS;
    assert!(config.validate().is_ok());

    config.planar.segments = 300;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::TooManySegments { segments: 300 })
    ));
}

#[test]
#[cfg(feature = "serde")]
fn roundtrip() {
    let config = SticklerConfig {
        rotation_step: 5.,
        ..SticklerConfig::default()
    };
    let serialized = pot::to_vec(&config).unwrap();
    let deserialized: SticklerConfig = pot::from_slice(&serialized).unwrap();
    assert_eq!(deserialized, config);
}
