use super::*;

fn valid() -> SonarConfig {
  SonarConfig::new(Vec3::ZERO, Quat::IDENTITY, 0.5, 5.0, 1.0)
}

#[test]
fn test_valid_config_passes() {
  assert_eq!(valid().validate(), Ok(()));
}

#[test]
fn test_zero_inner_radius_is_allowed() {
  let config = SonarConfig {
    inner_radius: 0.0,
    ..valid()
  };
  assert_eq!(config.validate(), Ok(()));
}

#[test]
fn test_negative_inner_radius_fails() {
  let config = SonarConfig {
    inner_radius: -1.0,
    ..valid()
  };
  assert_eq!(config.validate(), Err(SonarError::NegativeInnerRadius(-1.0)));
}

#[test]
fn test_zero_outer_radius_fails() {
  let config = SonarConfig {
    outer_radius: 0.0,
    ..valid()
  };
  assert_eq!(
    config.validate(),
    Err(SonarError::NonPositiveOuterRadius(0.0))
  );
}

#[test]
fn test_nan_radius_fails() {
  let config = SonarConfig {
    outer_radius: f32::NAN,
    ..valid()
  };
  assert!(config.validate().is_err());
}

#[test]
fn test_zero_rotation_fails() {
  let config = SonarConfig {
    rotation: Quat::from_xyzw(0.0, 0.0, 0.0, 0.0),
    ..valid()
  };
  assert_eq!(config.validate(), Err(SonarError::InvalidRotation));
}

#[test]
fn test_non_finite_rotation_fails() {
  let config = SonarConfig {
    rotation: Quat::from_xyzw(f32::INFINITY, 0.0, 0.0, 1.0),
    ..valid()
  };
  assert_eq!(config.validate(), Err(SonarError::InvalidRotation));
}

#[test]
fn test_looking_along_degenerate_direction_fails() {
  let config = SonarConfig::looking_along(Vec3::ZERO, Vec3::Y, Vec3::Y, 0.5, 5.0, 1.0);
  assert_eq!(config.validate(), Err(SonarError::InvalidRotation));
}

#[test]
fn test_unset_is_invalid() {
  assert!(SonarConfig::UNSET.validate().is_err());
}

#[test]
fn test_normalized_rotation_is_unit() {
  let config = SonarConfig {
    rotation: Quat::from_xyzw(0.0, 0.0, 0.0, 2.0),
    ..valid()
  }
  .normalized()
  .expect("Scaled identity is valid");
  assert_eq!(config.rotation, Quat::IDENTITY);
}

#[test]
fn test_horizon_sums_radii() {
  assert_eq!(valid().horizon(), 5.5);
}
