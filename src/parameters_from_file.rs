//! Supports reading arm parameters from YAML file (optional)

use std::path::Path;
use yaml_rust2::{Yaml, YamlLoader};

use crate::constraints::Constraints;
use crate::kinematics_impl::PlanarKinematics;
use crate::parameter_error::ParameterError;
use crate::parameters::planar_arm::Parameters;
use crate::redundancy::ExtraJoints;
use nalgebra::Point2;

impl Parameters {
    /// Read the arm configuration from YAML file. YAML file like this is supported:
    /// ```yaml
    /// # Backhoe excavator
    /// planar_arm:
    ///   link_lengths: [3.5, 2.8, 1.5]
    ///   base: [0.0, 2.0]
    ///   joint_limits:
    ///     from: [deg(-90), deg(-145), deg(-45)]
    ///     to: [deg(90), deg(30), deg(145)]
    ///   extra_joints:
    ///     fixed: [deg(68.75)]
    /// ```
    /// Base, joint limits and extra joints are optional. Angles are radians unless written
    /// as `deg(angle)`. Instead of `fixed`, extra joints may be given as
    /// `approach: <angle>` with `offsets: [...]` for joints after the third.
    ///
    /// The parameters are validated as [PlanarKinematics::new] would do.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ParameterError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ParameterError> {
        let docs = YamlLoader::load_from_str(contents)
            .map_err(|e| ParameterError::ParseError(format!("{}", e)))?;
        let doc = docs
            .first()
            .ok_or_else(|| ParameterError::ParseError("Empty YAML document".to_string()))?;

        let arm = &doc["planar_arm"];
        if arm.is_badvalue() {
            return Err(ParameterError::MissingField("planar_arm".to_string()));
        }

        let link_lengths = read_numbers(&arm["link_lengths"], "link_lengths", parse_number)?;
        let dof = link_lengths.len();

        let base = match &arm["base"] {
            Yaml::BadValue => Point2::origin(),
            value => {
                let xy = read_numbers(value, "base", parse_number)?;
                if xy.len() != 2 {
                    return Err(ParameterError::InvalidLength { expected: 2, found: xy.len() });
                }
                Point2::new(xy[0], xy[1])
            }
        };

        let constraints = match &arm["joint_limits"] {
            Yaml::BadValue => None,
            limits => {
                let from = read_numbers(&limits["from"], "joint_limits.from", parse_angle)?;
                let to = read_numbers(&limits["to"], "joint_limits.to", parse_angle)?;
                for found in [from.len(), to.len()] {
                    if found != dof {
                        return Err(ParameterError::InvalidLength { expected: dof, found });
                    }
                }
                Some(Constraints::new(from, to))
            }
        };

        let extra_joints = read_extra_joints(&arm["extra_joints"], dof)?;

        let parameters = Parameters {
            link_lengths,
            base,
            constraints,
            extra_joints,
        };

        // Same checks as for the parameters built in code
        PlanarKinematics::new(parameters.clone())?;
        Ok(parameters)
    }
}

fn read_extra_joints(value: &Yaml, dof: usize) -> Result<ExtraJoints, ParameterError> {
    if value.is_badvalue() {
        // Not given: hold the extra joints stretched
        return Ok(ExtraJoints::Fixed(vec![0.0; dof.saturating_sub(2)]));
    }
    if !value["fixed"].is_badvalue() {
        let offsets = read_numbers(&value["fixed"], "extra_joints.fixed", parse_angle)?;
        return Ok(ExtraJoints::Fixed(offsets));
    }
    if !value["approach"].is_badvalue() {
        let angle = parse_angle(&value["approach"], "extra_joints.approach")?;
        let offsets = match &value["offsets"] {
            Yaml::BadValue => vec![0.0; dof.saturating_sub(3)],
            offsets => read_numbers(offsets, "extra_joints.offsets", parse_angle)?,
        };
        return Ok(ExtraJoints::Approach { angle, offsets });
    }
    Err(ParameterError::MissingField(
        "extra_joints must contain 'fixed' or 'approach'".to_string(),
    ))
}

fn read_numbers(
    value: &Yaml,
    field: &str,
    parse: fn(&Yaml, &str) -> Result<f64, ParameterError>,
) -> Result<Vec<f64>, ParameterError> {
    match value {
        Yaml::BadValue => Err(ParameterError::MissingField(field.to_string())),
        Yaml::Array(items) => items.iter().map(|item| parse(item, field)).collect(),
        _ => Err(ParameterError::ParseError(format!("{} must be a list", field))),
    }
}

fn parse_number(value: &Yaml, field: &str) -> Result<f64, ParameterError> {
    let number = match value {
        Yaml::Integer(i) => *i as f64,
        Yaml::Real(_) => value
            .as_f64()
            .ok_or_else(|| ParameterError::ParseError(format!("{}: bad number", field)))?,
        Yaml::BadValue => return Err(ParameterError::MissingField(field.to_string())),
        other => {
            return Err(ParameterError::ParseError(format!(
                "{}: expected number, found {:?}",
                field, other
            )))
        }
    };
    if !number.is_finite() {
        return Err(ParameterError::ParseError(format!("{} must be finite", field)));
    }
    Ok(number)
}

/// Radians as a plain number, or degrees as `deg(angle)`.
fn parse_angle(value: &Yaml, field: &str) -> Result<f64, ParameterError> {
    if let Yaml::String(text) = value {
        let text = text.trim();
        let degrees = text
            .strip_prefix("deg(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| ParameterError::WrongAngle(format!("{}: '{}'", field, text)))?;
        let degrees: f64 = degrees
            .trim()
            .parse()
            .map_err(|_| ParameterError::WrongAngle(format!("{}: '{}'", field, text)))?;
        return Ok(degrees.to_radians());
    }
    parse_number(value, field)
}
