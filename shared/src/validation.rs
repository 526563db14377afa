//! Input validation functions
//!
//! Range and length rules live on the request types (`validator` derive).
//! The checks here span several fields or need trimming first.

use crate::models::BloodPressure;
use crate::types::{CreateGoalRequest, CreateWorkoutRequest, UpdateGoalRequest};
use chrono::{DateTime, Utc};
use validator::{Validate, ValidationErrors};

/// Name after trimming; rejects blank input
pub fn required_text(field: &str, value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(trimmed.to_string())
}

/// Validate a blood pressure reading. Any non-negative pair is accepted.
pub fn validate_blood_pressure(bp: &BloodPressure) -> Result<(), String> {
    if bp.systolic < 0 || bp.diastolic < 0 {
        return Err("Blood pressure values cannot be negative".to_string());
    }
    Ok(())
}

/// Goal target must be a positive, finite number
pub fn validate_goal_target(target_value: f64) -> Result<(), String> {
    if !target_value.is_finite() {
        return Err("Target value must be a valid number".to_string());
    }
    if target_value <= 0.0 {
        return Err("Target value must be greater than 0".to_string());
    }
    Ok(())
}

/// Deadline must not precede the start
pub fn validate_goal_dates(start: DateTime<Utc>, target: DateTime<Utc>) -> Result<(), String> {
    if target < start {
        return Err("Target date cannot be before the start date".to_string());
    }
    Ok(())
}

/// Run the derived rules, then the cross-field ones
pub fn validate_workout(req: &CreateWorkoutRequest) -> Result<(), String> {
    req.validate().map_err(|e| describe(&e))?;
    required_text("Exercise name", &req.exercise_name)?;
    Ok(())
}

pub fn validate_new_goal(req: &CreateGoalRequest, now: DateTime<Utc>) -> Result<(), String> {
    req.validate().map_err(|e| describe(&e))?;
    required_text("Title", &req.title)?;
    required_text("Unit", &req.unit)?;
    validate_goal_target(req.target_value)?;
    validate_goal_dates(req.start_date.unwrap_or(now), req.target_date)
}

pub fn validate_goal_update(req: &UpdateGoalRequest) -> Result<(), String> {
    req.validate().map_err(|e| describe(&e))?;
    if let Some(target) = req.target_value {
        validate_goal_target(target)?;
    }
    Ok(())
}

/// Flatten `validator` errors into one readable message.
///
/// Uses the rule's message when present, otherwise `"<field> is invalid"`.
/// Fields are reported in name order so the output is stable.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let messages: Vec<String> = fields
        .into_iter()
        .map(|(field, errs)| {
            errs.iter()
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| format!("{field} is invalid"))
        })
        .collect();

    if messages.is_empty() {
        "Invalid input".to_string()
    } else {
        messages.join("; ")
    }
}
