//! Turns `validator` errors into a flat list of [`Violation`]s.

use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::domain::{ConfigError, ConfigResult, Violation};

/// Run the struct's declared constraints.
///
/// Violations are sorted by field path so error messages are stable.
pub fn check<T: Validate>(config: &T) -> ConfigResult<()> {
    let Err(errors) = config.validate() else {
        return Ok(());
    };

    let mut violations = Vec::new();
    collect(&errors, "", &mut violations);
    violations.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.rule.cmp(&b.rule)));
    Err(ConfigError::Validation(violations))
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<Violation>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|err| Violation {
                    field: path.clone(),
                    rule: err.code.to_string(),
                    message: err.message.as_ref().map(ToString::to_string),
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{path}[{index}]"), out);
                }
            }
        }
    }
}
