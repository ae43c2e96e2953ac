use error_stack::Report;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Error)]
#[error("Invalid given data occurred")]
pub struct Wrapper;

pub trait IntoValidatorReport<T> {
    fn into_validator_report(self) -> error_stack::Result<T, Wrapper>;
}

impl<T> IntoValidatorReport<T> for Result<T, ValidationErrors> {
    fn into_validator_report(self) -> error_stack::Result<T, Wrapper> {
        self.map_err(|errors| {
            fn read_errors(
                errors: &ValidationErrors,
                prefix: &str,
                mut report: Report<Wrapper>,
            ) -> Report<Wrapper> {
                for (field, kind) in errors.errors() {
                    let path = if prefix.is_empty() {
                        (*field).to_string()
                    } else {
                        format!("{prefix}.{field}")
                    };

                    match kind {
                        ValidationErrorsKind::Struct(nested) => {
                            report = read_errors(nested, &path, report);
                        }
                        ValidationErrorsKind::List(elements) => {
                            for (index, nested) in elements {
                                let path = format!("{path}[{index}]");
                                report = read_errors(nested, &path, report);
                            }
                        }
                        ValidationErrorsKind::Field(messages) => {
                            for message in messages {
                                let text = message
                                    .message
                                    .as_ref()
                                    .map_or_else(|| message.code.to_string(), ToString::to_string);
                                report = report.attach_printable(format!("{path}: {text}"));
                            }
                        }
                    }
                }
                report
            }

            read_errors(&errors, "", Report::new(Wrapper))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::IntoValidatorReport;
    use validator::Validate;

    #[derive(Validate)]
    struct Form {
        #[validate(length(min = 4))]
        name: String,
    }

    #[test]
    fn flattens_field_errors() {
        let form = Form {
            name: "ab".to_string(),
        };

        let result: Result<(), _> = Err(form.validate().expect_err("should fail validation"));
        let report = result
            .into_validator_report()
            .expect_err("should produce a report");
        assert!(format!("{report:?}").contains("name"));
    }
}
