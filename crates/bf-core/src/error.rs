use thiserror::Error;

pub type BfResult<T> = Result<T, BfError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BfError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_finite_display() {
        let err = BfError::NonFinite {
            what: "rho",
            value: f64::NAN,
        };
        assert_eq!(err.to_string(), "Non-finite numeric value for rho: NaN");
    }
}
