//! Text formula → [`Evaluate`] capability, backed by `meval`.

use std::fmt;

use crate::api::error::CoasterError;
use crate::systems::rail::Evaluate;

/// Formulas offered as one-click presets, with their display labels.
pub const PRESETS: [(&str, &str); 10] = [
    ("x", "x"),
    ("0.02·x²", "0.02*x*x"),
    ("0.2·x²", "0.2*x*x"),
    ("sin(x)", "sin(x)"),
    ("cos(x)", "cos(x)"),
    ("tan(x)", "tan(x)"),
    ("sin(x)+cos(x)", "sin(x)+cos(x)"),
    ("sin(x)·cos(x)", "sin(x)*cos(x)"),
    ("0.1·sin(x)+0.02·x²", "0.1*sin(x)+0.02*x*x"),
    ("sin(x)-0.05·x", "sin(x)-0.05*x"),
];

/// A compiled `y = f(x)` formula.
///
/// Evaluation never panics. Any result that is not finite comes back as
/// `f64::NAN` so the rail generator drops that sample.
pub struct CompiledExpression {
    source: String,
    func: Box<dyn Fn(f64) -> f64>,
}

impl CompiledExpression {
    /// Parse `text` as a function of `x`.
    pub fn compile(text: &str) -> Result<Self, CoasterError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(CoasterError::EmptyExpression);
        }
        let expr: meval::Expr = trimmed
            .parse()
            .map_err(|e: meval::Error| CoasterError::Expression(e.to_string()))?;
        let func = expr
            .bind("x")
            .map_err(|e| CoasterError::Expression(e.to_string()))?;
        Ok(Self {
            source: trimmed.to_string(),
            func: Box::new(func),
        })
    }

    /// The trimmed source text.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Evaluate for CompiledExpression {
    fn evaluate(&self, x: f64) -> f64 {
        let y = (self.func)(x);
        if y.is_finite() {
            y
        } else {
            f64::NAN
        }
    }
}

impl fmt::Debug for CompiledExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledExpression")
            .field("source", &self.source)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_polynomials_and_trig() {
        let f = CompiledExpression::compile(" 0.02*x*x ").unwrap();
        assert_eq!(f.source(), "0.02*x*x");
        assert!((f.evaluate(10.0) - 2.0).abs() < 1e-12);

        let g = CompiledExpression::compile("5*sin(0.3*x)").unwrap();
        assert!((g.evaluate(0.0)).abs() < 1e-12);

        let h = CompiledExpression::compile("-0.03*x*x+12").unwrap();
        assert!((h.evaluate(10.0) - 9.0).abs() < 1e-12);
    }

    #[test]
    fn non_finite_becomes_nan() {
        let f = CompiledExpression::compile("1/x").unwrap();
        assert!(f.evaluate(0.0).is_nan());
        let g = CompiledExpression::compile("sqrt(x)").unwrap();
        assert!(g.evaluate(-1.0).is_nan());
    }

    #[test]
    fn empty_and_invalid_are_errors() {
        assert!(matches!(CompiledExpression::compile("   "), Err(CoasterError::EmptyExpression)));
        assert!(matches!(CompiledExpression::compile("x*"), Err(CoasterError::Expression(_))));
        // Unknown variables fail at bind time.
        assert!(matches!(CompiledExpression::compile("x*y"), Err(CoasterError::Expression(_))));
    }

    #[test]
    fn presets_compile() {
        for (label, formula) in PRESETS {
            assert!(CompiledExpression::compile(formula).is_ok(), "preset {} failed", label);
        }
    }
}
