//! Text labels with a font size, and the small template formatter used for
//! series and tick labels.

use std::fmt;

use crate::plotting::data::Value;

/// Font size used when none (or an unusable one) is given.
pub const DEFAULT_LABEL_SIZE: u32 = 12;
/// Smallest font size a label may carry.
pub const MINIMUM_LABEL_SIZE: u32 = 6;

/// A display string and its font size in points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    text: Option<String>,
    size: u32,
}

impl Label {
    /// Create a label. Absent text leaves the label empty; the size goes
    /// through the same clamping as [`Label::set_size`].
    pub fn new(text: Option<&str>, size: Option<i64>) -> Self {
        let mut label = Label {
            text: None,
            size: DEFAULT_LABEL_SIZE,
        };
        label.set_label(text);
        label.set_size(size);
        label
    }

    pub fn set_label(&mut self, text: Option<&str>) {
        self.text = text.map(str::to_string);
    }

    /// The label string, or an empty string when unset.
    pub fn label(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Assign the font size. Absent input falls back to the default and
    /// anything below the minimum is raised to the minimum.
    pub fn set_size(&mut self, size: Option<i64>) {
        self.size = match size {
            None => DEFAULT_LABEL_SIZE,
            Some(s) if s < MINIMUM_LABEL_SIZE as i64 => MINIMUM_LABEL_SIZE,
            Some(s) => u32::try_from(s).unwrap_or(u32::MAX),
        };
    }

    pub fn size(&self) -> u32 {
        self.size
    }
}

impl Default for Label {
    fn default() -> Self {
        Label::new(None, None)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text {
            None => write!(f, "Empty Label")?,
            Some(ref text) => write!(f, "{}", text)?,
        }
        write!(f, " (font size: {})", self.size)
    }
}

/// Substitute `value` into every `{...}` placeholder of `template`.
///
/// Supported specs: `{}`, `{:.Nf}`, `{:f}`, `{:.Ne}`, `{:e}`, `{:.N%}`.
/// Text values are inserted verbatim whatever the format spec. `{{` and `}}`
/// produce literal braces.
pub fn format_template(template: &str, value: &Value) -> String {
    let mut out = String::with_capacity(template.len() + 8);
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut fmt_spec = String::new();
                let mut closed = false;
                for s in chars.by_ref() {
                    if s == '}' {
                        closed = true;
                        break;
                    }
                    fmt_spec.push(s);
                }
                if !closed {
                    out.push('{');
                    out.push_str(&fmt_spec);
                    break;
                }
                out.push_str(&apply_format(&fmt_spec, value));
            }
            _ => out.push(c),
        }
    }

    out
}

fn apply_format(fmt_spec: &str, value: &Value) -> String {
    let number = match value {
        Value::Number(n) => *n,
        Value::Text(t) => return t.clone(),
    };
    let fmt_spec = fmt_spec.trim_start_matches(':');
    let Some(kind) = fmt_spec.chars().last() else {
        return value.to_string();
    };
    let precision = fmt_spec
        .strip_prefix('.')
        .map(|rest| rest.trim_end_matches(kind))
        .and_then(|digits| digits.parse::<usize>().ok());

    match kind {
        'f' | 'F' => format!("{:.*}", precision.unwrap_or(6), number),
        'e' | 'E' => exponent_notation(number, precision.unwrap_or(6)),
        '%' => format!("{:.*}%", precision.unwrap_or(6), number * 100.0),
        _ => value.to_string(),
    }
}

/// Exponential notation with a signed, two-digit exponent (`1.0e-03`).
fn exponent_notation(number: f64, precision: usize) -> String {
    let raw = format!("{:.*e}", precision, number);
    match raw.split_once('e') {
        Some((mantissa, exp)) => match exp.parse::<i32>() {
            Ok(e) => format!(
                "{}e{}{:02}",
                mantissa,
                if e < 0 { '-' } else { '+' },
                e.abs()
            ),
            Err(_) => raw,
        },
        None => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_defaults() {
        let label = Label::default();
        assert_eq!(label.label(), "");
        assert!(!label.has_text());
        assert_eq!(label.size(), DEFAULT_LABEL_SIZE);
        assert_eq!(label.to_string(), "Empty Label (font size: 12)");
    }

    #[test]
    fn test_size_clamps_to_minimum() {
        let mut label = Label::new(Some("Cyclic Period"), Some(2));
        assert_eq!(label.size(), MINIMUM_LABEL_SIZE);

        label.set_size(Some(-40));
        assert_eq!(label.size(), MINIMUM_LABEL_SIZE);

        label.set_size(Some(18));
        assert_eq!(label.size(), 18);

        label.set_size(None);
        assert_eq!(label.size(), DEFAULT_LABEL_SIZE);
        assert_eq!(label.to_string(), "Cyclic Period (font size: 12)");
    }

    #[test]
    fn test_format_template_numbers() {
        let v = Value::Number(0.0012);
        assert_eq!(format_template("$K$ = {:.1e}", &v), "$K$ = 1.2e-03");
        assert_eq!(format_template("{:.1e}", &Value::Number(25000.0)), "2.5e+04");
        assert_eq!(format_template("{:.2f}", &Value::Number(3.14159)), "3.14");
        assert_eq!(format_template("{:.0%}", &Value::Number(0.25)), "25%");
        assert_eq!(format_template("n = {}", &Value::Number(4.0)), "n = 4");
    }

    #[test]
    fn test_format_template_text_and_braces() {
        let v = Value::Text("SS".to_string());
        assert_eq!(format_template("{:.2f} set", &v), "SS set");
        assert_eq!(format_template("{{{}}}", &v), "{SS}");
        assert_eq!(format_template("open {", &v), "open {");
    }
}
