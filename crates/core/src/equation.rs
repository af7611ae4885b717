//! Recurrence synthesis from the per-line cost table.
//!
//! Every line contributes one constant `C<line>`; lines executed more than
//! once contribute `C<line>*<exec_count>`. The terms are summed in payload
//! order.

use serde::Serialize;

use crate::model::LineRecord;

/// Full equation used when there are no line records at all.
pub const EMPTY_EQUATION: &str = "C";

/// A named per-line cost constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Constant {
    pub name: String,
    pub value: String,
}

/// Build the right-hand side of `T(n) = ...` from the line records.
///
/// ```
/// use bigo_core::equation::full_equation;
/// use bigo_core::model::LineRecord;
///
/// let lines = vec![
///     LineRecord { line: Some(1), exec_count: Some("1".into()), ..Default::default() },
///     LineRecord { line: Some(2), exec_count: Some("n".into()), ..Default::default() },
/// ];
/// assert_eq!(full_equation(&lines), "C1 + C2*n");
/// assert_eq!(full_equation(&[]), "C");
/// ```
pub fn full_equation(lines: &[LineRecord]) -> String {
    if lines.is_empty() {
        return EMPTY_EQUATION.to_string();
    }

    lines
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let number = record.number(index);
            match record.exec_count() {
                "1" => format!("C{number}"),
                exec => format!("C{number}*{exec}"),
            }
        })
        .collect::<Vec<_>>()
        .join(" + ")
}

/// One constant per line record, valued with that line's time cost.
pub fn constants(lines: &[LineRecord]) -> Vec<Constant> {
    lines
        .iter()
        .enumerate()
        .map(|(index, record)| Constant {
            name: format!("C{}", record.number(index)),
            value: record.time_cost().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(number: u64, exec: &str, cost: &str) -> LineRecord {
        LineRecord {
            line: Some(number),
            exec_count: Some(exec.into()),
            time_cost: Some(cost.into()),
            ..Default::default()
        }
    }

    #[test]
    fn empty_lines_yield_single_constant() {
        assert_eq!(full_equation(&[]), "C");
    }

    #[test]
    fn single_and_repeated_terms() {
        let lines = [line(1, "1", "O(1)"), line(2, "n", "O(1)")];
        assert_eq!(full_equation(&lines), "C1 + C2*n");
    }

    #[test]
    fn missing_exec_count_counts_as_once() {
        let lines = [LineRecord {
            line: Some(7),
            ..Default::default()
        }];
        assert_eq!(full_equation(&lines), "C7");
    }

    #[test]
    fn payload_order_is_preserved() {
        let lines = [line(5, "n", "O(1)"), line(2, "1", "O(1)"), line(9, "n^2", "O(n)")];
        assert_eq!(full_equation(&lines), "C5*n + C2 + C9*n^2");
    }

    #[test]
    fn missing_line_numbers_use_position() {
        let lines = [LineRecord::default(), LineRecord::default()];
        assert_eq!(full_equation(&lines), "C1 + C2");
    }

    #[test]
    fn constants_carry_time_cost_with_default() {
        let lines = [
            line(1, "1", "O(1)"),
            LineRecord {
                line: Some(3),
                ..Default::default()
            },
            line(4, "n", "O(log n)"),
        ];

        assert_eq!(
            constants(&lines),
            vec![
                Constant { name: "C1".into(), value: "O(1)".into() },
                Constant { name: "C3".into(), value: "O(1)".into() },
                Constant { name: "C4".into(), value: "O(log n)".into() },
            ]
        );
    }

    #[test]
    fn constants_empty_without_lines() {
        assert!(constants(&[]).is_empty());
    }
}
